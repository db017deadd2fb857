//! # warc-normalizer
//!
//! Converts WARC web-archive captures into normalized documents for
//! downstream text and indexing pipelines.
//!
//! Each `response` record in the archive is unpacked into the HTTP
//! exchange it captured, normalized into a url-keyed document (body bytes
//! plus verbatim headers), run through a configurable accept/reject
//! filter, and appended to a SQLite output store.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────┐
//! │  WARC     │──▶│  Transformer │──▶│  SQLite  │
//! │  reader   │   │ parse+filter │   │  store   │
//! └───────────┘   └──────────────┘   └──────────┘
//!        one record at a time; kept/filtered counters
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! warcn convert crawl.warc out/documents.sqlite
//! warcn convert crawls/ out/documents.sqlite --config warcn.toml
//! warcn stats out/documents.sqlite
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Core data types (records, documents, header map) |
//! | [`warc`] | Pull-based WARC record reader |
//! | [`http`] | Embedded HTTP response parser |
//! | [`filter`] | Rule-based document filter |
//! | [`transform`] | Per-record transformation |
//! | [`convert`] | Batch driver and counters |
//! | [`store`] | Append-only SQLite sink |
//! | [`stats`] | Output-store overview |
//! | [`config`] | TOML configuration parsing |

pub mod config;
pub mod convert;
pub mod db;
pub mod filter;
pub mod http;
pub mod models;
pub mod stats;
pub mod store;
pub mod transform;
pub mod warc;
