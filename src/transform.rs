//! Per-record transformation: raw archive record in, outcome out.
//!
//! This is the policy core of the converter. It is a pure function over
//! one record — no I/O, no counters, no shared mutable state — which is
//! what lets the driver run records in any order (or in parallel) and
//! keeps the logic testable without any batch machinery around it.

use crate::filter::DocumentFilter;
use crate::http;
use crate::models::{NormalizedDocument, RawRecord};

/// Result of transforming a single record.
///
/// Only `Emitted` and `Filtered` are counted by the driver; the skip
/// variants match non-content records and broken captures, which are
/// routine in real archives and dropped silently.
#[derive(Debug)]
pub enum Outcome {
    /// The record produced a document; its url is the output key.
    Emitted(NormalizedDocument),
    /// Record type was not `response` (warcinfo, request, ...).
    SkippedNonResponse,
    /// `WARC-Target-URI` absent or not an http(s) url.
    SkippedNonHttpUri,
    /// Content block was not a parseable HTTP response.
    SkippedUnparsableHttp,
    /// The document was rejected by the configured filter.
    Filtered,
}

/// Turns raw records into normalized documents, applying the job filter.
///
/// Built once per job around an already-compiled [`DocumentFilter`] and
/// shared read-only across all records.
pub struct Transformer {
    filter: DocumentFilter,
}

impl Transformer {
    pub fn new(filter: DocumentFilter) -> Self {
        Self { filter }
    }

    /// Transform one record. Never fails: every malformed input maps to a
    /// skip outcome.
    pub fn transform(&self, raw: RawRecord) -> Outcome {
        if raw.record_type != "response" {
            return Outcome::SkippedNonResponse;
        }

        let url = match raw.metadata.get("WARC-Target-URI") {
            Some(uri) if uri.starts_with("http") => uri.to_string(),
            _ => return Outcome::SkippedNonHttpUri,
        };

        let ip = raw.metadata.get("WARC-IP-Address").map(str::to_string);

        let response = match http::parse_response(&raw.content) {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(url = %url, error = %err, "unparsable http response");
                return Outcome::SkippedUnparsableHttp;
            }
        };

        let http::HttpResponse { headers, body, .. } = response;
        let content_type = headers.get("Content-Type").map(str::to_string);

        // All response headers carry over verbatim; the capture IP is
        // appended under "IP" only when one was recorded.
        let mut metadata = headers;
        match ip {
            Some(ip) if !ip.trim().is_empty() => metadata.insert("IP", ip),
            _ => {}
        }

        let document = NormalizedDocument {
            url,
            content_type,
            content: body,
            metadata,
        };

        if self.filter.keep(&document) {
            Outcome::Emitted(document)
        } else {
            Outcome::Filtered
        }
    }
}
