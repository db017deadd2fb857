//! Parser for the HTTP response embedded in a WARC response record.
//!
//! A response record's content block is a captured HTTP exchange: status
//! line, header lines, a blank-line delimiter, then the body. This module
//! splits that block apart — nothing more. No decompression, no
//! chunked-transfer reassembly, no charset decoding: archived content is
//! captured post-transfer, so the body bytes are passed through verbatim.
//!
//! Parse failures are an expected, frequent outcome in messy archives. The
//! caller treats [`MalformedResponse`] as a per-record skip, never as a
//! pipeline fault. Parsing is pure: the same bytes always produce the same
//! result.

use thiserror::Error;

use crate::models::HeaderMap;

/// Why a content block could not be read as an HTTP response.
#[derive(Debug, Error, PartialEq)]
pub enum MalformedResponse {
    /// No blank-line delimiter between headers and body.
    #[error("no header/body delimiter found")]
    MissingDelimiter,
    /// First line is not `<version> <3-digit code> [<reason>]`.
    #[error("malformed status line: {0:?}")]
    BadStatusLine(String),
}

/// A parsed HTTP response: status line, ordered headers, verbatim body.
///
/// Headers and body are disjoint ranges of the original block. Duplicate
/// header names are kept in order; lookup through [`HeaderMap::get`] is
/// last-wins.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_line: String,
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Split a raw content block into status line, headers, and body.
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse, MalformedResponse> {
    let (head_len, body_start) = find_delimiter(raw).ok_or(MalformedResponse::MissingDelimiter)?;

    // The head is line-oriented ASCII in practice; decode lossily so one
    // stray byte in a header does not reject an otherwise fine record.
    let head = String::from_utf8_lossy(&raw[..head_len]);
    let mut lines = head.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let status_line = lines.next().unwrap_or("").to_string();
    let status_code = parse_status_line(&status_line)
        .ok_or_else(|| MalformedResponse::BadStatusLine(status_line.clone()))?;

    let mut headers = HeaderMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        // Split on the first colon; lines without one are skipped.
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim(), value.trim_start());
        }
    }

    Ok(HttpResponse {
        status_line,
        status_code,
        headers,
        body: raw[body_start..].to_vec(),
    })
}

/// Locate the first blank line (`\r\n\r\n` or `\n\n`).
///
/// Returns (length of the head, offset where the body starts).
fn find_delimiter(raw: &[u8]) -> Option<(usize, usize)> {
    let crlf = raw.windows(4).position(|w| w == b"\r\n\r\n");
    let lf = raw.windows(2).position(|w| w == b"\n\n");
    match (crlf, lf) {
        (Some(c), Some(l)) if l + 1 < c => Some((l, l + 2)),
        (Some(c), _) => Some((c, c + 4)),
        (None, Some(l)) => Some((l, l + 2)),
        (None, None) => None,
    }
}

/// Validate `<version> SP <3-digit code> [SP <reason>]`, returning the code.
fn parse_status_line(line: &str) -> Option<u16> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // The reason phrase may be absent or empty; anything after the code is
    // accepted as-is.
    code.parse().ok()
}
