//! Pull-based reader over a WARC archive stream.
//!
//! Yields one [`RawRecord`] per call until end of input. Only the framing
//! subset the pipeline needs is read: the `WARC/<version>` line, named
//! fields up to a blank line, then a `Content-Length`-delimited content
//! block. Line endings may be CRLF or bare LF, and stray blank lines
//! between records are tolerated — both show up in real archives.
//!
//! Framing damage (bad version line, missing or lying `Content-Length`,
//! truncation) is a hard error: unlike a record whose *content* is junk,
//! a broken record boundary means nothing after it can be trusted.

use anyhow::{bail, Context, Result};
use std::io::BufRead;

use crate::models::{HeaderMap, RawRecord};

pub struct WarcReader<R: BufRead> {
    input: R,
    /// Zero-based index of the next record, for error context.
    record_index: usize,
}

impl<R: BufRead> WarcReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            record_index: 0,
        }
    }

    /// Read the next record, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        // Skip record separators / stray blank lines before the version line.
        let version = loop {
            match self.read_line()? {
                None => return Ok(None),
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
            }
        };

        if !version.starts_with("WARC/") {
            bail!(
                "record {}: expected WARC version line, found {:?}",
                self.record_index,
                version
            );
        }

        let mut metadata = HeaderMap::new();
        loop {
            match self.read_line()? {
                None => bail!(
                    "record {}: end of input inside record header",
                    self.record_index
                ),
                Some(line) if line.is_empty() => break,
                Some(line) => match line.split_once(':') {
                    Some((name, value)) => metadata.insert(name.trim(), value.trim()),
                    None => bail!(
                        "record {}: malformed WARC field line {:?}",
                        self.record_index,
                        line
                    ),
                },
            }
        }

        let length: usize = metadata
            .get("Content-Length")
            .with_context(|| format!("record {}: missing Content-Length", self.record_index))?
            .parse()
            .with_context(|| format!("record {}: invalid Content-Length", self.record_index))?;

        let mut content = vec![0u8; length];
        self.input
            .read_exact(&mut content)
            .with_context(|| format!("record {}: truncated content block", self.record_index))?;

        let record_type = metadata.get("WARC-Type").unwrap_or_default().to_string();
        self.record_index += 1;

        Ok(Some(RawRecord {
            record_type,
            metadata,
            content,
        }))
    }

    /// One header line with its terminator and any trailing CR stripped.
    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self.input.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
        }
        if buf.ends_with(b"\r") {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record_bytes(record_type: &str, uri: Option<&str>, content: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"WARC/1.0\r\n");
        out.extend_from_slice(format!("WARC-Type: {record_type}\r\n").as_bytes());
        if let Some(uri) = uri {
            out.extend_from_slice(format!("WARC-Target-URI: {uri}\r\n").as_bytes());
        }
        out.extend_from_slice(b"WARC-Record-ID: <urn:test:1>\r\n");
        out.extend_from_slice(format!("Content-Length: {}\r\n", content.len()).as_bytes());
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(content);
        out.extend_from_slice(b"\r\n\r\n");
        out
    }

    fn reader(bytes: Vec<u8>) -> WarcReader<Cursor<Vec<u8>>> {
        WarcReader::new(Cursor::new(bytes))
    }

    #[test]
    fn test_reads_single_record() {
        let mut r = reader(record_bytes(
            "response",
            Some("http://example.com/"),
            b"HTTP/1.1 200 OK\r\n\r\nhi",
        ));
        let record = r.next_record().unwrap().unwrap();
        assert_eq!(record.record_type, "response");
        assert_eq!(
            record.metadata.get("warc-target-uri"),
            Some("http://example.com/")
        );
        assert_eq!(record.content, b"HTTP/1.1 200 OK\r\n\r\nhi");
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn test_reads_multiple_records_in_order() {
        let mut bytes = record_bytes("warcinfo", None, b"software: test");
        bytes.extend(record_bytes("response", Some("http://a/"), b"x"));
        bytes.extend(record_bytes("request", Some("http://a/"), b"GET / HTTP/1.1"));

        let mut r = reader(bytes);
        let types: Vec<String> = std::iter::from_fn(|| r.next_record().unwrap())
            .map(|rec| rec.record_type)
            .collect();
        assert_eq!(types, vec!["warcinfo", "response", "request"]);
    }

    #[test]
    fn test_binary_content_preserved() {
        let body: Vec<u8> = (0..=255u8).collect();
        let mut r = reader(record_bytes("resource", None, &body));
        let record = r.next_record().unwrap().unwrap();
        assert_eq!(record.content, body);
    }

    #[test]
    fn test_lf_only_archive() {
        let bytes = b"WARC/1.0\nWARC-Type: response\nContent-Length: 2\n\nok\n\n".to_vec();
        let mut r = reader(bytes);
        let record = r.next_record().unwrap().unwrap();
        assert_eq!(record.record_type, "response");
        assert_eq!(record.content, b"ok");
    }

    #[test]
    fn test_missing_content_length_is_error() {
        let bytes = b"WARC/1.0\r\nWARC-Type: response\r\n\r\n".to_vec();
        let err = reader(bytes).next_record().unwrap_err();
        assert!(err.to_string().contains("Content-Length"));
    }

    #[test]
    fn test_truncated_content_is_error() {
        let mut bytes = record_bytes("response", None, b"full body here");
        bytes.truncate(bytes.len() - 20);
        let err = reader(bytes).next_record().unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_garbage_version_line_is_error() {
        let err = reader(b"ARC/0.9\r\n\r\n".to_vec()).next_record().unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(reader(Vec::new()).next_record().unwrap().is_none());
    }
}
