//! Core data models for the conversion pipeline.
//!
//! These types represent the records and documents that flow from the
//! archive reader through transformation into the output store.

/// Ordered string-to-string map used for WARC fields and HTTP headers.
///
/// Stores every occurrence of a key in insertion order. Lookup is
/// ASCII-case-insensitive and returns the *last* occurrence, so duplicate
/// headers resolve last-wins while multi-value consumers can still read
/// every occurrence via [`get_all`](HeaderMap::get_all).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair, preserving any existing occurrences.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Case-insensitive lookup; last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All pairs in insertion order, names verbatim as stored.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a JSON array of `[name, value]` pairs.
    ///
    /// An array rather than an object so that ordering and duplicate
    /// occurrences survive the trip into the store.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.entries
                .iter()
                .map(|(k, v)| serde_json::json!([k, v]))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One raw archive record as produced by the WARC reader.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// The `WARC-Type` field value (`response`, `request`, `warcinfo`, ...).
    pub record_type: String,
    /// All WARC named fields of the record header.
    pub metadata: HeaderMap,
    /// The record content block, verbatim bytes.
    pub content: Vec<u8>,
}

/// Normalized document emitted for downstream processing.
///
/// Built once per accepted record and handed whole to the output sink.
/// `metadata` contains every HTTP response header verbatim, plus an `IP`
/// entry when the capture recorded one.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    /// Target URI of the capture; always starts with `http`.
    pub url: String,
    /// The response `Content-Type` header, when present.
    pub content_type: Option<String>,
    /// HTTP body bytes — not the raw record block.
    pub content: Vec<u8>,
    pub metadata: HeaderMap,
}
