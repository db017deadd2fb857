//! Rule-based accept/reject filter for normalized documents.
//!
//! Rules come from the `[[filter.rules]]` section of the config file and
//! are compiled once per job, before any record is read — an invalid
//! pattern fails the whole batch up front, so a misconfigured filter never
//! produces partial output. The compiled filter is immutable and
//! `Send + Sync`, so a parallel driver can share it by reference.

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::{RuleConfig, RuleMode};
use crate::models::NormalizedDocument;

/// One compiled predicate rule.
#[derive(Debug)]
struct CompiledRule {
    name: String,
    field: String,
    mode: RuleMode,
    pattern: Regex,
    match_missing: bool,
}

/// Evaluates a document against every configured rule (logical AND).
///
/// An empty rule set keeps everything.
#[derive(Debug)]
pub struct DocumentFilter {
    rules: Vec<CompiledRule>,
}

impl DocumentFilter {
    /// Compile all configured rules. Fails fast on an invalid pattern.
    pub fn from_rules(rules: &[RuleConfig]) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&rule.pattern)
                    .with_context(|| format!("invalid pattern in filter rule '{}'", rule.name))?;
                Ok(CompiledRule {
                    name: rule.name.clone(),
                    field: rule.field.clone(),
                    mode: rule.mode,
                    pattern,
                    match_missing: rule.match_missing,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules: compiled })
    }

    /// A filter with no rules; keeps every document.
    pub fn keep_all() -> Self {
        Self { rules: Vec::new() }
    }

    /// True when the document satisfies every rule.
    pub fn keep(&self, doc: &NormalizedDocument) -> bool {
        self.rules.iter().all(|rule| {
            let matched = match resolve_field(doc, &rule.field) {
                Some(value) => rule.pattern.is_match(value),
                None => rule.match_missing,
            };
            let kept = match rule.mode {
                RuleMode::MustMatch => matched,
                RuleMode::MustNotMatch => !matched,
            };
            if !kept {
                tracing::debug!(rule = %rule.name, url = %doc.url, "filter rejected document");
            }
            kept
        })
    }
}

/// Map a rule field name to the document value it inspects.
///
/// `url` and `content_type` address the document itself; every other name
/// is a metadata lookup (case-insensitive, last occurrence wins).
fn resolve_field<'a>(doc: &'a NormalizedDocument, field: &str) -> Option<&'a str> {
    match field {
        "url" => Some(doc.url.as_str()),
        "content_type" => doc.content_type.as_deref(),
        other => doc.metadata.get(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeaderMap;

    fn rule(field: &str, mode: RuleMode, pattern: &str) -> RuleConfig {
        RuleConfig {
            name: format!("{field}-rule"),
            field: field.to_string(),
            mode,
            pattern: pattern.to_string(),
            match_missing: false,
        }
    }

    fn html_doc() -> NormalizedDocument {
        let mut metadata = HeaderMap::new();
        metadata.insert("Content-Type", "text/html");
        metadata.insert("Server", "nginx");
        NormalizedDocument {
            url: "http://example.com/index.html".to_string(),
            content_type: Some("text/html".to_string()),
            content: b"<html></html>".to_vec(),
            metadata,
        }
    }

    #[test]
    fn test_empty_rule_set_keeps_everything() {
        assert!(DocumentFilter::keep_all().keep(&html_doc()));
    }

    #[test]
    fn test_must_match_accepts_and_rejects() {
        let filter = DocumentFilter::from_rules(&[rule(
            "content_type",
            RuleMode::MustMatch,
            "^text/",
        )])
        .unwrap();
        assert!(filter.keep(&html_doc()));

        let mut doc = html_doc();
        doc.content_type = Some("image/png".to_string());
        assert!(!filter.keep(&doc));
    }

    #[test]
    fn test_must_not_match_rejects_on_match() {
        let filter =
            DocumentFilter::from_rules(&[rule("url", RuleMode::MustNotMatch, r"\.exe$")]).unwrap();
        assert!(filter.keep(&html_doc()));

        let mut doc = html_doc();
        doc.url = "http://example.com/setup.exe".to_string();
        assert!(!filter.keep(&doc));
    }

    #[test]
    fn test_conjunction_across_rules() {
        let filter = DocumentFilter::from_rules(&[
            rule("content_type", RuleMode::MustMatch, "html"),
            rule("Server", RuleMode::MustMatch, "nginx"),
        ])
        .unwrap();
        assert!(filter.keep(&html_doc()));

        // Failing either rule rejects.
        let mut doc = html_doc();
        doc.content_type = Some("text/css".to_string());
        assert!(!filter.keep(&doc));
    }

    #[test]
    fn test_missing_field_under_must_match_rejects() {
        let filter =
            DocumentFilter::from_rules(&[rule("X-Absent", RuleMode::MustMatch, ".*")]).unwrap();
        assert!(!filter.keep(&html_doc()));
    }

    #[test]
    fn test_missing_field_with_match_missing_keeps() {
        let mut cfg = rule("X-Absent", RuleMode::MustMatch, ".*");
        cfg.match_missing = true;
        let filter = DocumentFilter::from_rules(&[cfg]).unwrap();
        assert!(filter.keep(&html_doc()));
    }

    #[test]
    fn test_missing_field_under_must_not_match_keeps() {
        let filter =
            DocumentFilter::from_rules(&[rule("X-Absent", RuleMode::MustNotMatch, ".*")]).unwrap();
        assert!(filter.keep(&html_doc()));
    }

    #[test]
    fn test_metadata_lookup_is_case_insensitive() {
        let filter =
            DocumentFilter::from_rules(&[rule("server", RuleMode::MustMatch, "nginx")]).unwrap();
        assert!(filter.keep(&html_doc()));
    }

    #[test]
    fn test_invalid_pattern_fails_construction() {
        let err = DocumentFilter::from_rules(&[rule("url", RuleMode::MustMatch, "(unclosed")])
            .unwrap_err();
        assert!(err.to_string().contains("url-rule"));
    }
}
