use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Glob patterns selecting archive files when the input path is a
    /// directory. Ignored for a single-file input.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.warc".to_string()]
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FilterConfig {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One predicate rule as written in the config file.
///
/// `field` is `url`, `content_type`, or a document metadata key (HTTP
/// header name, matched case-insensitively). The pattern is compiled at
/// filter construction, before any record is processed.
#[derive(Debug, Deserialize, Clone)]
pub struct RuleConfig {
    pub name: String,
    pub field: String,
    pub mode: RuleMode,
    pub pattern: String,
    /// How a `must_match` rule treats a document where `field` is absent.
    /// Defaults to false: an absent field does not match, so the document
    /// is rejected.
    #[serde(default)]
    pub match_missing: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    MustMatch,
    MustNotMatch,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.input.include_globs.is_empty() {
        anyhow::bail!("input.include_globs must not be empty");
    }

    for rule in &config.filter.rules {
        if rule.name.trim().is_empty() {
            anyhow::bail!("filter rule names must not be blank");
        }
        if rule.field.trim().is_empty() {
            anyhow::bail!("filter rule '{}' has a blank field", rule.name);
        }
    }

    Ok(config)
}
