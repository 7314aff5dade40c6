//! Runtime configuration for the scraper.
//!
//! Every field has a default, so an empty YAML file (or no file at all) yields
//! the stock behaviour: three attempts, ten-second timeout, two-second backoff,
//! `dateModified` preferred over `datePublished`, structured-data authors
//! preferred over metadata authors.
//!
//! ```yaml
//! fetch:
//!   max_attempts: 3
//!   timeout_secs: 10
//!   backoff_secs: 2
//! precedence:
//!   date: modified_first
//!   author: structured_data_first
//! content:
//!   min_paragraph_chars: 50
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Desktop browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub fetch: FetchConfig,
    pub precedence: Precedence,
    pub content: ContentConfig,
}

/// Retry policy for the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Per-attempt timeout.
    pub timeout_secs: u64,
    /// Fixed pause between failed attempts.
    pub backoff_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout_secs: 10,
            backoff_secs: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

/// Which structured-data date wins when an article carries both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecedence {
    #[default]
    ModifiedFirst,
    PublishedFirst,
}

impl DatePrecedence {
    /// JSON-LD keys in the order they are consulted.
    pub fn keys(self) -> [&'static str; 2] {
        match self {
            DatePrecedence::ModifiedFirst => ["dateModified", "datePublished"],
            DatePrecedence::PublishedFirst => ["datePublished", "dateModified"],
        }
    }
}

/// Whether structured-data authors are tried before `<meta>` authors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorPrecedence {
    #[default]
    StructuredDataFirst,
    MetadataFirst,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Precedence {
    pub date: DatePrecedence,
    pub author: AuthorPrecedence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Paragraphs must be strictly longer than this (in characters) to count as body text.
    pub min_paragraph_chars: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: 50,
        }
    }
}

impl ScraperConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Load the configuration from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_yaml(&raw).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(?config.precedence, max_attempts = config.fetch.max_attempts, "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(10));
        assert_eq!(config.fetch.backoff(), Duration::from_secs(2));
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.precedence.date, DatePrecedence::ModifiedFirst);
        assert_eq!(config.precedence.author, AuthorPrecedence::StructuredDataFirst);
        assert_eq!(config.content.min_paragraph_chars, 50);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ScraperConfig::from_yaml("").unwrap(), ScraperConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
fetch:
  max_attempts: 5
precedence:
  date: published_first
"#;
        let config = ScraperConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.precedence.date, DatePrecedence::PublishedFirst);
        assert_eq!(config.precedence.author, AuthorPrecedence::StructuredDataFirst);
    }

    #[test]
    fn test_date_precedence_keys() {
        assert_eq!(
            DatePrecedence::ModifiedFirst.keys(),
            ["dateModified", "datePublished"]
        );
        assert_eq!(
            DatePrecedence::PublishedFirst.keys(),
            ["datePublished", "dateModified"]
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ScraperConfig::load("/definitely/not/here.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
