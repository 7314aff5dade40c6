//! The output record and its assembly.
//!
//! - [`ExtractedFields`]: raw chain results, any of which may be missing
//! - [`ExtractedRecord`]: the fully populated record handed to callers
//! - [`ExtractionBatch`]: one CLI run's records and failures, as written to JSON
//!
//! Every record field is always populated. A field no strategy could derive
//! holds its sentinel (`Unknown Title`, `Unknown Author`, `Unknown Date`,
//! `No content available`) so consumers never branch on absent keys.

use crate::error::Result;
use crate::extractors::{author, content, date, title};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Chain results for one document before sentinels are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publish_date: Option<String>,
    pub content: Option<String>,
}

/// A news article as extracted from one page.
///
/// The serialized shape (`url`, `title`, `content`, `author`,
/// `publish_date`) is what the storage layer builds its rows from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractedRecord {
    /// The URL the page was requested from.
    pub url: String,
    pub title: String,
    /// Comma-separated when the page names several authors.
    pub author: String,
    /// Body paragraphs joined with newlines.
    pub content: String,
    /// The date string as found on the page, not normalized.
    pub publish_date: String,
}

impl ExtractedRecord {
    /// Combine chain results into a record, substituting sentinels.
    ///
    /// A missing title or body is logged as a data-quality warning; it is
    /// never an error.
    pub fn assemble(url: &str, fields: ExtractedFields) -> Self {
        if fields.title.is_none() {
            warn!(%url, "No title found; record will carry the sentinel");
        }
        if fields.content.is_none() {
            warn!(%url, "No content found; record will carry the sentinel");
        }

        Self {
            url: url.to_string(),
            title: fields.title.unwrap_or_else(|| title::SENTINEL.to_string()),
            author: fields
                .authors
                .filter(|names| !names.is_empty())
                .map_or_else(|| author::SENTINEL.to_string(), |names| author::join(&names)),
            content: fields
                .content
                .unwrap_or_else(|| content::SENTINEL.to_string()),
            publish_date: fields
                .publish_date
                .unwrap_or_else(|| date::SENTINEL.to_string()),
        }
    }

    /// Names of the fields that hold their sentinel.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title == title::SENTINEL {
            missing.push("title");
        }
        if self.author == author::SENTINEL {
            missing.push("author");
        }
        if self.publish_date == date::SENTINEL {
            missing.push("publish_date");
        }
        if self.content == content::SENTINEL {
            missing.push("content");
        }
        missing
    }
}

/// A URL the pipeline could not turn into a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FailedUrl {
    pub url: String,
    pub error: String,
}

/// The outcome of one batch run.
///
/// # Fields
///
/// * `local_date` - Run date in `YYYY-MM-DD` format
/// * `local_time` - Run time in `HH:MM:SS` format
/// * `records` - Every successfully extracted record
/// * `failures` - Every URL that was rejected or could not be fetched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionBatch {
    pub local_date: String,
    pub local_time: String,
    pub records: Vec<ExtractedRecord>,
    pub failures: Vec<FailedUrl>,
}

impl ExtractionBatch {
    /// Split pipeline outcomes into records and failures, stamped with the local time.
    pub fn from_outcomes(outcomes: Vec<(String, Result<ExtractedRecord>)>) -> Self {
        let now = Local::now();
        let mut batch = Self {
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            ..Default::default()
        };
        for (url, outcome) in outcomes {
            match outcome {
                Ok(record) => batch.records.push(record),
                Err(e) => batch.failures.push(FailedUrl {
                    url,
                    error: e.to_string(),
                }),
            }
        }
        batch
    }
}
