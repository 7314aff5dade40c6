//! # News Scrape
//!
//! Extracts the title, author, publish date and body text of a news article
//! from its URL.
//!
//! ## Architecture
//!
//! 1. **Guarding**: the URL is checked before any network activity
//! 2. **Fetching**: the page is retrieved with a bounded, fixed-backoff retry
//! 3. **Parsing**: the markup and its JSON-LD blocks are parsed once
//! 4. **Extraction**: each field runs its own ordered strategy chain; a field
//!    no strategy can derive carries a sentinel value
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> news_scrape::Result<()> {
//! let record = news_scrape::extract("https://example.com/news/story").await?;
//! println!("{} by {}", record.title, record.author);
//! # Ok(())
//! # }
//! ```
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the caller.

pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod guard;
pub mod outputs;
pub mod pipeline;
pub mod record;
pub mod structured_data;
pub mod utils;

pub use config::ScraperConfig;
pub use error::{Error, Result, ValidationError};
pub use pipeline::Scraper;
pub use record::{ExtractedRecord, ExtractionBatch};

/// Extract one article with the default configuration.
///
/// # Errors
///
/// [`Error::Validation`] for a malformed URL (no request is made) and
/// [`Error::Fetch`] once every fetch attempt has failed.
pub async fn extract(url: &str) -> Result<ExtractedRecord> {
    Scraper::new(&ScraperConfig::default())?.extract(url).await
}
