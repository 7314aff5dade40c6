//! The end-to-end extraction pipeline.
//!
//! ```text
//! url -> [url guard] -> Fetcher -> Document -> [document guard]
//!     -> title / author / publish date / content chains -> ExtractedRecord
//! ```
//!
//! A [`Scraper`] holds no per-request state, so one instance can serve many
//! URLs at once. Each request owns its [`Document`] and drops it when the
//! record is assembled.

use crate::config::ScraperConfig;
use crate::document::Document;
use crate::error::Result;
use crate::extractors::{Chain, author, content, date, title};
use crate::fetcher::{Fetcher, HttpSource, PageSource};
use crate::guard::{self, ExtractionGuard};
use crate::record::{ExtractedFields, ExtractedRecord};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// The four field chains, built once from configuration.
pub struct FieldExtractors {
    title: Chain<String>,
    author: Chain<Vec<String>>,
    publish_date: Chain<String>,
    content: Chain<String>,
}

impl FieldExtractors {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            title: title::chain(),
            author: author::chain(config.precedence.author),
            publish_date: date::chain(config.precedence.date),
            content: content::chain(config.content.min_paragraph_chars),
        }
    }

    /// Run every chain over `doc`. Missing values stay `None`.
    pub fn extract(&self, doc: &Document) -> ExtractedFields {
        ExtractedFields {
            title: self.title.run(doc).map(|hit| hit.value),
            authors: self.author.run(doc).map(|hit| hit.value),
            publish_date: self.publish_date.run(doc).map(|hit| hit.value),
            content: content::run(&self.content, doc).map(|hit| hit.value),
        }
    }
}

impl Default for FieldExtractors {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

/// Fetches a URL and turns the page into an [`ExtractedRecord`].
pub struct Scraper<S = HttpSource> {
    fetcher: Fetcher<S>,
    extractors: FieldExtractors,
    url_guard: ExtractionGuard<str>,
    document_guard: ExtractionGuard<Document, ()>,
}

impl Scraper<HttpSource> {
    /// A scraper using the real HTTP client.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::from_config(&config.fetch)?, config))
    }
}

impl<S: PageSource> Scraper<S> {
    /// A scraper over any page source, retried per `config.fetch`.
    pub fn with_source(source: S, config: &ScraperConfig) -> Self {
        let fetcher = Fetcher::new(source, config.fetch.max_attempts, config.fetch.backoff());
        Self::with_fetcher(fetcher, config)
    }

    pub fn with_fetcher(fetcher: Fetcher<S>, config: &ScraperConfig) -> Self {
        Self {
            fetcher,
            extractors: FieldExtractors::from_config(config),
            url_guard: guard::url_guard(),
            document_guard: guard::document_guard(),
        }
    }

    /// Fetch `url` and extract its record.
    ///
    /// A malformed URL is rejected before any network activity. A page that
    /// cannot be retrieved within the retry budget yields one
    /// [`Error::Fetch`](crate::Error::Fetch). Otherwise every record field is
    /// populated, with sentinels where nothing was found.
    #[instrument(level = "info", skip(self))]
    pub async fn extract(&self, url: &str) -> Result<ExtractedRecord> {
        self.url_guard
            .run_async(url, |url| async move {
                let raw = self.fetcher.fetch(url).await?;
                self.extract_html(url, &raw.body)
            })
            .await
    }

    /// Extract a record from markup the caller already holds.
    #[instrument(level = "debug", skip(self, markup), fields(bytes = markup.len()))]
    pub fn extract_html(&self, url: &str, markup: &str) -> Result<ExtractedRecord> {
        let t0 = Instant::now();
        let doc = Document::parse(markup);
        let record = self.document_guard.run(&doc, |doc| {
            Ok::<_, crate::Error>(ExtractedRecord::assemble(url, self.extractors.extract(doc)))
        })?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            missing = ?record.missing_fields(),
            "Extracted record"
        );
        Ok(record)
    }

    /// Run the pipeline over many URLs with at most `concurrency` in flight.
    ///
    /// Results come back in completion order, one per input URL. A failure
    /// for one URL never affects the others.
    #[instrument(level = "info", skip_all, fields(count = urls.len(), concurrency = concurrency))]
    pub async fn extract_many(
        &self,
        urls: Vec<String>,
        concurrency: usize,
    ) -> Vec<(String, Result<ExtractedRecord>)> {
        let t0 = Instant::now();
        let outcomes: Vec<(String, Result<ExtractedRecord>)> = stream::iter(urls)
            .map(|url| async move {
                let result = self.extract(&url).await;
                if let Err(e) = &result {
                    error!(%url, error = %e, "Extraction failed");
                }
                (url, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let succeeded = outcomes.iter().filter(|(_, r)| r.is_ok()).count();
        info!(
            total = outcomes.len(),
            succeeded,
            failed = outcomes.len() - succeeded,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Batch extraction complete"
        );
        outcomes
    }
}
