//! Page retrieval with a bounded, fixed-backoff retry policy.
//!
//! # Architecture
//!
//! - [`PageSource`]: one attempt at retrieving a page
//! - [`HttpSource`]: the `reqwest` implementation, sending a desktop-browser
//!   User-Agent with a per-attempt timeout
//! - [`Fetcher`]: wraps any [`PageSource`] with the retry policy
//!
//! # Retry Strategy
//!
//! - 3 attempts by default
//! - A non-200 status and a transport error both count as a failed attempt
//! - A fixed pause (2 seconds by default) between failed attempts
//! - Once attempts run out, one [`Error::Fetch`] describes the whole failure
//!
//! Dropping the future returned by [`Fetcher::fetch`] abandons the remaining
//! attempts for that URL only.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// A page body together with the status it was served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Why a single attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// One attempt at retrieving a page.
///
/// Implementations succeed only for a 200 response.
pub trait PageSource {
    fn get(&self, url: &str) -> impl Future<Output = std::result::Result<RawDocument, AttemptError>> + Send;
}

/// [`PageSource`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a client carrying the configured User-Agent and per-attempt timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    async fn get(&self, url: &str) -> std::result::Result<RawDocument, AttemptError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        Ok(RawDocument {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// Wraps a [`PageSource`] with the retry policy.
#[derive(Debug, Clone)]
pub struct Fetcher<S = HttpSource> {
    source: S,
    max_attempts: u32,
    backoff: Duration,
}

impl Fetcher<HttpSource> {
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(
            HttpSource::new(config)?,
            config.max_attempts,
            config.backoff(),
        ))
    }
}

impl<S: PageSource> Fetcher<S> {
    /// `max_attempts` is clamped to at least one.
    pub fn new(source: S, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            source,
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Retrieve `url`, retrying failed attempts after a fixed pause.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<RawDocument> {
        let total_t0 = Instant::now();
        let mut last_failure = String::new();

        for attempt in 1..=self.max_attempts {
            let attempt_t0 = Instant::now();
            match self.source.get(url).await {
                Ok(doc) => {
                    info!(
                        attempt,
                        status = doc.status,
                        bytes = doc.body.len(),
                        elapsed_ms = attempt_t0.elapsed().as_millis() as u64,
                        "Fetched page"
                    );
                    return Ok(doc);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms = attempt_t0.elapsed().as_millis() as u64,
                        error = %e,
                        "Fetch attempt failed"
                    );
                    last_failure = e.to_string();
                }
            }

            if attempt < self.max_attempts {
                debug!(attempt, delay = ?self.backoff, "Backing off before retry");
                sleep(self.backoff).await;
            }
        }

        error!(
            attempts = self.max_attempts,
            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
            error = %last_failure,
            "Fetch exhausted retries"
        );
        Err(Error::Fetch {
            url: url.to_string(),
            attempts: self.max_attempts,
            reason: last_failure,
        })
    }
}
