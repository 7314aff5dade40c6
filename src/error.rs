//! Error types for the extraction pipeline.
//!
//! Only URL-level failures surface to callers: a rejected input
//! ([`ValidationError`]) or a page that could not be retrieved
//! ([`Error::Fetch`]). Structured-data parse failures and missing fields are
//! recovered inside the extractors and only ever logged.

/// Precondition failures raised by an [`ExtractionGuard`](crate::guard::ExtractionGuard).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The URL does not look like `scheme://host[/path]`.
    #[error("Invalid URL format: {0:?}")]
    MalformedUrl(String),

    /// The document handed to the extractors carries no markup.
    #[error("Invalid or empty HTML content provided")]
    EmptyDocument,

    /// A selector is empty or cannot be parsed as CSS.
    #[error("Invalid selector at index {index}: {selector:?}")]
    InvalidSelector { index: usize, selector: String },

    /// A selector carries leading or trailing whitespace.
    #[error("Selector at index {index} contains leading/trailing spaces: {selector:?}")]
    PaddedSelector { index: usize, selector: String },
}

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any work was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Every fetch attempt failed.
    #[error("Failed to retrieve {url} after {attempts} attempts (last failure: {reason})")]
    Fetch {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// The configuration file could not be loaded.
    #[error("Failed to load config {path}: {reason}")]
    Config { path: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// `true` when the failure happened before any network activity.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
