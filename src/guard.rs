//! Validate-then-clean middleware for the pipeline's input boundaries.
//!
//! An [`ExtractionGuard`] wraps one operation with two optional hooks:
//!
//! - `validate` runs first with the operation's argument. If it passes, the
//!   operation runs and its result is returned unchanged.
//! - If `validate` fails, `clean` (when present) is handed the same argument
//!   and may propose a repaired form. The proposal is only logged; the
//!   original validation error is always returned and the operation never runs.
//!
//! ```text
//! Idle -> Validating -> Valid   -> Executing -> Done
//!                    -> Invalid -> Cleaning  -> Reraise
//! ```
//!
//! The pipeline guards the URL before fetching ([`url_guard`]) and the parsed
//! document before field extraction ([`document_guard`]). Caller-supplied
//! selector lists go through [`selector_guard`].

use crate::document::Document;
use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

/// `scheme://host[/path][?query][#fragment]`
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+(?:[/?#]\S*)?$").expect("static regex")
});

/// Lifecycle of one guarded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    Validating,
    Valid,
    Invalid,
    Cleaning,
    Executing,
    Done,
    Reraise,
}

impl fmt::Display for GuardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GuardState::Idle => "idle",
            GuardState::Validating => "validating",
            GuardState::Valid => "valid",
            GuardState::Invalid => "invalid",
            GuardState::Cleaning => "cleaning",
            GuardState::Executing => "executing",
            GuardState::Done => "done",
            GuardState::Reraise => "reraise",
        };
        f.write_str(name)
    }
}

type ValidateFn<A> = Box<dyn Fn(&A) -> Result<(), ValidationError> + Send + Sync>;
type CleanFn<A, R> = Box<dyn Fn(&A) -> Option<R> + Send + Sync>;

/// Validate/clean wrapper around an operation taking `&A`.
///
/// `R` is whatever the cleaner proposes as a repaired input.
pub struct ExtractionGuard<A: ?Sized, R = String> {
    label: &'static str,
    validate: Option<ValidateFn<A>>,
    clean: Option<CleanFn<A, R>>,
}

impl<A: ?Sized, R> fmt::Debug for ExtractionGuard<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionGuard")
            .field("label", &self.label)
            .field("validate", &self.validate.is_some())
            .field("clean", &self.clean.is_some())
            .finish()
    }
}

impl<A: ?Sized, R: fmt::Debug> ExtractionGuard<A, R> {
    /// A guard with no hooks; every call passes straight through.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            validate: None,
            clean: None,
        }
    }

    pub fn with_validate(
        mut self,
        validate: impl Fn(&A) -> Result<(), ValidationError> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_clean(mut self, clean: impl Fn(&A) -> Option<R> + Send + Sync + 'static) -> Self {
        self.clean = Some(Box::new(clean));
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    fn enter(&self, state: GuardState) {
        debug!(guard = self.label, %state, "Guard transition");
    }

    /// Run the validation half only, ending in `Valid` or `Reraise`.
    pub fn check(&self, arg: &A) -> Result<(), ValidationError> {
        self.enter(GuardState::Idle);
        self.enter(GuardState::Validating);
        let Some(validate) = &self.validate else {
            self.enter(GuardState::Valid);
            return Ok(());
        };
        match validate(arg) {
            Ok(()) => {
                self.enter(GuardState::Valid);
                Ok(())
            }
            Err(err) => {
                self.enter(GuardState::Invalid);
                warn!(guard = self.label, error = %err, "Validation failed");
                if let Some(clean) = &self.clean {
                    self.enter(GuardState::Cleaning);
                    match clean(arg) {
                        Some(repaired) => info!(guard = self.label, ?repaired, "Cleaner proposed a repair"),
                        None => debug!(guard = self.label, "Cleaner had no repair"),
                    }
                }
                self.enter(GuardState::Reraise);
                Err(err)
            }
        }
    }

    /// Validate `arg`, then run `op` with it.
    pub fn run<T, E>(&self, arg: &A, op: impl FnOnce(&A) -> Result<T, E>) -> Result<T, E>
    where
        E: From<ValidationError>,
    {
        self.check(arg)?;
        self.enter(GuardState::Executing);
        let out = op(arg);
        self.enter(GuardState::Done);
        out
    }

    /// Async counterpart of [`run`](Self::run).
    pub async fn run_async<'a, T, E, F, Fut>(&self, arg: &'a A, op: F) -> Result<T, E>
    where
        F: FnOnce(&'a A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ValidationError>,
    {
        self.check(arg)?;
        self.enter(GuardState::Executing);
        let out = op(arg).await;
        self.enter(GuardState::Done);
        out
    }
}

/// Reject anything that does not look like `scheme://host[/path]`.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if URL_PATTERN.is_match(url) {
        Ok(())
    } else {
        Err(ValidationError::MalformedUrl(url.to_string()))
    }
}

/// Best-effort repair: trim whitespace and drop the query string and fragment.
///
/// Returns `None` when that changes nothing.
pub fn clean_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    let cleaned = &trimmed[..end];
    (cleaned != url && !cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Reject a document with no markup behind it.
pub fn validate_document(doc: &Document) -> Result<(), ValidationError> {
    if doc.is_blank() {
        Err(ValidationError::EmptyDocument)
    } else {
        Ok(())
    }
}

/// Every selector must be non-empty, unpadded and parseable as CSS.
pub fn validate_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<(), ValidationError> {
    for (index, selector) in selectors.iter().enumerate() {
        let selector = selector.as_ref();
        if selector.trim().is_empty() {
            return Err(ValidationError::InvalidSelector {
                index,
                selector: selector.to_string(),
            });
        }
        if selector != selector.trim() {
            return Err(ValidationError::PaddedSelector {
                index,
                selector: selector.to_string(),
            });
        }
        if Selector::parse(selector).is_err() {
            return Err(ValidationError::InvalidSelector {
                index,
                selector: selector.to_string(),
            });
        }
    }
    Ok(())
}

/// Trim every selector and drop the empty ones. `None` when nothing changes.
pub fn clean_selectors<S: AsRef<str>>(selectors: &[S]) -> Option<Vec<String>> {
    let cleaned: Vec<String> = selectors
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let unchanged = cleaned.len() == selectors.len()
        && cleaned.iter().zip(selectors).all(|(c, s)| c == s.as_ref());
    (!unchanged).then_some(cleaned)
}

pub fn url_guard() -> ExtractionGuard<str> {
    ExtractionGuard::new("url")
        .with_validate(validate_url)
        .with_clean(clean_url)
}

pub fn document_guard() -> ExtractionGuard<Document, ()> {
    ExtractionGuard::new("document").with_validate(validate_document)
}

pub fn selector_guard() -> ExtractionGuard<[String], Vec<String>> {
    ExtractionGuard::new("selectors")
        .with_validate(|selectors: &[String]| validate_selectors(selectors))
        .with_clean(|selectors: &[String]| clean_selectors(selectors))
}
