//! Field extractors built as prioritized strategy chains.
//!
//! Each field (title, author, publish date, content) is produced by a
//! [`Chain`]: an ordered list of named [`ExtractionStrategy`] implementations.
//! The chain returns the first non-empty result and falls back to the
//! field's sentinel when every strategy comes up empty. Order is the whole
//! contract: there is no scoring, earlier strategies always win.
//!
//! # Submodules
//!
//! | Field | Module | Sentinel |
//! |-------|--------|----------|
//! | Title | [`title`] | `Unknown Title` |
//! | Author | [`author`] | `Unknown Author` |
//! | Publish date | [`date`] | `Unknown Date` |
//! | Body text | [`content`] | `No content available` |

pub mod author;
pub mod content;
pub mod date;
pub mod title;

use crate::document::Document;
use tracing::{debug, warn};

/// One heuristic for deriving a field value from a document.
pub trait ExtractionStrategy<T>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `None` (or an empty value) means "no opinion, try the next strategy".
    fn extract(&self, doc: &Document) -> Option<T>;
}

/// A strategy backed by a plain function.
pub struct Strategy<T> {
    name: &'static str,
    run: fn(&Document) -> Option<T>,
}

impl<T> Strategy<T> {
    pub const fn new(name: &'static str, run: fn(&Document) -> Option<T>) -> Self {
        Self { name, run }
    }
}

impl<T> ExtractionStrategy<T> for Strategy<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, doc: &Document) -> Option<T> {
        (self.run)(doc)
    }
}

/// Values a chain can produce. Blank values never win.
pub trait Candidate {
    fn is_blank(&self) -> bool;
}

impl Candidate for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Candidate for Vec<String> {
    fn is_blank(&self) -> bool {
        self.iter().all(Candidate::is_blank)
    }
}

/// The winning value and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<T> {
    pub strategy: &'static str,
    pub value: T,
}

/// An ordered list of strategies for one field.
pub struct Chain<T> {
    field: &'static str,
    strategies: Vec<Box<dyn ExtractionStrategy<T>>>,
}

impl<T: Candidate> Chain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy at the lowest priority so far.
    pub fn then(mut self, strategy: impl ExtractionStrategy<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Strategy names in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the strategies in order and return the first non-blank result.
    ///
    /// `None` means the chain is exhausted; the caller substitutes the sentinel.
    pub fn run(&self, doc: &Document) -> Option<Hit<T>> {
        for strategy in &self.strategies {
            match strategy.extract(doc) {
                Some(value) if !value.is_blank() => {
                    debug!(field = self.field, strategy = strategy.name(), "Strategy matched");
                    return Some(Hit {
                        strategy: strategy.name(),
                        value,
                    });
                }
                _ => debug!(field = self.field, strategy = strategy.name(), "Strategy found nothing"),
            }
        }
        warn!(field = self.field, "No extraction strategy produced a value; using sentinel");
        None
    }
}
