//! Publish-date extraction.
//!
//! Dates are returned exactly as the page states them; no format
//! normalization happens here.

use super::{Chain, ExtractionStrategy, Strategy};
use crate::config::DatePrecedence;
use crate::document::{Document, compile_selectors};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

pub const SENTINEL: &str = "Unknown Date";

static PUBLISHED_TIME_META: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="article:published_time"]"#,
    ])
});

static DATE_MARKUP: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[
        "time.publish-date",
        "span.date",
        "div.pub-date",
        r#"meta[name="publish-date"]"#,
        r#"meta[name="dcterms.modified"]"#,
    ])
});

static PUBLISHED_ON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Published on\s+((?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4})",
    )
    .expect("static regex")
});

/// JSON-LD date lookup with a configurable key order.
///
/// Every eligible article is scanned in document order; on each one the
/// preferred key is tried before the other.
#[derive(Debug, Clone, Copy)]
pub struct StructuredDate {
    keys: [&'static str; 2],
}

impl StructuredDate {
    pub fn new(precedence: DatePrecedence) -> Self {
        Self {
            keys: precedence.keys(),
        }
    }
}

impl ExtractionStrategy<String> for StructuredDate {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        doc.structured_data().first_string(&self.keys)
    }
}

fn from_published_time(doc: &Document) -> Option<String> {
    doc.select_first(&PUBLISHED_TIME_META)
}

fn from_markup(doc: &Document) -> Option<String> {
    doc.select_first(&DATE_MARKUP)
}

fn from_text(doc: &Document) -> Option<String> {
    let text = doc.flattened_text();
    PUBLISHED_ON
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn chain(precedence: DatePrecedence) -> Chain<String> {
    Chain::new("publish_date")
        .then(StructuredDate::new(precedence))
        .then(Strategy::new("meta_published_time", from_published_time))
        .then(Strategy::new("html_selectors", from_markup))
        .then(Strategy::new("published_on_regex", from_text))
}

/// Run the publish-date chain, falling back to [`SENTINEL`].
pub fn extract(doc: &Document, precedence: DatePrecedence) -> String {
    chain(precedence)
        .run(doc)
        .map_or_else(|| SENTINEL.to_string(), |hit| hit.value)
}
