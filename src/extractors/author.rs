//! Author extraction.
//!
//! Strategies, in default priority:
//!
//! 1. JSON-LD `author` on eligible articles (objects, strings, lists, `@graph`)
//! 2. `<meta>` tags whose `name` or `property` contains "author"
//! 3. Byline markup (`span.author`, `div.author-name`, `p.byline`, ...)
//! 4. "By First Last" / "Written by First Last" in the page text
//!
//! [`AuthorPrecedence::MetadataFirst`] swaps the first two. Multiple names are
//! joined with `", "` in the final record.

use super::{Chain, Strategy};
use crate::config::AuthorPrecedence;
use crate::document::{Document, compile_selectors};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

pub const SENTINEL: &str = "Unknown Author";

static BYLINE_MARKUP: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[
        "span.author",
        "div.author-name",
        "p.byline",
        r#"a[rel="author"]"#,
        r#"meta[name="author"]"#,
    ])
});

static BYLINE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Written by|By)\s+([A-Z][a-z]+\s[A-Z][a-z]+)").expect("static regex")
});

fn from_structured_data(doc: &Document) -> Option<Vec<String>> {
    Some(doc.structured_data().authors())
}

fn from_metadata(doc: &Document) -> Option<Vec<String>> {
    doc.meta_content(|name| name.to_lowercase().contains("author"))
        .map(|author| vec![author])
}

fn from_markup(doc: &Document) -> Option<Vec<String>> {
    doc.select_first(&BYLINE_MARKUP).map(|author| vec![author])
}

fn from_byline_text(doc: &Document) -> Option<Vec<String>> {
    let text = doc.flattened_text();
    BYLINE_TEXT
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| vec![m.as_str().to_string()])
}

pub fn chain(precedence: AuthorPrecedence) -> Chain<Vec<String>> {
    let structured = Strategy::new("json_ld", from_structured_data);
    let metadata = Strategy::new("meta_tags", from_metadata);
    let chain = Chain::new("author");
    let chain = match precedence {
        AuthorPrecedence::StructuredDataFirst => chain.then(structured).then(metadata),
        AuthorPrecedence::MetadataFirst => chain.then(metadata).then(structured),
    };
    chain
        .then(Strategy::new("html_selectors", from_markup))
        .then(Strategy::new("byline_regex", from_byline_text))
}

/// Join author names the way the record stores them.
pub fn join(names: &[String]) -> String {
    names.join(", ")
}

/// Run the author chain, falling back to [`SENTINEL`].
pub fn extract(doc: &Document, precedence: AuthorPrecedence) -> String {
    chain(precedence)
        .run(doc)
        .map_or_else(|| SENTINEL.to_string(), |hit| join(&hit.value))
}
