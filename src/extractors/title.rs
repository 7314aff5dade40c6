//! Title extraction.
//!
//! Priority: visible headings, then JSON-LD `headline`/`name`, then
//! `og:title`/`name="title"` metadata, then the `<title>` element.

use super::{Chain, Strategy};
use crate::document::{Document, compile_selectors};
use once_cell::sync::Lazy;
use scraper::Selector;

pub const SENTINEL: &str = "Unknown Title";

static HEADINGS: Lazy<Vec<Selector>> =
    Lazy::new(|| compile_selectors(&["h1", "h2", ".article-title"]));

static META_TITLE: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[r#"meta[property="og:title"]"#, r#"meta[name="title"]"#])
});

static TITLE_TAG: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(&["title"]));

fn from_headings(doc: &Document) -> Option<String> {
    doc.select_first(&HEADINGS)
}

fn from_structured_data(doc: &Document) -> Option<String> {
    doc.structured_data().first_string(&["headline", "name"])
}

fn from_metadata(doc: &Document) -> Option<String> {
    doc.select_first(&META_TITLE)
}

fn from_title_tag(doc: &Document) -> Option<String> {
    doc.select_first(&TITLE_TAG)
}

pub fn chain() -> Chain<String> {
    Chain::new("title")
        .then(Strategy::new("html_headings", from_headings))
        .then(Strategy::new("json_ld", from_structured_data))
        .then(Strategy::new("meta_tags", from_metadata))
        .then(Strategy::new("title_tag", from_title_tag))
}

/// Run the title chain, falling back to [`SENTINEL`].
pub fn extract(doc: &Document) -> String {
    chain()
        .run(doc)
        .map_or_else(|| SENTINEL.to_string(), |hit| hit.value)
}
