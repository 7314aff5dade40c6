//! Body-text extraction.
//!
//! Boilerplate regions are stripped from a copy of the document first. The
//! first matching article container is then searched for paragraphs longer
//! than the configured minimum; only when no container exists at all is the
//! whole page scanned instead.

use super::{Chain, ExtractionStrategy, Hit};
use crate::document::{Document, compile_selectors, element_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

pub const SENTINEL: &str = "No content available";

static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[
        "article",
        "div.article-content",
        "div.content-body",
        "div.post-content",
        "div.app-meta-article",
    ])
});

static PARAGRAPH: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(&["p"]));

/// Paragraphs inside `scope` whose text is longer than `min_chars`, newline-joined.
fn long_paragraphs<'a>(
    paragraphs: impl Iterator<Item = ElementRef<'a>>,
    min_chars: usize,
) -> Option<String> {
    let kept: Vec<String> = paragraphs
        .filter_map(element_text)
        .filter(|text| text.chars().count() > min_chars)
        .collect();
    (!kept.is_empty()).then(|| kept.join("\n"))
}

/// Paragraphs of the first matching article container.
#[derive(Debug, Clone, Copy)]
pub struct ContainerParagraphs {
    pub min_chars: usize,
}

impl ExtractionStrategy<String> for ContainerParagraphs {
    fn name(&self) -> &'static str {
        "container_paragraphs"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        let container = doc.first_element(&CONTAINERS)?;
        long_paragraphs(
            PARAGRAPH.iter().flat_map(|p| container.select(p)),
            self.min_chars,
        )
    }
}

/// Paragraphs anywhere on the page, used only when no container exists.
#[derive(Debug, Clone, Copy)]
pub struct PageParagraphs {
    pub min_chars: usize,
}

impl ExtractionStrategy<String> for PageParagraphs {
    fn name(&self) -> &'static str {
        "page_paragraphs"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        if doc.first_element(&CONTAINERS).is_some() {
            return None;
        }
        long_paragraphs(
            PARAGRAPH.iter().flat_map(|p| doc.root().select(p)),
            self.min_chars,
        )
    }
}

pub fn chain(min_chars: usize) -> Chain<String> {
    Chain::new("content")
        .then(ContainerParagraphs { min_chars })
        .then(PageParagraphs { min_chars })
}

/// Strip boilerplate from a copy of `doc`, then run `chain` over it.
pub fn run(chain: &Chain<String>, doc: &Document) -> Option<Hit<String>> {
    let stripped = doc.strip_non_content();
    chain.run(&stripped)
}

/// Run the content chain, falling back to [`SENTINEL`].
pub fn extract(doc: &Document, min_chars: usize) -> String {
    run(&chain(min_chars), doc).map_or_else(|| SENTINEL.to_string(), |hit| hit.value)
}
