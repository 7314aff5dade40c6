//! Parsed, queryable view over fetched markup.
//!
//! A [`Document`] owns the `scraper` tree plus the JSON-LD blocks found in it.
//! It is read-only for the lifetime of a request; [`Document::strip_non_content`]
//! returns a pruned copy instead of editing the original.

use crate::error::ValidationError;
use crate::guard;
use crate::structured_data::{self, StructuredDataReader};
use crate::utils::normalize_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::warn;

/// Regions that never hold body text.
static NON_CONTENT: Lazy<Vec<Selector>> = Lazy::new(|| {
    compile_selectors(&[
        "header", "footer", "nav", "aside", "form", "iframe", "img", "figure",
    ])
});

static META: Lazy<Vec<Selector>> = Lazy::new(|| compile_selectors(&["meta"]));

/// Compile a selector list, dropping (and logging) any that fail to parse.
pub fn compile_selectors<S: AsRef<str>>(selectors: &[S]) -> Vec<Selector> {
    selectors
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!(selector = %s, error = ?e, "Skipping unparsable selector");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    blank: bool,
    blocks: Vec<Value>,
}

impl Document {
    /// Parse raw markup and decode its structured-data blocks.
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        let blocks = structured_data::parse_blocks(&html);
        Self {
            html,
            blank: markup.trim().is_empty(),
            blocks,
        }
    }

    /// `true` when the source markup was empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn structured_data(&self) -> StructuredDataReader<'_> {
        StructuredDataReader::new(&self.blocks)
    }

    /// The `<html>` element. Queries start here so subtrees detached by
    /// [`strip_non_content`](Self::strip_non_content) are never visited.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Text of the first element matched by the first selector that matches anything usable.
    ///
    /// Selectors are tried in priority order. `<meta>` elements yield their
    /// `content` attribute; `<time>` elements fall back to `datetime` when they
    /// carry no text. Empty matches are passed over.
    pub fn select_first(&self, selectors: &[Selector]) -> Option<String> {
        selectors
            .iter()
            .find_map(|selector| self.root().select(selector).find_map(element_text))
    }

    /// [`select_first`](Self::select_first) for a caller-supplied selector list.
    ///
    /// The list is checked by the selector guard first: an empty, unparsable or
    /// whitespace-padded selector is rejected rather than silently skipped.
    pub fn select_text(&self, selectors: &[String]) -> Result<Option<String>, ValidationError> {
        guard::selector_guard().run(selectors, |list| {
            Ok(self.select_first(&compile_selectors(list)))
        })
    }

    /// Normalized text of every element matched by `selector`, in document order.
    pub fn select_all_text(&self, selector: &Selector) -> Vec<String> {
        self.root().select(selector).filter_map(element_text).collect()
    }

    /// First element matched by any of `selectors`, in priority order.
    pub fn first_element(&self, selectors: &[Selector]) -> Option<ElementRef<'_>> {
        selectors
            .iter()
            .find_map(|selector| self.root().select(selector).next())
    }

    /// Content of the first `<meta>` whose `name` or `property` satisfies `matches`.
    pub fn meta_content(&self, matches: impl Fn(&str) -> bool) -> Option<String> {
        META.iter()
            .flat_map(|selector| self.root().select(selector))
            .filter(|meta| {
                let el = meta.value();
                el.attr("name").is_some_and(&matches) || el.attr("property").is_some_and(&matches)
            })
            .find_map(element_text)
    }

    /// Visible text of the whole page as one whitespace-normalized string.
    ///
    /// Script, style and noscript bodies are left out.
    pub fn flattened_text(&self) -> String {
        let mut parts = Vec::new();
        for node in self.html.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"));
            if !hidden {
                parts.push(&**text);
            }
        }
        normalize_whitespace(&parts.join(" "))
    }

    /// A copy with header, footer, nav, aside, form, iframe, img and figure subtrees removed.
    pub fn strip_non_content(&self) -> Document {
        let mut html = self.html.clone();
        let ids: Vec<_> = NON_CONTENT
            .iter()
            .flat_map(|selector| html.select(selector).map(|el| el.id()).collect::<Vec<_>>())
            .collect();
        for id in ids {
            if let Some(mut node) = html.tree.get_mut(id) {
                node.detach();
            }
        }
        Document {
            html,
            blank: self.blank,
            blocks: self.blocks.clone(),
        }
    }
}

/// Normalized text for one element, `None` when it is empty.
pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    let value = match el.value().name() {
        "meta" => el
            .value()
            .attr("content")
            .map(normalize_whitespace)
            .unwrap_or_default(),
        "time" => {
            let text = normalize_whitespace(&el.text().collect::<String>());
            if text.is_empty() {
                el.value()
                    .attr("datetime")
                    .map(normalize_whitespace)
                    .unwrap_or_default()
            } else {
                text
            }
        }
        _ => normalize_whitespace(&el.text().collect::<String>()),
    };
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
            <head>
                <title>Page Title</title>
                <meta property="og:title" content="  OG   Title ">
                <meta name="Author" content="Jane Smith">
                <script>var byline = "By Script Person";</script>
            </head>
            <body>
                <header><p>Header paragraph that is definitely long enough to count.</p></header>
                <h1>Article   Title</h1>
                <h2></h2>
                <time class="publish-date" datetime="2024-12-09T10:00:00Z"></time>
                <p>First paragraph.</p>
                <figure><img src="x.png"><figcaption>Caption</figcaption></figure>
                <footer>Footer</footer>
            </body>
        </html>
    "#;

    #[test]
    fn test_select_first_priority_order() {
        let doc = Document::parse(PAGE);
        let selectors = compile_selectors(&["h3", "h1", "title"]);
        assert_eq!(doc.select_first(&selectors).as_deref(), Some("Article Title"));
    }

    #[test]
    fn test_select_first_skips_empty_matches() {
        let doc = Document::parse(PAGE);
        let selectors = compile_selectors(&["h2", "title"]);
        assert_eq!(doc.select_first(&selectors).as_deref(), Some("Page Title"));
    }

    #[test]
    fn test_select_first_meta_uses_content() {
        let doc = Document::parse(PAGE);
        let selectors = compile_selectors(&[r#"meta[property="og:title"]"#]);
        assert_eq!(doc.select_first(&selectors).as_deref(), Some("OG Title"));
    }

    #[test]
    fn test_time_falls_back_to_datetime() {
        let doc = Document::parse(PAGE);
        let selectors = compile_selectors(&["time.publish-date"]);
        assert_eq!(
            doc.select_first(&selectors).as_deref(),
            Some("2024-12-09T10:00:00Z")
        );
    }

    #[test]
    fn test_select_first_no_match() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.select_first(&compile_selectors(&[".missing"])), None);
    }

    fn owned(selectors: &[&str]) -> Vec<String> {
        selectors.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_text_valid() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.select_text(&owned(&["h1", ".article-title"])).unwrap().as_deref(),
            Some("Article Title")
        );
    }

    #[test]
    fn test_select_text_rejects_padded_selector() {
        let doc = Document::parse(PAGE);
        let err = doc.select_text(&owned(&[" h1 ", "title"])).unwrap_err();
        assert!(matches!(err, ValidationError::PaddedSelector { index: 0, .. }));
    }

    #[test]
    fn test_select_text_on_empty_markup() {
        let doc = Document::parse("<html><body></body></html>");
        assert_eq!(doc.select_text(&owned(&["h1"])).unwrap(), None);
    }

    #[test]
    fn test_select_text_reuses_caller_list() {
        let doc = Document::parse(PAGE);
        let selectors = owned(&["h3", "title"]);
        assert_eq!(doc.select_text(&selectors).unwrap().as_deref(), Some("Page Title"));
        assert_eq!(doc.select_text(&selectors[1..]).unwrap().as_deref(), Some("Page Title"));
        assert_eq!(selectors, vec!["h3", "title"]);
    }

    #[test]
    fn test_meta_content_predicate() {
        let doc = Document::parse(PAGE);
        let author = doc.meta_content(|name| name.to_lowercase().contains("author"));
        assert_eq!(author.as_deref(), Some("Jane Smith"));
        assert_eq!(doc.meta_content(|name| name == "missing"), None);
    }

    #[test]
    fn test_flattened_text_excludes_scripts() {
        let doc = Document::parse(PAGE);
        let text = doc.flattened_text();
        assert!(text.contains("Article Title"));
        assert!(text.contains("First paragraph."));
        assert!(!text.contains("Script Person"));
    }

    #[test]
    fn test_strip_non_content_leaves_original_untouched() {
        let doc = Document::parse(PAGE);
        let stripped = doc.strip_non_content();

        let text = stripped.flattened_text();
        assert!(!text.contains("Header paragraph"));
        assert!(!text.contains("Caption"));
        assert!(!text.contains("Footer"));
        assert!(text.contains("First paragraph."));

        assert!(doc.flattened_text().contains("Header paragraph"));
    }

    #[test]
    fn test_queries_skip_detached_subtrees() {
        let doc = Document::parse(
            r#"<html><body>
                <aside><article><p>Sidebar teaser</p></article><span class="author">Ad Author</span></aside>
                <nav><meta name="author" content="Nav Author"></nav>
                <div class="post-content"><p>Story body</p></div>
            </body></html>"#,
        );
        let stripped = doc.strip_non_content();

        let article = compile_selectors(&["article"]);
        assert!(stripped.first_element(&article).is_none());
        assert!(doc.first_element(&article).is_some());

        let paragraphs = compile_selectors(&["p"]);
        assert_eq!(stripped.select_all_text(&paragraphs[0]), vec!["Story body"]);
        assert_eq!(stripped.select_first(&compile_selectors(&["span.author"])), None);
        assert_eq!(stripped.meta_content(|name| name == "author"), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(Document::parse("  \n ").is_blank());
        assert!(!Document::parse("<p>x</p>").is_blank());
    }
}
