//! JSON-LD discovery and article lookup.
//!
//! Pages embed `<script type="application/ld+json">` blocks describing their
//! subject. A block may hold a single object, a list of objects, or a
//! container whose `@graph` holds the objects. Only objects typed
//! `NewsArticle`, `ReportageNewsArticle` or `Article` are used as field
//! sources.

use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Schema.org types whose fields may be read.
pub const ARTICLE_TYPES: [&str; 3] = ["NewsArticle", "ReportageNewsArticle", "Article"];

static LD_JSON: Lazy<Vec<Selector>> =
    Lazy::new(|| crate::document::compile_selectors(&[r#"script[type="application/ld+json"]"#]));

/// Parse every JSON-LD script in the document.
///
/// Blocks that are empty or not valid JSON are skipped with a warning.
pub fn parse_blocks(html: &Html) -> Vec<Value> {
    let mut blocks = Vec::new();
    for selector in LD_JSON.iter() {
        for (index, script) in html.select(selector).enumerate() {
            let raw: String = script.text().collect();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => blocks.push(value),
                Err(e) => warn!(
                    index,
                    error = %e,
                    preview = %truncate_for_log(trimmed, 120),
                    "Failed to decode JSON-LD script; skipping block"
                ),
            }
        }
    }
    debug!(count = blocks.len(), "Parsed JSON-LD blocks");
    blocks
}

/// Read-only view over the parsed JSON-LD blocks of one document.
#[derive(Debug, Clone, Copy)]
pub struct StructuredDataReader<'a> {
    blocks: &'a [Value],
}

impl<'a> StructuredDataReader<'a> {
    pub fn new(blocks: &'a [Value]) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &'a [Value] {
        self.blocks
    }

    /// Every eligible article object, in document order.
    ///
    /// Lists are scanned member by member and `@graph` containers are
    /// descended into, so an article nested in either shape is found.
    pub fn articles(&self) -> Vec<&'a Map<String, Value>> {
        let mut found = Vec::new();
        for block in self.blocks {
            collect_objects(block, &mut found);
        }
        found.retain(|obj| is_article(obj));
        found
    }

    /// The first non-empty string found on an article for any of `keys`.
    ///
    /// Articles are visited in document order; within one article the keys
    /// are tried in the order given.
    pub fn first_string(&self, keys: &[&str]) -> Option<String> {
        self.articles().into_iter().find_map(|article| {
            keys.iter()
                .find_map(|key| article.get(*key).and_then(string_value))
        })
    }

    /// All author names declared on eligible articles, de-duplicated in source order.
    ///
    /// An `author` may be a bare string, an object with a `name`, or a list
    /// mixing both. An empty result means no article declared a usable author.
    pub fn authors(&self) -> Vec<String> {
        let mut names = Vec::new();
        for article in self.articles() {
            if let Some(author) = article.get("author") {
                author_names(author, &mut names);
            }
        }
        names.into_iter().unique().collect()
    }
}

fn collect_objects<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_objects(item, out);
            }
        }
        Value::Object(obj) => {
            out.push(obj);
            if let Some(graph) = obj.get("@graph") {
                collect_objects(graph, out);
            }
        }
        _ => {}
    }
}

fn is_article(obj: &Map<String, Value>) -> bool {
    match obj.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

fn string_value(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Flatten one `author` value into names.
pub fn author_names(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(_) => out.extend(string_value(value)),
        Value::Object(obj) => out.extend(obj.get("name").and_then(string_value)),
        Value::Array(items) => {
            for item in items {
                author_names(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blocks_of(html: &str) -> Vec<Value> {
        parse_blocks(&Html::parse_document(html))
    }

    fn names(value: Value) -> Vec<String> {
        let mut out = Vec::new();
        author_names(&value, &mut out);
        out
    }

    #[test]
    fn test_author_names_mixed_list() {
        let value = json!([
            {"name": "John Doe"},
            "Jane Smith",
            {"name": "Alice Johnson"},
            "Bob Brown"
        ]);
        assert_eq!(
            names(value),
            vec!["John Doe", "Jane Smith", "Alice Johnson", "Bob Brown"]
        );
    }

    #[test]
    fn test_author_names_single_shapes() {
        assert_eq!(names(json!({"name": "John Doe"})), vec!["John Doe"]);
        assert_eq!(names(json!("John Doe")), vec!["John Doe"]);
    }

    #[test]
    fn test_author_names_empty_shapes() {
        assert!(names(Value::Null).is_empty());
        assert!(names(json!([])).is_empty());
        assert!(names(json!({})).is_empty());
        assert!(names(json!({"age": 30})).is_empty());
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let blocks = blocks_of(
            r#"<html><body>
            <script type="application/ld+json">{"@type": "NewsArticle", "author": {"name": "John Doe"</script>
            <script type="application/ld+json">{"@type": "NewsArticle", "headline": "Kept"}</script>
            </body></html>"#,
        );
        assert_eq!(blocks.len(), 1);
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(reader.first_string(&["headline"]).as_deref(), Some("Kept"));
    }

    #[test]
    fn test_graph_authors() {
        let blocks = blocks_of(
            r#"<script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "NewsArticle", "author": {"name": "John Doe"}},
                    {"@type": "NewsArticle", "author": {"name": "Jane Smith"}}
                ]
            }
            </script>"#,
        );
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(reader.authors(), vec!["John Doe", "Jane Smith"]);
    }

    #[test]
    fn test_list_authors() {
        let blocks = blocks_of(
            r#"<script type="application/ld+json">
            [
                {"@type": "NewsArticle", "author": {"name": "John Doe"}},
                {"@type": "NewsArticle", "author": {"name": "Jane Smith"}}
            ]
            </script>"#,
        );
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(reader.authors(), vec!["John Doe", "Jane Smith"]);
    }

    #[test]
    fn test_ineligible_types_are_ignored() {
        let blocks = vec![json!({"@type": "Organization", "name": "Acme", "author": "Nobody"})];
        let reader = StructuredDataReader::new(&blocks);
        assert!(reader.articles().is_empty());
        assert!(reader.authors().is_empty());
        assert_eq!(reader.first_string(&["name"]), None);
    }

    #[test]
    fn test_type_array_is_eligible() {
        let blocks = vec![json!({"@type": ["WebPage", "ReportageNewsArticle"], "headline": "Field report"})];
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(
            reader.first_string(&["headline"]).as_deref(),
            Some("Field report")
        );
    }

    #[test]
    fn test_duplicate_authors_collapse() {
        let blocks = vec![
            json!({"@type": "Article", "author": "Jane Smith"}),
            json!({"@type": "NewsArticle", "author": ["Jane Smith", {"name": "John Doe"}]}),
        ];
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(reader.authors(), vec!["Jane Smith", "John Doe"]);
    }

    #[test]
    fn test_first_string_scans_every_list_member() {
        let blocks = vec![json!([
            {"@type": "WebSite", "datePublished": "1999-01-01"},
            {"@type": "Article", "headline": "No date here"},
            {"@type": "NewsArticle", "datePublished": "2024-12-01"}
        ])];
        let reader = StructuredDataReader::new(&blocks);
        assert_eq!(
            reader.first_string(&["dateModified", "datePublished"]).as_deref(),
            Some("2024-12-01")
        );
    }
}
