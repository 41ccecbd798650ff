//! HTML text extraction
//!
//! Strips markup from a document and joins the visible text nodes with a
//! single separator. Parsing is lenient: malformed markup is repaired by the
//! HTML5 tree builder behind `scraper` rather than rejected.

use scraper::Html;

use crate::error::AnalyzerError;

/// Extracts visible text from an HTML string.
pub trait HtmlExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Result<String, AnalyzerError>;
}

/// [`HtmlExtractor`] backed by the `scraper` crate.
///
/// Every text node is trimmed; empty nodes are dropped and the rest joined
/// with `separator` (a single space by default). Text inside `<script>` and
/// `<style>` is not visible and is skipped.
#[derive(Debug, Clone)]
pub struct ScraperExtractor {
    separator: String,
}

impl Default for ScraperExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScraperExtractor {
    pub fn new() -> Self {
        Self {
            separator: " ".to_string(),
        }
    }

    /// Set the string placed between text nodes
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl HtmlExtractor for ScraperExtractor {
    fn extract(&self, html: &str) -> Result<String, AnalyzerError> {
        let fragment = Html::parse_fragment(html);

        let parts: Vec<&str> = fragment
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| matches!(el.name(), "script" | "style"))
                });
                if hidden {
                    return None;
                }
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            })
            .collect();

        Ok(parts.join(&self.separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_blocks_with_single_space() {
        let html = "<div><p>needed</p>\n<p>data</p></div>";
        assert_eq!(ScraperExtractor::new().extract(html).unwrap(), "needed data");
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let extractor = ScraperExtractor::new();
        assert_eq!(extractor.extract("  just text \n").unwrap(), "just text");
    }

    #[test]
    fn test_unclosed_tags_are_tolerated() {
        let extractor = ScraperExtractor::new();
        let text = extractor.extract("<div><p>one<p>two <b>three</div>").unwrap();
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_attributes_and_scripts_are_dropped() {
        let extractor = ScraperExtractor::new();
        let html = "<a href='some_link'>link</a><script>var x = 1;</script><style>p {}</style>";
        assert_eq!(extractor.extract(html).unwrap(), "link");
    }

    #[test]
    fn test_entities_are_decoded() {
        let extractor = ScraperExtractor::new();
        assert_eq!(extractor.extract("<p>fish &amp; chips</p>").unwrap(), "fish & chips");
    }

    #[test]
    fn test_custom_separator() {
        let extractor = ScraperExtractor::new().with_separator("|");
        assert_eq!(extractor.extract("<p>a</p><p>b</p>").unwrap(), "a|b");
    }
}
