//! Word tokenization
//!
//! Splits raw text into an ordered sequence of tokens on Unicode word
//! boundaries (UAX #29). Whitespace never becomes a token; punctuation does,
//! unless the tokenizer is told to drop it.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::AnalyzerError;

/// Language-aware word-boundary tokenizer.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError>;
}

/// [`Tokenizer`] built on `unicode-segmentation` word bounds.
#[derive(Debug, Clone, Copy)]
pub struct WordBoundTokenizer {
    keep_punctuation: bool,
}

impl Default for WordBoundTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordBoundTokenizer {
    /// Tokenizer that keeps punctuation tokens
    pub fn new() -> Self {
        Self {
            keep_punctuation: true,
        }
    }

    /// Keep or drop tokens that contain no alphanumeric character
    pub fn with_punctuation(mut self, keep: bool) -> Self {
        self.keep_punctuation = keep;
        self
    }

    /// Segment `text` without allocating.
    pub fn segments<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let keep_punctuation = self.keep_punctuation;
        text.split_word_bounds()
            .filter(|seg| !seg.trim().is_empty())
            .filter(move |seg| keep_punctuation || is_word(seg))
    }
}

impl Tokenizer for WordBoundTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        Ok(self.segments(text).map(str::to_string).collect())
    }
}

/// Whether a segment carries at least one letter or digit
pub(crate) fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() {
        let tokens = WordBoundTokenizer::new().tokenize("first document").unwrap();
        assert_eq!(tokens, vec!["first", "document"]);
    }

    #[test]
    fn test_keeps_punctuation_by_default() {
        let tokens = WordBoundTokenizer::new().tokenize("Hello, world!").unwrap();
        assert_eq!(tokens, vec!["Hello", ",", "world", "!"]);
    }

    #[test]
    fn test_drops_punctuation_when_asked() {
        let tokens = WordBoundTokenizer::new()
            .with_punctuation(false)
            .tokenize("Hello, world!")
            .unwrap();
        assert_eq!(tokens, vec!["Hello", "world"]);
    }

    #[test]
    fn test_cyrillic_and_runs_of_spaces() {
        let tokens = WordBoundTokenizer::new()
            .tokenize("  это   первый\tдокумент  ")
            .unwrap();
        assert_eq!(tokens, vec!["это", "первый", "документ"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(WordBoundTokenizer::new().tokenize("").unwrap().is_empty());
    }
}
