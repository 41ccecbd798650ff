//! Stopword removal step.

use crate::collection::{Document, DocumentCollection};
use crate::error::{Result, Shape};
use crate::nlp::stopwords::StopwordFilter;
use crate::pipeline::traits::{check_shape, expect_tokens, CleanStep};

/// Drop stopwords from every token-sequence document, keeping token order.
#[derive(Debug, Clone)]
pub struct StopWordsStep {
    filter: StopwordFilter,
}

impl StopWordsStep {
    /// Remove exactly these words (case-sensitive).
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Self::with_filter(StopwordFilter::exact(words))
    }

    /// Remove the stopword list of `language` (case-insensitive).
    pub fn for_language(language: &str) -> Result<Self> {
        Ok(Self::with_filter(StopwordFilter::for_language(language)?))
    }

    pub fn with_filter(filter: StopwordFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &StopwordFilter {
        &self.filter
    }
}

impl CleanStep for StopWordsStep {
    fn name(&self) -> &str {
        "stop_words"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        check_shape(self.name(), &documents, Shape::Tokens)?;
        documents.try_map(|label, doc| {
            let mut tokens = expect_tokens(self.name(), label, doc)?;
            tokens.retain(|token| !self.filter.is_stopword(token));
            Ok(Document::Tokens(tokens))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanError;

    #[test]
    fn test_removes_stopwords_in_order() {
        let docs = DocumentCollection::new(vec![
            Document::from(vec!["first", "stop", "document"]),
            Document::from(vec!["second", "document", "word"]),
        ]);
        let out = StopWordsStep::new(&["stop", "word"]).apply(docs).unwrap();
        assert_eq!(
            out.documents(),
            &[
                Document::from(vec!["first", "document"]),
                Document::from(vec!["second", "document"]),
            ]
        );
    }

    #[test]
    fn test_raw_text_is_rejected() {
        let docs = DocumentCollection::from_texts(["first stop document"]);
        let err = StopWordsStep::new(&["stop"]).apply(docs).unwrap_err();
        assert!(matches!(err, CleanError::ShapeMismatch { index: 0, .. }));
    }

    #[test]
    fn test_any_raw_text_element_is_rejected() {
        let docs = DocumentCollection::new(vec![
            Document::from(vec!["ok"]),
            Document::Absent,
            Document::from("raw"),
        ]);
        let err = StopWordsStep::new(&["stop"]).apply(docs).unwrap_err();
        assert!(matches!(err, CleanError::ShapeMismatch { index: 2, .. }));
    }

    #[test]
    fn test_language_list() {
        let step = StopWordsStep::for_language("en").unwrap();
        let out = step
            .apply(DocumentCollection::new(vec![Document::from(vec!["The", "cat"])]))
            .unwrap();
        assert_eq!(out.documents(), &[Document::from(vec!["cat"])]);
    }
}
