//! Tokenization step.

use std::sync::Arc;

use crate::collection::{Document, DocumentCollection};
use crate::error::Result;
use crate::nlp::tokenizer::{Tokenizer, WordBoundTokenizer};
use crate::pipeline::traits::{expect_text, CleanStep};

/// Split every raw-text document into tokens.
#[derive(Clone)]
pub struct TokenizeStep {
    tokenizer: Arc<dyn Tokenizer>,
}

impl Default for TokenizeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizeStep {
    /// Step using [`WordBoundTokenizer`], punctuation kept
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(WordBoundTokenizer::new()))
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self { tokenizer }
    }
}

impl CleanStep for TokenizeStep {
    fn name(&self) -> &str {
        "tokenize"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|label, doc| {
            let text = expect_text(self.name(), label, doc)?;
            Ok(Document::Tokens(self.tokenizer.tokenize(&text)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_tokenizes_text() {
        let docs = DocumentCollection::from_texts(["first document", "second document"]);
        let out = TokenizeStep::new().apply(docs).unwrap();
        assert_eq!(
            out.documents(),
            &[
                Document::from(vec!["first", "document"]),
                Document::from(vec!["second", "document"]),
            ]
        );
    }

    #[test]
    fn test_custom_tokenizer() {
        let step =
            TokenizeStep::with_tokenizer(Arc::new(WordBoundTokenizer::new().with_punctuation(false)));
        let out = step.apply(DocumentCollection::from_texts(["a, b."])).unwrap();
        assert_eq!(out.documents(), &[Document::from(vec!["a", "b"])]);
    }

    #[test]
    fn test_already_tokenized_is_a_shape_mismatch() {
        let docs = DocumentCollection::new(vec![Document::from(vec!["a"])]);
        let err = TokenizeStep::new().apply(docs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }
}
