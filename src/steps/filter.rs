//! Empty-document filtering step.

use crate::collection::{Document, DocumentCollection};
use crate::error::Result;
use crate::pipeline::traits::CleanStep;

/// Remove absent documents and empty texts.
///
/// Survivors keep their original index labels; nothing is renumbered.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEmptyStep {
    drop_empty_tokens: bool,
}

impl FilterEmptyStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also remove token sequences with no tokens
    pub fn with_empty_tokens_dropped(mut self, drop: bool) -> Self {
        self.drop_empty_tokens = drop;
        self
    }

    fn keep(&self, doc: &Document) -> bool {
        match doc {
            Document::Absent => false,
            Document::Text(text) => !text.is_empty(),
            Document::Tokens(tokens) => !(self.drop_empty_tokens && tokens.is_empty()),
        }
    }
}

impl CleanStep for FilterEmptyStep {
    fn name(&self) -> &str {
        "filter_empty"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        Ok(documents.retain(|doc| self.keep(doc)))
    }
}
