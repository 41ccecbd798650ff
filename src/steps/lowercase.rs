//! Case normalization step.

use crate::collection::{Document, DocumentCollection};
use crate::error::Result;
use crate::pipeline::traits::{expect_text, CleanStep};

/// Lowercase every raw-text document (Unicode default case mapping, no locale).
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseStep;

impl CleanStep for LowercaseStep {
    fn name(&self) -> &str {
        "lowercase"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|label, doc| {
            let text = expect_text(self.name(), label, doc)?;
            Ok(Document::Text(text.to_lowercase()))
        })
    }
}
