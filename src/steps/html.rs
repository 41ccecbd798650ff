//! Markup stripping step.

use std::sync::Arc;

use crate::collection::{Document, DocumentCollection};
use crate::error::Result;
use crate::nlp::html::{HtmlExtractor, ScraperExtractor};
use crate::pipeline::traits::{expect_text, CleanStep};

/// Replace every raw-text document with its visible text.
#[derive(Clone)]
pub struct HtmlTextStep {
    extractor: Arc<dyn HtmlExtractor>,
}

impl Default for HtmlTextStep {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlTextStep {
    /// Step using [`ScraperExtractor`]
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(ScraperExtractor::new()))
    }

    pub fn with_extractor(extractor: Arc<dyn HtmlExtractor>) -> Self {
        Self { extractor }
    }
}

impl CleanStep for HtmlTextStep {
    fn name(&self) -> &str {
        "html"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|label, doc| {
            let html = expect_text(self.name(), label, doc)?;
            Ok(Document::Text(self.extractor.extract(&html)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalyzerError, CleanError, ErrorKind};

    #[test]
    fn test_extracts_text_from_html() {
        let docs = DocumentCollection::from_texts(["<div><p>needed</p>\n<p>data</p></div>"]);
        let out = HtmlTextStep::new().apply(docs).unwrap();
        assert_eq!(out.documents(), &[Document::from("needed data")]);
    }

    #[test]
    fn test_absent_documents_pass_through() {
        let docs = DocumentCollection::new(vec![Document::Absent, Document::from("<b>x</b>")]);
        let out = HtmlTextStep::new().apply(docs).unwrap();
        assert_eq!(out.documents(), &[Document::Absent, Document::from("x")]);
    }

    #[test]
    fn test_rejects_tokens() {
        let docs = DocumentCollection::new(vec![Document::from(vec!["a"])]);
        let err = HtmlTextStep::new().apply(docs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    struct Broken;

    impl HtmlExtractor for Broken {
        fn extract(&self, _html: &str) -> std::result::Result<String, AnalyzerError> {
            Err(AnalyzerError::new("html parser", "out of memory"))
        }
    }

    #[test]
    fn test_extractor_errors_propagate() {
        let step = HtmlTextStep::with_extractor(Arc::new(Broken));
        let err = step.apply(DocumentCollection::from_texts(["<p>"])).unwrap_err();
        assert!(matches!(err, CleanError::Analyzer(_)));
    }
}
