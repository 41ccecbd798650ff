//! Caller-defined per-document transforms.

use crate::collection::{Document, DocumentCollection};
use crate::error::{CleanError, Result};
use crate::pipeline::traits::{expect_tokens, CleanStep};

type DocumentFn = dyn Fn(Document) -> Result<Document> + Send + Sync;

/// Apply a caller-supplied function to every present document.
///
/// Errors returned by the function abort the step unchanged.
pub struct MapStep {
    name: String,
    f: Box<DocumentFn>,
}

impl MapStep {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Document) -> Result<Document> + Send + Sync + 'static,
    {
        Self {
            name: "map".to_string(),
            f: Box::new(f),
        }
    }

    /// Wrap a function that cannot fail.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        Self::new(move |doc| Ok(f(doc)))
    }

    /// Override the name reported in logs and errors
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl std::fmt::Debug for MapStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapStep").field("name", &self.name).finish()
    }
}

impl CleanStep for MapStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|_, doc| (self.f)(doc))
    }
}

/// Join each token sequence back into a single space-separated text.
///
/// Tokens are trimmed and empty or whitespace-only tokens dropped first.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinTokensStep;

impl CleanStep for JoinTokensStep {
    fn name(&self) -> &str {
        "join_tokens"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|label, doc| {
            let tokens = expect_tokens(self.name(), label, doc)?;
            let joined = tokens
                .iter()
                .map(|token| token.trim())
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            Ok(Document::Text(joined))
        })
    }
}

/// Convenience for user functions that want to fail with a message.
pub fn function_error(step: &str, message: impl Into<String>) -> CleanError {
    CleanError::Function {
        step: step.to_string(),
        message: message.into(),
    }
}
