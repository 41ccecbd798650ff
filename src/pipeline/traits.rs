//! Step trait definitions for the pipeline.
//!
//! Every cleaning stage implements [`CleanStep`]: one [`DocumentCollection`]
//! in, one out. Steps are composed at runtime as trait objects, so a
//! pipeline can be assembled from configuration.

use serde_json::Value;

use crate::collection::{Document, DocumentCollection};
use crate::error::{CleanError, Result, Shape};

// ============================================================================
// CleanStep: the unit of transformation
// ============================================================================

/// A single transformation stage.
///
/// # Contract
///
/// - **Input**: exactly one [`DocumentCollection`], taken by value.
/// - **Output**: a new collection carrying the same index labels, except for
///   filtering steps, which drop labels together with their documents.
/// - **State**: no mutable state shared between calls. Configuration (a
///   compiled pattern, a stopword set, an analyzer handle) is read-only.
/// - **Shape**: a step validates the shape of the documents it consumes and
///   fails with [`CleanError::ShapeMismatch`] on the wrong one. Absent
///   documents pass through untouched.
pub trait CleanStep: Send + Sync {
    /// Short, stable identifier used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Transform the collection.
    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection>;

    /// Invoke the step with dynamically-typed arguments.
    ///
    /// Fails with `InvalidArgument` unless `args` holds exactly one value and
    /// that value is a document collection.
    fn call(&self, args: &[Value]) -> Result<DocumentCollection> {
        let [arg] = args else {
            return Err(CleanError::invalid_argument(format!(
                "{} takes a single document collection, got {} arguments",
                self.name(),
                args.len()
            )));
        };
        let documents = DocumentCollection::from_value(arg.clone())?;
        self.apply(documents)
    }
}

impl<S: CleanStep + ?Sized> CleanStep for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        (**self).apply(documents)
    }
}

/// Identity step: returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStep;

impl CleanStep for IdentityStep {
    fn name(&self) -> &str {
        "identity"
    }

    #[inline]
    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        Ok(documents)
    }
}

// ============================================================================
// Shape helpers shared by step implementations
// ============================================================================

/// Unwrap a raw-text document or report a shape mismatch.
pub(crate) fn expect_text(step: &str, label: i64, doc: Document) -> Result<String> {
    match doc {
        Document::Text(text) => Ok(text),
        other => Err(mismatch(step, label, Shape::Text, &other)),
    }
}

/// Unwrap a token-sequence document or report a shape mismatch.
pub(crate) fn expect_tokens(step: &str, label: i64, doc: Document) -> Result<Vec<String>> {
    match doc {
        Document::Tokens(tokens) => Ok(tokens),
        other => Err(mismatch(step, label, Shape::Tokens, &other)),
    }
}

/// Fail before any work if a present document has the wrong shape.
pub(crate) fn check_shape(step: &str, documents: &DocumentCollection, expected: Shape) -> Result<()> {
    for (label, doc) in documents.iter() {
        if let Some(found) = doc.shape() {
            if found != expected {
                return Err(CleanError::ShapeMismatch {
                    step: step.to_string(),
                    expected,
                    found,
                    index: label,
                });
            }
        }
    }
    Ok(())
}

fn mismatch(step: &str, label: i64, expected: Shape, found: &Document) -> CleanError {
    CleanError::ShapeMismatch {
        step: step.to_string(),
        expected,
        // Absent documents never reach the helpers above.
        found: found.shape().unwrap_or(expected),
        index: label,
    }
}
