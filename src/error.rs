//! Error types for cleaning steps and the pipeline runner.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Coarse classification of a [`CleanError`].
///
/// Callers that only care about *what kind* of thing went wrong (bad call,
/// wrong document shape, external analyzer, user function) match on this
/// instead of the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ShapeMismatch,
    AnalyzerFailure,
    FunctionFailure,
}

/// Shape of a single document, used in shape-mismatch diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Text,
    Tokens,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Text => f.write_str("raw text"),
            Shape::Tokens => f.write_str("token sequence"),
        }
    }
}

/// Failure reported by an external collaborator (morphological analyzer,
/// tokenizer, HTML extractor).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{source_name}: {message}")]
pub struct AnalyzerError {
    /// Which collaborator failed (e.g. `"dictionary analyzer"`).
    pub source_name: String,
    pub message: String,
}

impl AnalyzerError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while applying cleaning steps.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleanError {
    /// The step was called with the wrong number of arguments, or the
    /// argument is not a valid document collection.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A step received documents of the wrong shape.
    #[error("{step} expects {expected} documents, but document {index} is {found}")]
    ShapeMismatch {
        step: String,
        expected: Shape,
        found: Shape,
        /// Index label of the offending document.
        index: i64,
    },

    /// The external analyzer (or tokenizer / HTML extractor) failed.
    #[error("analyzer failure: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Batched lemmatization could not split the analyzer output back into
    /// the documents it was built from.
    #[error("batch boundary mismatch: expected {expected} documents, found {found}")]
    BoundaryMismatch { expected: usize, found: usize },

    /// A caller-supplied function failed.
    #[error("{step} function failed: {message}")]
    Function { step: String, message: String },
}

impl CleanError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        CleanError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CleanError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            CleanError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            CleanError::Analyzer(_) | CleanError::BoundaryMismatch { .. } => {
                ErrorKind::AnalyzerFailure
            }
            CleanError::Function { .. } => ErrorKind::FunctionFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CleanError::invalid_argument("x").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            CleanError::BoundaryMismatch {
                expected: 2,
                found: 3
            }
            .kind(),
            ErrorKind::AnalyzerFailure
        );
        let err: CleanError = AnalyzerError::new("dictionary analyzer", "crashed").into();
        assert_eq!(err.kind(), ErrorKind::AnalyzerFailure);
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = CleanError::ShapeMismatch {
            step: "stop_words".to_string(),
            expected: Shape::Tokens,
            found: Shape::Text,
            index: 4,
        };
        assert_eq!(
            err.to_string(),
            "stop_words expects token sequence documents, but document 4 is raw text"
        );
    }
}
