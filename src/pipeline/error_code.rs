//! Stable machine-readable codes for pipeline specification diagnostics.

use serde::Serialize;

/// Diagnostic code attached to every [`PipelineSpecError`](super::errors::PipelineSpecError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `v` is not a supported spec version.
    UnsupportedVersion,
    /// A regex pattern does not compile.
    InvalidPattern,
    /// A field holds a value outside its allowed range.
    InvalidValue,
    /// A step is missing a field it needs.
    MissingValue,
    /// A step's input shape does not match what the previous step produces.
    ShapeFlow,
    /// A field the schema does not know.
    UnknownField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::InvalidPattern => "invalid_pattern",
            Self::InvalidValue => "invalid_value",
            Self::MissingValue => "missing_value",
            Self::ShapeFlow => "shape_flow",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
