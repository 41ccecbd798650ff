//! Pipeline specification types.
//!
//! A [`PipelineSpec`] lists the cleaning steps to run, in order, with their
//! configuration. These types are the input to the
//! [`super::validation::ValidationEngine`] and to
//! [`super::factory::build_cleaner`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "steps": [
//!     { "type": "html" },
//!     { "type": "lowercase" },
//!     { "type": "regex", "pattern": "\\W|\\d" },
//!     { "type": "lemmatize", "mode": "batched", "batch_size": 500 },
//!     { "type": "stop_words", "language": "ru", "words": ["br"] },
//!     { "type": "join_tokens" },
//!     { "type": "filter_empty" }
//!   ],
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result, Shape};
use crate::nlp::morph::PartOfSpeech;
use crate::steps::pattern::PatternFlags;

/// Top-level pipeline specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<StepSpec>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    /// Used by the strict-mode validation rule.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl PipelineSpec {
    /// Parse a spec from JSON. Malformed JSON is an `InvalidArgument` error.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| CleanError::invalid_argument(format!("bad pipeline spec: {err}")))
    }
}

/// Keys a step object carries beyond its schema.
pub type UnknownFields = HashMap<String, serde_json::Value>;

/// One configured step.
///
/// Every variant captures unrecognized keys in `unknown_fields` so typos
/// inside a step are reported like top-level ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepSpec {
    Identity {
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    Html {
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    Lowercase {
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    Regex {
        pattern: String,
        #[serde(default)]
        flags: PatternFlags,
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    Tokenize {
        #[serde(default = "default_true")]
        keep_punctuation: bool,
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    StopWords {
        /// Exact words to remove.
        #[serde(default)]
        words: Vec<String>,
        /// Language list to remove (case-insensitive).
        #[serde(default)]
        language: Option<String>,
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    Lemmatize {
        #[serde(default)]
        mode: LemmaModeType,
        /// Only meaningful in batched mode.
        #[serde(default)]
        batch_size: Option<usize>,
        /// Per-document mode only.
        #[serde(default)]
        ignore_pos: Vec<PartOfSpeech>,
        /// Per-document mode only.
        #[serde(default)]
        ignore_non_target: bool,
        #[serde(default)]
        sentinel: Option<String>,
        #[serde(default)]
        parallel: bool,
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    FilterEmpty {
        #[serde(default)]
        drop_empty_tokens: bool,
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
    JoinTokens {
        #[serde(flatten)]
        unknown_fields: UnknownFields,
    },
}

fn default_true() -> bool {
    true
}

/// Lemmatization mode selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LemmaModeType {
    #[default]
    PerDocument,
    Batched,
}

impl StepSpec {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity { .. } => "identity",
            Self::Html { .. } => "html",
            Self::Lowercase { .. } => "lowercase",
            Self::Regex { .. } => "regex",
            Self::Tokenize { .. } => "tokenize",
            Self::StopWords { .. } => "stop_words",
            Self::Lemmatize { .. } => "lemmatize",
            Self::FilterEmpty { .. } => "filter_empty",
            Self::JoinTokens { .. } => "join_tokens",
        }
    }

    /// Keys of this step object that no field consumed.
    pub fn unknown_fields(&self) -> &UnknownFields {
        match self {
            Self::Identity { unknown_fields }
            | Self::Html { unknown_fields }
            | Self::Lowercase { unknown_fields }
            | Self::Regex { unknown_fields, .. }
            | Self::Tokenize { unknown_fields, .. }
            | Self::StopWords { unknown_fields, .. }
            | Self::Lemmatize { unknown_fields, .. }
            | Self::FilterEmpty { unknown_fields, .. }
            | Self::JoinTokens { unknown_fields } => unknown_fields,
        }
    }

    /// Shape this step needs, or `None` if it takes either.
    pub fn input_shape(&self) -> Option<Shape> {
        match self {
            Self::Html { .. }
            | Self::Lowercase { .. }
            | Self::Regex { .. }
            | Self::Tokenize { .. } => Some(Shape::Text),
            Self::StopWords { .. } | Self::JoinTokens { .. } => Some(Shape::Tokens),
            Self::Identity { .. } | Self::Lemmatize { .. } | Self::FilterEmpty { .. } => None,
        }
    }

    /// Shape this step emits given its input shape.
    pub fn output_shape(&self, input: Shape) -> Shape {
        match self {
            Self::Tokenize { .. } => Shape::Tokens,
            Self::JoinTokens { .. } => Shape::Text,
            Self::Lemmatize {
                mode: LemmaModeType::Batched,
                ..
            } => Shape::Tokens,
            _ => input,
        }
    }
}
