//! Regular-expression substitution step.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::collection::{Document, DocumentCollection};
use crate::error::{CleanError, Result};
use crate::pipeline::traits::{expect_text, CleanStep};

/// Compile-time options for [`PatternStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    /// Unicode-aware classes (`\w`, `\d`, ...). On by default.
    pub unicode: bool,
}

impl Default for PatternFlags {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            unicode: true,
        }
    }
}

/// Replace every match of a pattern with a single space.
#[derive(Debug, Clone)]
pub struct PatternStep {
    regex: Regex,
}

impl PatternStep {
    /// Compile `pattern` with default flags.
    ///
    /// An invalid pattern is an `InvalidArgument` error.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_flags(pattern, PatternFlags::default())
    }

    pub fn with_flags(pattern: &str, flags: PatternFlags) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line)
            .unicode(flags.unicode)
            .build()
            .map_err(|err| CleanError::invalid_argument(format!("bad pattern: {err}")))?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl CleanStep for PatternStep {
    fn name(&self) -> &str {
        "regex"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        documents.try_map(|label, doc| {
            let text = expect_text(self.name(), label, doc)?;
            Ok(Document::Text(self.regex.replace_all(&text, " ").into_owned()))
        })
    }
}
