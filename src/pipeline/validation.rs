//! Checks a [`PipelineSpec`](super::spec::PipelineSpec) before any step is
//! built.
//!
//! Every registered [`ValidationRule`] sees the whole spec and the findings
//! of all rules end up in one [`ValidationReport`], so a user fixing a
//! config gets the complete list in a single pass.
//!
//! ```rust,ignore
//! use topicpipe::pipeline::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! for warning in report.warnings() {
//!     eprintln!("warning: {warning}");
//! }
//! let warnings = report.into_result()?;
//! ```

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::PipelineSpecError;
use super::spec::*;
use crate::error::{CleanError, Result, Shape};
use crate::nlp::stopwords::StopwordFilter;
use crate::steps::pattern::PatternStep;

// ─── Findings ───────────────────────────────────────────────────────────────

/// Errors block building the pipeline; warnings are reported only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding, tagged with the rule that raised it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    /// Filled in by the engine from [`ValidationRule::name`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rule: String,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(error: PipelineSpecError) -> Self {
        Self::with_severity(Severity::Error, error)
    }

    pub fn warning(error: PipelineSpecError) -> Self {
        Self::with_severity(Severity::Warning, error)
    }

    fn with_severity(severity: Severity, error: PipelineSpecError) -> Self {
        Self {
            severity,
            rule: String::new(),
            error,
        }
    }
}

/// Everything the engine found, in rule order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.with(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.with(Severity::Warning)
    }

    fn with(&self, severity: Severity) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.severity == severity)
            .map(|diag| &diag.error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors. Warnings may still be present.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The warnings if the spec is valid, otherwise an `InvalidArgument`
    /// error listing every error finding.
    pub fn into_result(self) -> Result<Vec<PipelineSpecError>> {
        if self.has_errors() {
            let reasons: Vec<String> = self.errors().map(ToString::to_string).collect();
            return Err(CleanError::invalid_argument(format!(
                "pipeline spec rejected: {}",
                reasons.join("; ")
            )));
        }
        Ok(self.diagnostics.into_iter().map(|diag| diag.error).collect())
    }
}

// ─── Rules ──────────────────────────────────────────────────────────────────

/// A stateless check over the whole spec.
pub trait ValidationRule: Send + Sync {
    /// Stable rule identifier, e.g. `"shape_flow"`.
    fn name(&self) -> &str;

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic>;
}

/// Ordered set of rules; [`validate`](Self::validate) runs all of them.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine with no rules; every spec passes.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Version, pattern, lemmatize options, stop-word source, shape flow and
    /// unknown-field checks.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(PatternRule));
        engine.add_rule(Box::new(LemmatizeOptionsRule));
        engine.add_rule(Box::new(StopWordsSourceRule));
        engine.add_rule(Box::new(ShapeFlowRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn validate(&self, spec: &PipelineSpec) -> ValidationReport {
        let diagnostics = self
            .rules
            .iter()
            .flat_map(|rule| {
                rule.validate(spec).into_iter().map(move |mut diag| {
                    diag.rule = rule.name().to_string();
                    diag
                })
            })
            .collect();
        ValidationReport { diagnostics }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only spec version 1 exists ──────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == 1 {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("spec version {} is not supported", spec.v),
            )
            .with_hint("Set \"v\": 1"),
        )]
    }
}

// ─── 2. Regex patterns must compile ─────────────────────────────────────────

struct PatternRule;

impl ValidationRule for PatternRule {
    fn name(&self) -> &str {
        "pattern"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        spec.steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| match step {
                StepSpec::Regex { pattern, flags, .. } => {
                    PatternStep::with_flags(pattern, *flags).err().map(|err| {
                        ValidationDiagnostic::error(
                            PipelineSpecError::new(
                                ErrorCode::InvalidPattern,
                                format!("/steps/{i}/pattern"),
                                err.to_string(),
                            )
                            .with_hint("Check the pattern against the `regex` crate syntax"),
                        )
                    })
                }
                _ => None,
            })
            .collect()
    }
}

// ─── 3. Lemmatize options are consistent ────────────────────────────────────

struct LemmatizeOptionsRule;

impl ValidationRule for LemmatizeOptionsRule {
    fn name(&self) -> &str {
        "lemmatize_options"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        for (i, step) in spec.steps.iter().enumerate() {
            let StepSpec::Lemmatize {
                mode,
                batch_size,
                ignore_pos,
                ignore_non_target,
                sentinel,
                ..
            } = step
            else {
                continue;
            };

            if *batch_size == Some(0) {
                out.push(ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        format!("/steps/{i}/batch_size"),
                        "batch_size must be greater than 0",
                    )
                    .with_hint("Remove batch_size to use the default of 1000"),
                ));
            }

            if *mode == LemmaModeType::PerDocument && (batch_size.is_some() || sentinel.is_some()) {
                out.push(ValidationDiagnostic::warning(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        format!("/steps/{i}"),
                        "batch_size and sentinel only apply to batched mode",
                    )
                    .with_hint("Set \"mode\": \"batched\" or drop these fields"),
                ));
            }

            if *mode == LemmaModeType::Batched && (!ignore_pos.is_empty() || *ignore_non_target) {
                out.push(ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        format!("/steps/{i}/mode"),
                        "ignore_pos and ignore_non_target need per_document mode",
                    )
                    .with_hint("Batched output carries no part-of-speech tags; use \"mode\": \"per_document\""),
                ));
            }

            if let Some(word) = sentinel {
                if word.trim().is_empty() || !word.trim().chars().all(char::is_alphanumeric) {
                    out.push(ValidationDiagnostic::error(
                        PipelineSpecError::new(
                            ErrorCode::InvalidValue,
                            format!("/steps/{i}/sentinel"),
                            format!("sentinel \"{word}\" must be a single alphanumeric word"),
                        )
                        .with_hint("Pick a word that never occurs in the documents"),
                    ));
                }
            }
        }

        out
    }
}

// ─── 4. Stop-word steps need a source ───────────────────────────────────────

struct StopWordsSourceRule;

impl ValidationRule for StopWordsSourceRule {
    fn name(&self) -> &str {
        "stop_words_source"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        for (i, step) in spec.steps.iter().enumerate() {
            let StepSpec::StopWords {
                words, language, ..
            } = step
            else {
                continue;
            };

            match language {
                None if words.is_empty() => out.push(ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::MissingValue,
                        format!("/steps/{i}"),
                        "stop_words needs \"words\" or \"language\"",
                    )
                    .with_hint("Add \"words\": [...] or \"language\": \"ru\""),
                )),
                Some(lang) => {
                    if let Err(err) = StopwordFilter::for_language(lang) {
                        out.push(ValidationDiagnostic::error(
                            PipelineSpecError::new(
                                ErrorCode::InvalidValue,
                                format!("/steps/{i}/language"),
                                err.to_string(),
                            )
                            .with_hint("Use an ISO 639-1 code such as en, ru or de"),
                        ));
                    }
                }
                None => {}
            }
        }

        out
    }
}

// ─── 5. Document shapes line up between steps ───────────────────────────────

/// Shape compatibility is the caller's responsibility at runtime, so a
/// mismatch here is only a warning.
struct ShapeFlowRule;

impl ValidationRule for ShapeFlowRule {
    fn name(&self) -> &str {
        "shape_flow"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        let mut shape = Shape::Text;

        for (i, step) in spec.steps.iter().enumerate() {
            if let Some(expected) = step.input_shape() {
                if expected != shape {
                    out.push(ValidationDiagnostic::warning(
                        PipelineSpecError::new(
                            ErrorCode::ShapeFlow,
                            format!("/steps/{i}"),
                            format!(
                                "{} expects {expected} documents but receives {shape}",
                                step.as_str()
                            ),
                        )
                        .with_hint(match expected {
                            Shape::Tokens => "Insert a tokenize step before this one",
                            Shape::Text => "Insert a join_tokens step before this one",
                        }),
                    ));
                }
                shape = expected;
            }
            shape = step.output_shape(shape);
        }

        out
    }
}

// ─── 6. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let severity = if spec.strict {
            ValidationDiagnostic::error
        } else {
            ValidationDiagnostic::warning
        };
        let mut out = Vec::new();

        let mut keys: Vec<&String> = spec.unknown_fields.keys().collect();
        keys.sort();
        for key in keys {
            out.push(severity(
                PipelineSpecError::new(
                    ErrorCode::UnknownField,
                    format!("/{key}"),
                    format!("\"{key}\" is not a pipeline spec field"),
                )
                .with_hint("Top-level fields are v, steps and strict"),
            ));
        }

        for (i, step) in spec.steps.iter().enumerate() {
            let mut keys: Vec<&String> = step.unknown_fields().keys().collect();
            keys.sort();
            for key in keys {
                out.push(severity(
                    PipelineSpecError::new(
                        ErrorCode::UnknownField,
                        format!("/steps/{i}/{key}"),
                        format!("\"{key}\" is not a field of {} steps", step.as_str()),
                    )
                    .with_hint("Check spelling or remove this field"),
                ));
            }
        }

        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a PipelineSpec from JSON.
    fn spec(json: &str) -> PipelineSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_acceptance_pipeline_is_clean() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "steps": [
                    { "type": "html" },
                    { "type": "lowercase" },
                    { "type": "regex", "pattern": "\\W|\\d" },
                    { "type": "lemmatize" },
                    { "type": "tokenize" },
                    { "type": "stop_words", "words": ["не", "и", "в"] },
                    { "type": "join_tokens" },
                    { "type": "filter_empty" }
                ]
            }"#,
        ));
        assert!(report.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn test_default_rule_names() {
        assert_eq!(
            engine().rule_names(),
            vec![
                "version",
                "pattern",
                "lemmatize_options",
                "stop_words_source",
                "shape_flow",
                "unknown_fields",
            ]
        );
    }

    // ─── Rule: version ──────────────────────────────────────────────────

    #[test]
    fn test_unsupported_version() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::UnsupportedVersion);
        assert_eq!(errs[0].path, "/v");
    }

    // ─── Rule: pattern ──────────────────────────────────────────────────

    #[test]
    fn test_bad_pattern_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "lowercase" }, { "type": "regex", "pattern": "(" }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::InvalidPattern);
        assert_eq!(errs[0].path, "/steps/1/pattern");
    }

    // ─── Rule: lemmatize_options ────────────────────────────────────────

    #[test]
    fn test_zero_batch_size_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "lemmatize", "mode": "batched", "batch_size": 0 }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::InvalidValue);
        assert_eq!(errs[0].path, "/steps/0/batch_size");
    }

    #[test]
    fn test_batch_size_in_per_document_mode_warns() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "lemmatize", "batch_size": 10 }] }"#,
        ));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_bad_sentinel_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "lemmatize", "mode": "batched", "sentinel": "<br>" }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/steps/0/sentinel");
    }

    #[test]
    fn test_batched_with_filters_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [
                { "type": "lemmatize", "mode": "batched", "ignore_pos": ["CONJ"] },
                { "type": "lemmatize", "mode": "batched", "ignore_non_target": true },
                { "type": "lemmatize", "ignore_pos": ["CONJ"], "ignore_non_target": true }
            ] }"#,
        ));
        let paths: Vec<&str> = report.errors().map(|err| err.path.as_str()).collect();
        assert_eq!(paths, vec!["/steps/0/mode", "/steps/1/mode"]);
    }

    // ─── Rule: stop_words_source ────────────────────────────────────────

    #[test]
    fn test_stop_words_without_source_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "tokenize" }, { "type": "stop_words" }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::MissingValue);
    }

    #[test]
    fn test_stop_words_unknown_language_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "tokenize" }, { "type": "stop_words", "language": "xx" }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/steps/1/language");
    }

    // ─── Rule: shape_flow ───────────────────────────────────────────────

    #[test]
    fn test_stop_words_on_raw_text_warns() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "stop_words", "words": ["a"] }] }"#,
        ));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::ShapeFlow);
        assert_eq!(warns[0].path, "/steps/0");
    }

    #[test]
    fn test_lowercase_after_tokenize_warns() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "tokenize" }, { "type": "lowercase" }] }"#,
        ));
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].path, "/steps/1");
    }

    #[test]
    fn test_batched_lemmatize_yields_tokens() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "steps": [
                    { "type": "lemmatize", "mode": "batched" },
                    { "type": "stop_words", "words": ["и"] },
                    { "type": "join_tokens" }
                ]
            }"#,
        ));
        assert!(report.is_empty(), "{:?}", report.diagnostics);
    }

    // ─── Rule: unknown_fields ───────────────────────────────────────────

    #[test]
    fn test_unknown_field_warns_when_not_strict() {
        let report = engine().validate(&spec(r#"{ "v": 1, "bogus": true }"#));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].path, "/bogus");
    }

    #[test]
    fn test_unknown_field_fails_when_strict() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": true, "bogus": true }"#));
        assert!(report.has_errors());
    }

    #[test]
    fn test_unknown_step_field_warns_when_not_strict() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "steps": [{ "type": "lemmatize", "mode": "batched", "batchsize": 5 }] }"#,
        ));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::UnknownField);
        assert_eq!(warns[0].path, "/steps/0/batchsize");
    }

    #[test]
    fn test_unknown_step_field_fails_when_strict() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "strict": true, "steps": [{ "type": "html", "strip": true }] }"#,
        ));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "/steps/0/strip");
    }

    // ─── Engine behavior ────────────────────────────────────────────────

    #[test]
    fn test_collects_all_errors() {
        let report = engine().validate(&spec(
            r#"{
                "v": 3,
                "steps": [
                    { "type": "regex", "pattern": "[" },
                    { "type": "lemmatize", "mode": "batched", "batch_size": 0 }
                ]
            }"#,
        ));
        assert_eq!(report.errors().count(), 3);
    }

    #[test]
    fn test_report_serializes() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["code"], "unsupported_version");
        assert_eq!(json["diagnostics"][0]["rule"], "version");
    }

    #[test]
    fn test_into_result() {
        let warnings = engine()
            .validate(&spec(r#"{ "v": 1, "bogus": true }"#))
            .into_result()
            .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, ErrorCode::UnknownField);

        let err = engine()
            .validate(&spec(r#"{ "v": 2 }"#))
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("[unsupported_version] /v"));
    }

    #[test]
    fn test_custom_rule() {
        struct NoEmptyPipeline;

        impl ValidationRule for NoEmptyPipeline {
            fn name(&self) -> &str {
                "no_empty_pipeline"
            }

            fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
                if spec.steps.is_empty() {
                    vec![ValidationDiagnostic::error(PipelineSpecError::new(
                        ErrorCode::MissingValue,
                        "/steps",
                        "at least one step is required",
                    ))]
                } else {
                    vec![]
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoEmptyPipeline));
        assert!(engine.validate(&spec(r#"{ "v": 1 }"#)).has_errors());
    }
}
