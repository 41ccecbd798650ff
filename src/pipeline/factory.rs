//! Build a runnable [`TextCleaner`] from a [`PipelineSpec`].
//!
//! The pipeline spec is validated first; any error-severity diagnostic aborts the
//! build. Warnings are logged (with the `tracing` feature) and otherwise
//! ignored.

use std::sync::Arc;

use crate::error::{CleanError, Result};
use crate::nlp::morph::MorphAnalyzer;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::WordBoundTokenizer;
use crate::pipeline::runner::TextCleaner;
use crate::pipeline::spec::{LemmaModeType, PipelineSpec, StepSpec};
use crate::pipeline::traits::{CleanStep, IdentityStep};
use crate::pipeline::validation::ValidationEngine;
use crate::steps::lemmatize::DEFAULT_BATCH_SIZE;
use crate::steps::{
    FilterEmptyStep, HtmlTextStep, JoinTokensStep, LemmaMode, LemmatizeStep, LowercaseStep,
    PatternStep, StopWordsStep, TokenizeStep,
};

/// Validate `spec` and build its pipeline.
///
/// `analyzer` backs every `lemmatize` step; a spec with a lemmatize step and
/// no analyzer is an `InvalidArgument` error.
pub fn build_cleaner(
    spec: &PipelineSpec,
    analyzer: Option<Arc<dyn MorphAnalyzer>>,
) -> Result<TextCleaner> {
    let warnings = ValidationEngine::with_defaults().validate(spec).into_result()?;

    #[cfg(feature = "tracing")]
    for warning in &warnings {
        tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
    }
    #[cfg(not(feature = "tracing"))]
    let _ = warnings;

    let steps = spec
        .steps
        .iter()
        .map(|step| build_step(step, analyzer.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(steps = steps.len(), "pipeline built from spec");

    Ok(TextCleaner::new(steps))
}

fn build_step(
    step: &StepSpec,
    analyzer: Option<&Arc<dyn MorphAnalyzer>>,
) -> Result<Box<dyn CleanStep>> {
    let built: Box<dyn CleanStep> = match step {
        StepSpec::Identity { .. } => Box::new(IdentityStep),
        StepSpec::Html { .. } => Box::new(HtmlTextStep::new()),
        StepSpec::Lowercase { .. } => Box::new(LowercaseStep),
        StepSpec::Regex { pattern, flags, .. } => Box::new(PatternStep::with_flags(pattern, *flags)?),
        StepSpec::Tokenize {
            keep_punctuation, ..
        } => Box::new(TokenizeStep::with_tokenizer(
            Arc::new(WordBoundTokenizer::new().with_punctuation(*keep_punctuation)),
        )),
        StepSpec::StopWords {
            words, language, ..
        } => {
            let filter = match language {
                Some(lang) => {
                    let mut filter = StopwordFilter::for_language(lang)?;
                    filter.add_stopwords(words);
                    filter
                }
                None => StopwordFilter::exact(words),
            };
            Box::new(StopWordsStep::with_filter(filter))
        }
        StepSpec::Lemmatize {
            mode,
            batch_size,
            ignore_pos,
            ignore_non_target,
            sentinel,
            parallel,
            ..
        } => {
            let analyzer = analyzer.cloned().ok_or_else(|| {
                CleanError::invalid_argument("lemmatize step needs a morphological analyzer")
            })?;
            let mode = match mode {
                LemmaModeType::PerDocument => LemmaMode::PerDocument,
                LemmaModeType::Batched => LemmaMode::Batched {
                    batch_size: batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
                },
            };
            let mut lemmatize = LemmatizeStep::new(analyzer)
                .with_mode(mode)?
                .with_ignored_pos(ignore_pos.iter().copied())
                .with_non_target_ignored(*ignore_non_target)
                .with_parallel(*parallel);
            if let Some(word) = sentinel {
                lemmatize = lemmatize.with_sentinel(word)?;
            }
            Box::new(lemmatize)
        }
        StepSpec::FilterEmpty {
            drop_empty_tokens, ..
        } => {
            Box::new(FilterEmptyStep::new().with_empty_tokens_dropped(*drop_empty_tokens))
        }
        StepSpec::JoinTokens { .. } => Box::new(JoinTokensStep),
    };
    Ok(built)
}
