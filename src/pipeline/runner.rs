//! Pipeline runner: threads a collection through its steps.
//!
//! The [`TextCleaner`] holds an ordered list of boxed [`CleanStep`]s fixed at
//! construction. [`TextCleaner::clean_up`] folds the input collection
//! through them: the output of step *i* is the only input of step *i + 1*.
//!
//! # Failure
//!
//! The first failing step aborts the run and its error is returned as is.
//! Nothing is retried or rolled back and no partial result is returned; to
//! retry, run the pipeline again on the original input.
//!
//! # Building
//!
//! ```
//! # use topicpipe::pipeline::runner::TextCleaner;
//! # use topicpipe::steps::{LowercaseStep, TokenizeStep};
//! # use topicpipe::collection::DocumentCollection;
//! let cleaner = TextCleaner::builder()
//!     .step(LowercaseStep)
//!     .step(TokenizeStep::new())
//!     .build();
//! let out = cleaner.clean_up(DocumentCollection::from_texts(["First DOCUMENT"])).unwrap();
//! assert_eq!(out.documents()[0].as_tokens().unwrap(), ["first", "document"]);
//! ```

use crate::collection::DocumentCollection;
use crate::error::Result;
use crate::pipeline::observer::{NoopObserver, PipelineObserver, StepClock, StepReport};
use crate::pipeline::traits::CleanStep;

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline step (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_step {
    ($position:expr, $name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("clean_step", position = $position, step = $name).entered();
    };
}

// ============================================================================
// TextCleaner: ordered step container
// ============================================================================

/// Ordered sequence of cleaning steps.
#[derive(Default)]
pub struct TextCleaner {
    steps: Vec<Box<dyn CleanStep>>,
}

impl TextCleaner {
    pub fn new(steps: Vec<Box<dyn CleanStep>>) -> Self {
        Self { steps }
    }

    pub fn builder() -> TextCleanerBuilder {
        TextCleanerBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Names of the configured steps, in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every step in order. An empty pipeline returns its input.
    pub fn clean_up(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        self.clean_up_observed(documents, &mut NoopObserver)
    }

    /// [`clean_up`](Self::clean_up), notifying `observer` at each step
    /// boundary.
    pub fn clean_up_observed(
        &self,
        mut documents: DocumentCollection,
        observer: &mut impl PipelineObserver,
    ) -> Result<DocumentCollection> {
        for (position, step) in self.steps.iter().enumerate() {
            let name = step.name();
            trace_step!(position, name);
            observer.on_step_start(position, name);

            let clock = StepClock::start();
            let documents_in = documents.len();
            documents = match step.apply(documents) {
                Ok(out) => out,
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %err, "step failed");
                    observer.on_step_error(position, name, &err);
                    return Err(err);
                }
            };

            let report = StepReport::new(clock.elapsed(), documents_in, documents.len());
            #[cfg(feature = "tracing")]
            tracing::debug!(
                documents_in = report.documents_in(),
                documents_out = report.documents_out(),
                elapsed_us = report.elapsed().as_micros() as u64,
                "step finished"
            );
            observer.on_step_end(position, name, &report);
        }
        Ok(documents)
    }
}

impl std::fmt::Debug for TextCleaner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCleaner")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// A whole pipeline is itself a step, so pipelines nest.
impl CleanStep for TextCleaner {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        self.clean_up(documents)
    }
}

// ============================================================================
// TextCleanerBuilder: fluent construction
// ============================================================================

/// Fluent builder for a [`TextCleaner`].
#[derive(Default)]
pub struct TextCleanerBuilder {
    steps: Vec<Box<dyn CleanStep>>,
}

impl TextCleanerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step(mut self, step: impl CleanStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append an already boxed step.
    pub fn boxed_step(mut self, step: Box<dyn CleanStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> TextCleaner {
        TextCleaner::new(self.steps)
    }
}
