//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at step boundaries without coupling to
//! step logic. Use cases include timing steps, counting how many documents a
//! filter removed, and recording which step failed.

use std::time::{Duration, Instant};

use crate::error::CleanError;

/// Wall-clock timer for a single step.
#[derive(Debug, Clone, Copy)]
pub struct StepClock(Instant);

impl StepClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    elapsed: Duration,
    documents_in: usize,
    documents_out: usize,
}

impl StepReport {
    pub fn new(elapsed: Duration, documents_in: usize, documents_out: usize) -> Self {
        Self {
            elapsed,
            documents_in,
            documents_out,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn documents_in(&self) -> usize {
        self.documents_in
    }

    pub fn documents_out(&self) -> usize {
        self.documents_out
    }

    /// Documents removed by the step (filters only).
    pub fn removed(&self) -> usize {
        self.documents_in.saturating_sub(self.documents_out)
    }
}

/// Receives callbacks while a pipeline runs. All methods default to no-ops.
pub trait PipelineObserver {
    fn on_step_start(&mut self, _position: usize, _name: &str) {}

    fn on_step_end(&mut self, _position: usize, _name: &str, _report: &StepReport) {}

    /// The step at `position` failed; the run stops after this call.
    fn on_step_error(&mut self, _position: usize, _name: &str, _error: &CleanError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records one [`StepReport`] per completed step.
#[derive(Debug, Clone, Default)]
pub struct StepTimingObserver {
    reports: Vec<(String, StepReport)>,
    failed: Option<String>,
}

impl StepTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(step name, report)` in execution order.
    pub fn reports(&self) -> &[(String, StepReport)] {
        &self.reports
    }

    /// Name of the step that failed, if any.
    pub fn failed_step(&self) -> Option<&str> {
        self.failed.as_deref()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, report)| report.elapsed()).sum()
    }
}

impl PipelineObserver for StepTimingObserver {
    fn on_step_end(&mut self, _position: usize, name: &str, report: &StepReport) {
        self.reports.push((name.to_string(), *report));
    }

    fn on_step_error(&mut self, _position: usize, name: &str, _error: &CleanError) {
        self.failed = Some(name.to_string());
    }
}
