//! Pipeline components
//!
//! This module provides the step contract, the sequential runner with its
//! observer hooks, and the JSON specification layer (spec types, validation
//! rules and the factory that turns a spec into a runnable pipeline).

pub mod error_code;
pub mod errors;
pub mod factory;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;

pub use factory::build_cleaner;
pub use observer::{NoopObserver, PipelineObserver, StepReport, StepTimingObserver};
pub use runner::{TextCleaner, TextCleanerBuilder};
pub use spec::{PipelineSpec, StepSpec};
pub use traits::{CleanStep, IdentityStep};
pub use validation::{ValidationEngine, ValidationReport};
