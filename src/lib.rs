//! Text cleaning pipelines for topic-modelling corpora.
//!
//! A [`TextCleaner`] runs an ordered list of [`CleanStep`]s over a
//! [`DocumentCollection`]: a labelled sequence of raw texts or token lists
//! in which some entries may be absent. Built-in steps strip HTML, lowercase,
//! blank out regex matches, tokenize, remove stopwords, lemmatize through a
//! pluggable [`MorphAnalyzer`](nlp::morph::MorphAnalyzer), join tokens and
//! drop empty documents. Pipelines can be assembled in code or from a JSON
//! [`PipelineSpec`](pipeline::PipelineSpec).
//!
//! ```
//! use topicpipe::steps::{HtmlTextStep, JoinTokensStep, LowercaseStep, PatternStep,
//!     StopWordsStep, TokenizeStep};
//! use topicpipe::{DocumentCollection, Document, TextCleaner};
//!
//! let cleaner = TextCleaner::builder()
//!     .step(HtmlTextStep::new())
//!     .step(LowercaseStep)
//!     .step(PatternStep::new(r"\W|\d").unwrap())
//!     .step(TokenizeStep::new())
//!     .step(StopWordsStep::new(&["the"]))
//!     .step(JoinTokensStep)
//!     .build();
//!
//! let out = cleaner
//!     .clean_up(DocumentCollection::from_texts(["<p>The 3 Topics!</p>"]))
//!     .unwrap();
//! assert_eq!(out.documents(), &[Document::from("topics")]);
//! ```
//!
//! # Features
//!
//! - `tracing` (default): per-step spans and debug events through the
//!   `tracing` crate.

pub mod collection;
pub mod error;
pub mod nlp;
pub mod pipeline;
pub mod steps;

pub use collection::{Document, DocumentCollection};
pub use error::{AnalyzerError, CleanError, ErrorKind, Result, Shape};
pub use pipeline::{CleanStep, TextCleaner};
