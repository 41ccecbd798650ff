//! Built-in cleaning steps
//!
//! Each step implements [`CleanStep`](crate::pipeline::traits::CleanStep):
//!
//! | Step | Input | Output |
//! |------|-------|--------|
//! | [`HtmlTextStep`] | text | text with markup stripped |
//! | [`LowercaseStep`] | text | lowercased text |
//! | [`PatternStep`] | text | matches replaced by a space |
//! | [`TokenizeStep`] | text | tokens |
//! | [`StopWordsStep`] | tokens | tokens minus stopwords |
//! | [`LemmatizeStep`] | text or tokens | lemmas |
//! | [`MapStep`] | any | caller-defined |
//! | [`JoinTokensStep`] | tokens | space-joined text |
//! | [`FilterEmptyStep`] | any | survivors, labels kept |

pub mod filter;
pub mod html;
pub mod lemmatize;
pub mod lowercase;
pub mod map;
pub mod pattern;
pub mod stopwords;
pub mod tokenize;

pub use filter::FilterEmptyStep;
pub use html::HtmlTextStep;
pub use lemmatize::{LemmaMode, LemmatizeStep};
pub use lowercase::LowercaseStep;
pub use map::{JoinTokensStep, MapStep};
pub use pattern::PatternStep;
pub use stopwords::StopWordsStep;
pub use tokenize::TokenizeStep;
