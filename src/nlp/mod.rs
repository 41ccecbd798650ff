//! Natural Language Processing components
//!
//! External text-processing collaborators used by the cleaning steps: HTML
//! text extraction, tokenization, stopword lists and morphological analysis.

pub mod html;
pub mod morph;
pub mod stopwords;
pub mod tokenizer;
