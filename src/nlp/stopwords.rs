//! Stopword sets: bundled per-language lists from the `stop-words` crate
//! (matched ignoring case) and caller lists matched exactly.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::error::{CleanError, Result};

/// A set of words to remove from token sequences
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Stored lowercase unless the filter is case-sensitive
    stopwords: FxHashSet<String>,
    case_sensitive: bool,
}

impl StopwordFilter {
    /// Case-insensitive filter over the bundled list for `language`, given
    /// as an ISO 639-1 code or English name (see [`SUPPORTED_LANGUAGES`]).
    /// Anything else is an `InvalidArgument` error.
    pub fn for_language(language: &str) -> Result<Self> {
        let stopwords = Self::load_stopwords(language)?;
        Ok(Self {
            stopwords,
            case_sensitive: false,
        })
    }

    /// Create a case-insensitive filter from a custom list
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let stopwords = words.iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self {
            stopwords,
            case_sensitive: false,
        }
    }

    /// Create a filter that matches `words` exactly, case included
    pub fn exact<S: AsRef<str>>(words: &[S]) -> Self {
        let stopwords = words.iter().map(|w| w.as_ref().to_string()).collect();
        Self {
            stopwords,
            case_sensitive: true,
        }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            let word = self.normalize(word.as_ref());
            self.stopwords.insert(word);
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            let word = self.normalize(word.as_ref());
            self.stopwords.remove(&word);
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.stopwords.contains(word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    fn normalize(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }

    fn load_stopwords(language: &str) -> Result<FxHashSet<String>> {
        let lang = language_list(language).ok_or_else(|| {
            CleanError::invalid_argument(format!(
                "no stopword list for language \"{language}\" (supported: {})",
                SUPPORTED_LANGUAGES
                    .iter()
                    .map(|(code, _)| *code)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        Ok(get(lang).iter().map(|s| s.to_lowercase()).collect())
    }
}

/// ISO 639-1 codes with a bundled list, and their English names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "arabic"),
    ("da", "danish"),
    ("de", "german"),
    ("en", "english"),
    ("es", "spanish"),
    ("fi", "finnish"),
    ("fr", "french"),
    ("hu", "hungarian"),
    ("it", "italian"),
    ("nl", "dutch"),
    ("no", "norwegian"),
    ("pl", "polish"),
    ("pt", "portuguese"),
    ("ru", "russian"),
    ("sv", "swedish"),
    ("tr", "turkish"),
];

/// Resolve a code or English name (any case) to a bundled list.
fn language_list(language: &str) -> Option<LANGUAGE> {
    let wanted = language.trim().to_lowercase();
    let (code, _) = SUPPORTED_LANGUAGES
        .iter()
        .find(|(code, name)| *code == wanted || *name == wanted)?;
    let lang = match *code {
        "ar" => LANGUAGE::Arabic,
        "da" => LANGUAGE::Danish,
        "de" => LANGUAGE::German,
        "en" => LANGUAGE::English,
        "es" => LANGUAGE::Spanish,
        "fi" => LANGUAGE::Finnish,
        "fr" => LANGUAGE::French,
        "hu" => LANGUAGE::Hungarian,
        "it" => LANGUAGE::Italian,
        "nl" => LANGUAGE::Dutch,
        "no" => LANGUAGE::Norwegian,
        "pl" => LANGUAGE::Polish,
        "pt" => LANGUAGE::Portuguese,
        "ru" => LANGUAGE::Russian,
        "sv" => LANGUAGE::Swedish,
        "tr" => LANGUAGE::Turkish,
        _ => return None,
    };
    Some(lang)
}
