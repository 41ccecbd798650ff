//! Morphological analysis
//!
//! The [`MorphAnalyzer`] trait is the seam to an external analyzer. It offers
//! two entry points:
//!
//! - [`analyze`](MorphAnalyzer::analyze): scored candidate parses for one word.
//! - [`lemmatize`](MorphAnalyzer::lemmatize): a whole text in, a stream of
//!   lemmatized tokens out, with whitespace and punctuation tokens left in
//!   place for the caller to filter.
//!
//! [`DictionaryAnalyzer`] is an in-memory implementation seeded from a
//! word → lemma table.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::AnalyzerError;
use crate::nlp::tokenizer::is_word;

/// OpenCorpora part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartOfSpeech {
    /// Noun
    Noun,
    /// Full adjective
    Adjf,
    /// Short adjective
    Adjs,
    /// Comparative
    Comp,
    /// Finite verb
    Verb,
    /// Infinitive
    Infn,
    /// Full participle
    Prtf,
    /// Short participle
    Prts,
    /// Gerund
    Grnd,
    /// Numeral
    Numr,
    /// Adverb
    Advb,
    /// Pronoun
    Npro,
    /// Predicative
    Pred,
    /// Preposition
    Prep,
    /// Conjunction
    Conj,
    /// Particle
    Prcl,
    /// Interjection
    Intj,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noun => "NOUN",
            Self::Adjf => "ADJF",
            Self::Adjs => "ADJS",
            Self::Comp => "COMP",
            Self::Verb => "VERB",
            Self::Infn => "INFN",
            Self::Prtf => "PRTF",
            Self::Prts => "PRTS",
            Self::Grnd => "GRND",
            Self::Numr => "NUMR",
            Self::Advb => "ADVB",
            Self::Npro => "NPRO",
            Self::Pred => "PRED",
            Self::Prep => "PREP",
            Self::Conj => "CONJ",
            Self::Prcl => "PRCL",
            Self::Intj => "INTJ",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let pos = match value.to_uppercase().as_str() {
            "NOUN" => Self::Noun,
            "ADJF" => Self::Adjf,
            "ADJS" => Self::Adjs,
            "COMP" => Self::Comp,
            "VERB" => Self::Verb,
            "INFN" => Self::Infn,
            "PRTF" => Self::Prtf,
            "PRTS" => Self::Prts,
            "GRND" => Self::Grnd,
            "NUMR" => Self::Numr,
            "ADVB" => Self::Advb,
            "NPRO" => Self::Npro,
            "PRED" => Self::Pred,
            "PREP" => Self::Prep,
            "CONJ" => Self::Conj,
            "PRCL" => Self::Prcl,
            "INTJ" => Self::Intj,
            other => return Err(format!("unknown part of speech \"{other}\"")),
        };
        Ok(pos)
    }
}

/// One candidate analysis of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    pub normal_form: String,
    /// `None` for words the analyzer could not tag.
    pub pos: Option<PartOfSpeech>,
    /// Word is written in Latin script (not the analyzer's target language).
    pub latin: bool,
    pub score: f32,
}

impl Parse {
    pub fn new(normal_form: impl Into<String>, pos: Option<PartOfSpeech>, score: f32) -> Self {
        Self {
            normal_form: normal_form.into(),
            pos,
            latin: false,
            score,
        }
    }

    pub fn latin(word: impl Into<String>) -> Self {
        Self {
            normal_form: word.into(),
            pos: None,
            latin: true,
            score: 1.0,
        }
    }
}

/// Pick the highest-scoring parse. Ties go to the earlier candidate.
pub fn best_parse(parses: &[Parse]) -> Option<&Parse> {
    parses.iter().fold(None, |best, parse| match best {
        Some(b) if b.score >= parse.score => Some(b),
        _ => Some(parse),
    })
}

/// External morphological analyzer.
pub trait MorphAnalyzer: Send + Sync {
    /// Candidate parses for a single word, in analyzer order.
    fn analyze(&self, word: &str) -> Result<Vec<Parse>, AnalyzerError>;

    /// Lemmatize a whole text.
    ///
    /// Returns every token of the text in order, including whitespace and
    /// punctuation tokens.
    fn lemmatize(&self, text: &str) -> Result<Vec<String>, AnalyzerError>;
}

/// Dictionary-backed [`MorphAnalyzer`].
///
/// Lookups are case-insensitive. Words missing from the dictionary normalize
/// to their lowercase form with no part of speech; Latin-script words are
/// flagged as [`Parse::latin`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryAnalyzer {
    entries: FxHashMap<String, Vec<Parse>>,
}

impl DictionaryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, lemma)` pairs, each with full confidence.
    pub fn from_lemmas<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut analyzer = Self::new();
        for (word, lemma) in pairs {
            analyzer.insert(word, Parse::new(lemma, None, 1.0));
        }
        analyzer
    }

    /// Add a tagged lemma
    pub fn with_lemma(mut self, word: &str, lemma: &str, pos: PartOfSpeech) -> Self {
        self.insert(word, Parse::new(lemma, Some(pos), 1.0));
        self
    }

    /// Add a candidate parse for `word`
    pub fn insert(&mut self, word: &str, parse: Parse) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(parse);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MorphAnalyzer for DictionaryAnalyzer {
    fn analyze(&self, word: &str) -> Result<Vec<Parse>, AnalyzerError> {
        let key = word.to_lowercase();
        if let Some(parses) = self.entries.get(&key) {
            return Ok(parses.clone());
        }
        if is_latin(word) {
            return Ok(vec![Parse::latin(key)]);
        }
        Ok(vec![Parse::new(key, None, 0.0)])
    }

    fn lemmatize(&self, text: &str) -> Result<Vec<String>, AnalyzerError> {
        let mut out = Vec::new();
        for segment in text.split_word_bounds() {
            if !is_word(segment) {
                out.push(segment.to_string());
                continue;
            }
            let parses = self.analyze(segment)?;
            match best_parse(&parses) {
                Some(parse) => out.push(parse.normal_form.clone()),
                None => out.push(segment.to_lowercase()),
            }
        }
        out.push("\n".to_string());
        Ok(out)
    }
}

/// All letters of `word` are Latin script (Basic Latin through Latin
/// Extended-B), and there is at least one letter.
pub fn is_latin(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(|c| (c as u32) < 0x0250)
}
