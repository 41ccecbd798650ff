//! Lemmatization step
//!
//! Reduces words to their dictionary form with an injected
//! [`MorphAnalyzer`]. Two modes:
//!
//! - [`LemmaMode::PerDocument`]: one analyzer call per document (text input)
//!   or per token (token input).
//! - [`LemmaMode::Batched`]: one analyzer call per batch of documents; see
//!   [`batch`] for the merge/split protocol.
//!
//! For raw-text input both modes agree up to shape: tokenizing the text that
//! per-document mode returns gives the token list batched mode returns. Line
//! breaks and tabs between words collapse to a single space, so they still
//! separate tokens.

mod batch;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use unicode_segmentation::UnicodeSegmentation;

use crate::collection::{Document, DocumentCollection};
use crate::error::{CleanError, Result};
use crate::nlp::morph::{best_parse, MorphAnalyzer, PartOfSpeech};
use crate::nlp::tokenizer::is_word;
use crate::pipeline::traits::CleanStep;

use self::batch::Batcher;

/// Documents per analyzer call in batched mode.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Word separating documents inside a merged batch.
pub const DEFAULT_SENTINEL: &str = "br";

/// How the analyzer is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LemmaMode {
    #[default]
    PerDocument,
    Batched { batch_size: usize },
}

impl LemmaMode {
    /// Batched mode with [`DEFAULT_BATCH_SIZE`].
    pub fn batched() -> Self {
        LemmaMode::Batched {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Lemmatize every present document.
///
/// Output shapes:
///
/// | Mode | Text input | Token input |
/// |------|------------|-------------|
/// | per-document | text | tokens |
/// | batched | tokens | tokens |
///
/// The part-of-speech exclusion set and the Latin-script handling apply in
/// per-document mode to both shapes. Text input is then analyzed word by word
/// instead of in one streaming call. Batched mode gets no tags back from the
/// analyzer and rejects these options.
pub struct LemmatizeStep {
    analyzer: Arc<dyn MorphAnalyzer>,
    mode: LemmaMode,
    ignore_pos: FxHashSet<PartOfSpeech>,
    ignore_non_target: bool,
    sentinel: String,
    parallel: bool,
}

impl LemmatizeStep {
    /// Per-document step over `analyzer`.
    pub fn new(analyzer: Arc<dyn MorphAnalyzer>) -> Self {
        Self {
            analyzer,
            mode: LemmaMode::PerDocument,
            ignore_pos: FxHashSet::default(),
            ignore_non_target: false,
            sentinel: DEFAULT_SENTINEL.to_string(),
            parallel: false,
        }
    }

    /// Select the mode. A batch size of zero is rejected, as is batched mode
    /// on a step that already has word filters.
    pub fn with_mode(mut self, mode: LemmaMode) -> Result<Self> {
        if let LemmaMode::Batched { batch_size } = mode {
            if batch_size == 0 {
                return Err(CleanError::invalid_argument("batch size must be positive"));
            }
            self.check_batchable()?;
        }
        self.mode = mode;
        Ok(self)
    }

    /// Drop tokens whose best parse has one of these parts of speech
    pub fn with_ignored_pos<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = PartOfSpeech>,
    {
        self.ignore_pos = tags.into_iter().collect();
        self
    }

    /// Drop Latin-script tokens instead of passing them through
    pub fn with_non_target_ignored(mut self, ignore: bool) -> Self {
        self.ignore_non_target = ignore;
        self
    }

    /// Replace the batch sentinel. It must be a single lowercase-able word.
    pub fn with_sentinel(mut self, sentinel: &str) -> Result<Self> {
        let sentinel = sentinel.trim();
        if sentinel.is_empty() || !sentinel.chars().all(char::is_alphanumeric) {
            return Err(CleanError::invalid_argument(format!(
                "sentinel \"{sentinel}\" must be a single alphanumeric word"
            )));
        }
        self.sentinel = sentinel.to_lowercase();
        Ok(self)
    }

    /// Spread documents (per-document mode) or batches (batched mode) over
    /// the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn mode(&self) -> LemmaMode {
        self.mode
    }

    fn has_filters(&self) -> bool {
        !self.ignore_pos.is_empty() || self.ignore_non_target
    }

    fn check_batchable(&self) -> Result<()> {
        if self.has_filters() {
            return Err(CleanError::invalid_argument(
                "part-of-speech and Latin filters need per-document mode",
            ));
        }
        Ok(())
    }

    fn lemmatize_document(&self, doc: Document) -> Result<Document> {
        match doc {
            Document::Text(text) => self.lemmatize_text(&text).map(Document::Text),
            Document::Tokens(tokens) => self.lemmatize_tokens(&tokens).map(Document::Tokens),
            Document::Absent => Ok(Document::Absent),
        }
    }

    /// Without filters, one analyzer call for the whole text. With filters,
    /// each word segment is analyzed on its own and dropped words leave only
    /// their surrounding whitespace.
    fn lemmatize_text(&self, text: &str) -> Result<String> {
        if !self.has_filters() {
            return Ok(join_lemmas(self.analyzer.lemmatize(text)?));
        }
        let mut pieces = Vec::new();
        for segment in text.split_word_bounds() {
            if !is_word(segment) {
                pieces.push(segment.to_string());
            } else if let Some(lemma) = self.lemma_for(segment)? {
                pieces.push(lemma);
            }
        }
        Ok(join_lemmas(pieces))
    }

    fn lemmatize_tokens(&self, tokens: &[String]) -> Result<Vec<String>> {
        tokens
            .iter()
            .filter_map(|word| self.lemma_for(word).transpose())
            .collect()
    }

    /// Lemma of the top candidate, or `None` when the filters drop the word.
    fn lemma_for(&self, word: &str) -> Result<Option<String>> {
        let parses = self.analyzer.analyze(word)?;
        let Some(parse) = best_parse(&parses) else {
            return Ok(Some(word.to_string()));
        };
        if parse.latin {
            return Ok((!self.ignore_non_target).then(|| word.to_string()));
        }
        if parse.pos.is_some_and(|pos| self.ignore_pos.contains(&pos)) {
            return Ok(None);
        }
        Ok(Some(parse.normal_form.clone()))
    }

    fn apply_per_document(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        if self.parallel {
            documents.par_try_map(|_, doc| self.lemmatize_document(doc))
        } else {
            documents.try_map(|_, doc| self.lemmatize_document(doc))
        }
    }

    fn apply_batched(
        &self,
        documents: DocumentCollection,
        batch_size: usize,
    ) -> Result<DocumentCollection> {
        self.check_batchable()?;

        let texts: Vec<String> = documents
            .documents()
            .iter()
            .filter_map(|doc| match doc {
                Document::Text(text) => Some(text.clone()),
                Document::Tokens(tokens) => Some(tokens.join(" ")),
                Document::Absent => None,
            })
            .collect();

        #[cfg(feature = "tracing")]
        self.warn_on_sentinel(&documents);

        let batcher = Batcher {
            analyzer: self.analyzer.as_ref(),
            sentinel: &self.sentinel,
            batch_size,
            parallel: self.parallel,
        };
        let mut lemmatized = batcher.run(&texts)?.into_iter();

        // Reattach results to their labels; absent documents were never sent.
        let (index, originals) = documents.into_parts();
        let mut out = Vec::with_capacity(originals.len());
        let mut consumed = 0;
        for doc in originals {
            match doc {
                Document::Absent => out.push(Document::Absent),
                _ => {
                    let tokens = lemmatized.next().ok_or(CleanError::BoundaryMismatch {
                        expected: texts.len(),
                        found: consumed,
                    })?;
                    consumed += 1;
                    out.push(Document::Tokens(tokens));
                }
            }
        }
        DocumentCollection::with_index(index, out)
    }

    #[cfg(feature = "tracing")]
    fn warn_on_sentinel(&self, documents: &DocumentCollection) {
        for (label, doc) in documents.iter() {
            let collides = match doc {
                Document::Text(text) => text
                    .split_word_bounds()
                    .any(|seg| seg.to_lowercase() == self.sentinel),
                Document::Tokens(tokens) => tokens
                    .iter()
                    .any(|token| token.trim().to_lowercase() == self.sentinel),
                Document::Absent => false,
            };
            if collides {
                tracing::warn!(
                    index = label,
                    sentinel = %self.sentinel,
                    "document contains the batch sentinel; batch boundaries will not line up"
                );
            }
        }
    }
}

/// Concatenate analyzer output. Line-break and tab tokens become a single
/// space when they sit between two non-blank pieces and vanish otherwise.
fn join_lemmas<I>(pieces: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::new();
    let mut gap = false;
    for piece in pieces {
        if piece.is_empty() {
            continue;
        }
        if is_line_break(&piece) {
            gap = true;
            continue;
        }
        if gap
            && !out.is_empty()
            && !out.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace)
        {
            out.push(' ');
        }
        gap = false;
        out.push_str(&piece);
    }
    out
}

fn is_line_break(piece: &str) -> bool {
    piece.chars().all(|c| matches!(c, '\n' | '\r' | '\t'))
}

impl std::fmt::Debug for LemmatizeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmatizeStep")
            .field("mode", &self.mode)
            .field("ignore_pos", &self.ignore_pos)
            .field("ignore_non_target", &self.ignore_non_target)
            .field("sentinel", &self.sentinel)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl CleanStep for LemmatizeStep {
    fn name(&self) -> &str {
        "lemmatize"
    }

    fn apply(&self, documents: DocumentCollection) -> Result<DocumentCollection> {
        match self.mode {
            LemmaMode::PerDocument => self.apply_per_document(documents),
            LemmaMode::Batched { batch_size } => self.apply_batched(documents, batch_size),
        }
    }
}
