//! Batched lemmatization
//!
//! Calling the analyzer once per document is dominated by per-call overhead
//! on large collections. Batched mode concatenates up to `batch_size`
//! documents into one text, separated by a sentinel word, analyzes that text
//! in a single call and splits the token stream back into documents at every
//! sentinel.
//!
//! Process:
//! 1. Render each present document as text (token sequences are joined by
//!    single spaces)
//! 2. Merge each batch as `"{doc} {sentinel} "`, joined by single spaces
//! 3. Lemmatize the merged text
//! 4. Walk the token stream: drop blank tokens, close a document at each
//!    sentinel, collect everything else (trimmed)
//! 5. Check that the number of closed documents equals the batch size
//!
//! A document that already contains the sentinel word splits into two and
//! fails step 5 with [`CleanError::BoundaryMismatch`]. Input is never escaped.

use rayon::prelude::*;

use crate::error::{CleanError, Result};
use crate::nlp::morph::MorphAnalyzer;

/// Lemmatizes documents in sentinel-delimited batches.
pub(crate) struct Batcher<'a> {
    pub analyzer: &'a dyn MorphAnalyzer,
    /// Lowercase sentinel word
    pub sentinel: &'a str,
    pub batch_size: usize,
    pub parallel: bool,
}

impl Batcher<'_> {
    /// Lemmatize `texts`, returning one token list per input text, in order.
    pub fn run(&self, texts: &[String]) -> Result<Vec<Vec<String>>> {
        let batches: Vec<&[String]> = texts.chunks(self.batch_size).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            documents = texts.len(),
            batches = batches.len(),
            batch_size = self.batch_size,
            "batched lemmatization"
        );

        let per_batch: Vec<Vec<Vec<String>>> = if self.parallel {
            batches
                .par_iter()
                .map(|batch| self.lemmatize_batch(batch))
                .collect::<Result<_>>()?
        } else {
            batches
                .iter()
                .map(|batch| self.lemmatize_batch(batch))
                .collect::<Result<_>>()?
        };

        Ok(per_batch.into_iter().flatten().collect())
    }

    fn lemmatize_batch(&self, batch: &[String]) -> Result<Vec<Vec<String>>> {
        let merged = merge_batch(batch, self.sentinel);
        let tokens = self.analyzer.lemmatize(&merged)?;
        split_batch(tokens, self.sentinel, batch.len())
    }
}

/// Join documents with the sentinel after each one.
pub(crate) fn merge_batch(batch: &[String], sentinel: &str) -> String {
    batch
        .iter()
        .map(|text| format!("{text} {sentinel} "))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split an analyzer token stream back into `expected` documents.
pub(crate) fn split_batch(
    tokens: Vec<String>,
    sentinel: &str,
    expected: usize,
) -> Result<Vec<Vec<String>>> {
    let mut documents = Vec::with_capacity(expected);
    let mut current = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if token.to_lowercase() == sentinel {
            documents.push(std::mem::take(&mut current));
        } else {
            current.push(token.to_string());
        }
    }

    // Tokens after the last sentinel belong to no document.
    let found = documents.len() + usize::from(!current.is_empty());
    if found != expected {
        return Err(CleanError::BoundaryMismatch { expected, found });
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::morph::DictionaryAnalyzer;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_batch_layout() {
        let merged = merge_batch(&strings(&["a b", "c"]), "br");
        assert_eq!(merged, "a b br  c br ");
    }

    #[test]
    fn test_split_batch_drops_blank_tokens() {
        let tokens = strings(&["a", " ", "b", " ", "br", "   ", "\n", "c", "br", "\n"]);
        let docs = split_batch(tokens, "br", 2).unwrap();
        assert_eq!(docs, vec![strings(&["a", "b"]), strings(&["c"])]);
    }

    #[test]
    fn test_split_batch_empty_documents() {
        let tokens = strings(&[" ", "br", " ", " ", "br", " "]);
        let docs = split_batch(tokens, "br", 2).unwrap();
        assert_eq!(docs, vec![Vec::<String>::new(), Vec::new()]);
    }

    #[test]
    fn test_split_batch_detects_extra_boundary() {
        let tokens = strings(&["a", "br", "b", "br", "c", "br"]);
        let err = split_batch(tokens, "br", 2).unwrap_err();
        assert_eq!(err, CleanError::BoundaryMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn test_split_batch_detects_trailing_tokens() {
        let tokens = strings(&["a", "br", "dangling"]);
        let err = split_batch(tokens, "br", 1).unwrap_err();
        assert_eq!(err, CleanError::BoundaryMismatch { expected: 1, found: 2 });
    }

    #[test]
    fn test_run_across_batches() {
        let analyzer = DictionaryAnalyzer::from_lemmas([("документы", "документ")]);
        let batcher = Batcher {
            analyzer: &analyzer,
            sentinel: "br",
            batch_size: 2,
            parallel: false,
        };
        let texts = strings(&["документы один", "", "два документы", "три"]);
        let out = batcher.run(&texts).unwrap();
        assert_eq!(
            out,
            vec![
                strings(&["документ", "один"]),
                vec![],
                strings(&["два", "документ"]),
                strings(&["три"]),
            ]
        );
    }

    #[test]
    fn test_run_parallel_matches_sequential() {
        let analyzer = DictionaryAnalyzer::new();
        let texts: Vec<String> = (0..57).map(|i| format!("слово{i} и ещё")).collect();
        let mut batcher = Batcher {
            analyzer: &analyzer,
            sentinel: "br",
            batch_size: 5,
            parallel: false,
        };
        let sequential = batcher.run(&texts).unwrap();
        batcher.parallel = true;
        assert_eq!(batcher.run(&texts).unwrap(), sequential);
    }

    #[test]
    fn test_run_empty_input() {
        let analyzer = DictionaryAnalyzer::new();
        let batcher = Batcher {
            analyzer: &analyzer,
            sentinel: "br",
            batch_size: 10,
            parallel: false,
        };
        assert!(batcher.run(&[]).unwrap().is_empty());
    }
}
