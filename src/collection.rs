//! Index-labelled document collections.
//!
//! A [`DocumentCollection`] is the only artifact that flows between cleaning
//! steps. It pairs every document with an integer label. Labels are assigned
//! once, when the caller builds the collection, and are carried verbatim
//! through every step: filtering removes documents together with their labels
//! and never renumbers the survivors. Use [`DocumentCollection::reset_index`]
//! to renumber explicitly.
//!
//! # JSON shape
//!
//! ```json
//! { "index": [0, 2, 5], "documents": ["raw text", ["two", "tokens"], null] }
//! ```
//!
//! `index` may be omitted, in which case documents are labelled `0..n`.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{CleanError, Result, Shape};

/// A single document: raw text, a token sequence, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Text(String),
    Tokens(Vec<String>),
    Absent,
}

impl Document {
    /// Shape of a present document; `None` for [`Document::Absent`].
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Document::Text(_) => Some(Shape::Text),
            Document::Tokens(_) => Some(Shape::Tokens),
            Document::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Document::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Document::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Document::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Document::Text(text.to_string())
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Document::Text(text)
    }
}

impl From<Vec<String>> for Document {
    fn from(tokens: Vec<String>) -> Self {
        Document::Tokens(tokens)
    }
}

impl From<Vec<&str>> for Document {
    fn from(tokens: Vec<&str>) -> Self {
        Document::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        value.map_or(Document::Absent, Into::into)
    }
}

/// Ordered, index-labelled set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCollection")]
pub struct DocumentCollection {
    index: Vec<i64>,
    documents: Vec<Document>,
}

/// Unvalidated serde form of a [`DocumentCollection`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCollection {
    #[serde(default)]
    index: Option<Vec<i64>>,
    documents: Vec<Document>,
}

impl TryFrom<RawCollection> for DocumentCollection {
    type Error = CleanError;

    fn try_from(raw: RawCollection) -> Result<Self> {
        match raw.index {
            Some(index) => Self::with_index(index, raw.documents),
            None => Ok(Self::new(raw.documents)),
        }
    }
}

impl DocumentCollection {
    /// Build a collection labelled `0..n`.
    pub fn new(documents: Vec<Document>) -> Self {
        let index = (0..documents.len() as i64).collect();
        Self { index, documents }
    }

    /// Build a collection of raw-text documents labelled `0..n`.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|text| Document::Text(text.into()))
                .collect(),
        )
    }

    /// Build a collection with explicit labels.
    ///
    /// Fails with `InvalidArgument` when the label and document counts differ
    /// or a label repeats.
    pub fn with_index(index: Vec<i64>, documents: Vec<Document>) -> Result<Self> {
        if index.len() != documents.len() {
            return Err(CleanError::invalid_argument(format!(
                "index has {} labels but there are {} documents",
                index.len(),
                documents.len()
            )));
        }
        let mut seen = FxHashSet::default();
        if let Some(dup) = index.iter().find(|label| !seen.insert(**label)) {
            return Err(CleanError::invalid_argument(format!(
                "index label {dup} is not unique"
            )));
        }
        Ok(Self { index, documents })
    }

    /// Convert a dynamically-typed argument into a collection.
    ///
    /// Only the object form (`{"index": [...], "documents": [...]}`) is
    /// accepted; bare strings, bare lists and scalars are rejected with
    /// `InvalidArgument`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CleanError::invalid_argument(format!(
                "expected a document collection, got {}",
                json_type_name(&value)
            )));
        }
        serde_json::from_value(value).map_err(|err| CleanError::invalid_argument(err.to_string()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by its label.
    pub fn get(&self, label: i64) -> Option<&Document> {
        self.index
            .iter()
            .position(|l| *l == label)
            .map(|pos| &self.documents[pos])
    }

    /// Iterate `(label, document)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Document)> {
        self.index.iter().copied().zip(self.documents.iter())
    }

    pub fn into_parts(self) -> (Vec<i64>, Vec<Document>) {
        (self.index, self.documents)
    }

    /// Renumber documents `0..n`, keeping their order.
    pub fn reset_index(self) -> Self {
        Self::new(self.documents)
    }

    /// Replace every document, keeping the labels.
    ///
    /// `documents` must have exactly one entry per label.
    pub fn with_documents(self, documents: Vec<Document>) -> Result<Self> {
        Self::with_index(self.index, documents)
    }

    /// Apply `f` to every present document; absent documents pass through.
    ///
    /// The first error aborts the map.
    pub fn try_map<F>(self, mut f: F) -> Result<Self>
    where
        F: FnMut(i64, Document) -> Result<Document>,
    {
        let documents = self
            .index
            .iter()
            .zip(self.documents)
            .map(|(&label, doc)| match doc {
                Document::Absent => Ok(Document::Absent),
                doc => f(label, doc),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            index: self.index,
            documents,
        })
    }

    /// Parallel [`try_map`](Self::try_map). Output order matches input order.
    pub fn par_try_map<F>(self, f: F) -> Result<Self>
    where
        F: Fn(i64, Document) -> Result<Document> + Send + Sync,
    {
        let documents = self
            .index
            .par_iter()
            .zip(self.documents.into_par_iter())
            .map(|(&label, doc)| match doc {
                Document::Absent => Ok(Document::Absent),
                doc => f(label, doc),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            index: self.index,
            documents,
        })
    }

    /// Keep documents for which `keep` returns `true`, with their labels.
    pub fn retain<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&Document) -> bool,
    {
        let (index, documents) = self
            .index
            .into_iter()
            .zip(self.documents)
            .filter(|(_, doc)| keep(doc))
            .unzip();
        Self { index, documents }
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_labels_from_zero() {
        let docs = DocumentCollection::from_texts(["a", "b", "c"]);
        assert_eq!(docs.index(), &[0, 1, 2]);
        assert_eq!(docs.get(1), Some(&Document::from("b")));
    }

    #[test]
    fn test_with_index_rejects_length_mismatch() {
        let err = DocumentCollection::with_index(vec![0, 1], vec![Document::from("a")])
            .unwrap_err();
        assert!(matches!(err, CleanError::InvalidArgument { .. }));
    }

    #[test]
    fn test_with_index_rejects_duplicate_labels() {
        let err = DocumentCollection::with_index(
            vec![3, 3],
            vec![Document::from("a"), Document::from("b")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_retain_preserves_labels() {
        let docs = DocumentCollection::with_index(
            vec![10, 20, 30],
            vec![Document::from("a"), Document::Absent, Document::from("c")],
        )
        .unwrap();
        let kept = docs.retain(|doc| !doc.is_absent());
        assert_eq!(kept.index(), &[10, 30]);
        assert_eq!(kept.reset_index().index(), &[0, 1]);
    }

    #[test]
    fn test_try_map_skips_absent() {
        let docs = DocumentCollection::new(vec![Document::from("A"), Document::Absent]);
        let mut calls = 0;
        let out = docs
            .try_map(|_, doc| {
                calls += 1;
                Ok(Document::Text(doc.as_text().unwrap_or("").to_lowercase()))
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(out.documents(), &[Document::from("a"), Document::Absent]);
    }

    #[test]
    fn test_par_try_map_keeps_order() {
        let texts: Vec<String> = (0..500).map(|i| format!("doc{i}")).collect();
        let docs = DocumentCollection::from_texts(texts.clone());
        let out = docs
            .par_try_map(|_, doc| Ok(Document::Tokens(vec![doc.as_text().unwrap_or("").to_string()])))
            .unwrap();
        for (doc, text) in out.documents().iter().zip(&texts) {
            assert_eq!(doc.as_tokens(), Some(&[text.clone()][..]));
        }
    }

    #[test]
    fn test_json_roundtrip_with_null_and_tokens() {
        let value = json!({
            "index": [0, 2, 5],
            "documents": ["raw", ["two", "tokens"], null]
        });
        let docs = DocumentCollection::from_value(value).unwrap();
        assert_eq!(docs.index(), &[0, 2, 5]);
        assert_eq!(docs.documents()[1], Document::from(vec!["two", "tokens"]));
        assert!(docs.documents()[2].is_absent());

        let back = serde_json::to_value(&docs).unwrap();
        assert_eq!(back["documents"][2], serde_json::Value::Null);
    }

    #[test]
    fn test_from_value_rejects_non_collections() {
        for value in [json!("not a collection"), json!(["a", "b"]), json!(42)] {
            let err = DocumentCollection::from_value(value).unwrap_err();
            assert!(matches!(err, CleanError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn test_from_value_rejects_duplicate_index() {
        let err = DocumentCollection::from_value(json!({
            "index": [1, 1],
            "documents": ["a", "b"]
        }))
        .unwrap_err();
        assert!(matches!(err, CleanError::InvalidArgument { .. }));
    }
}
