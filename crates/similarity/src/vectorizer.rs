//! Bag-of-words vectorization.
//!
//! Turns feature texts into a sparse term-document matrix of raw counts.
//! Tokenization follows the usual CountVectorizer rules: lowercase the
//! text, take maximal runs of word characters (alphanumeric or `_`) that are
//! at least two characters long, drop stop words.

use crate::stop_words::is_stop_word;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Column position of a term in the vocabulary
pub type TermId = usize;

/// One row of the matrix: `(term, count)` pairs sorted by term id, zero
/// counts omitted.
pub type SparseRow = Vec<(TermId, u32)>;

const MIN_TOKEN_CHARS: usize = 2;

/// Split text into lowercase tokens, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Raw term counts for every document over a shared, sorted vocabulary.
#[derive(Debug, Clone, Default)]
pub struct TermDocumentMatrix {
    vocabulary: Vec<String>,
    term_ids: HashMap<String, TermId>,
    rows: Vec<SparseRow>,
}

impl TermDocumentMatrix {
    /// Build the matrix from documents, one row per document in input order.
    ///
    /// The vocabulary is sorted lexicographically, so the same documents
    /// always produce the same column layout.
    pub fn from_documents<S: AsRef<str> + Sync>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| tokenize(doc.as_ref()))
            .collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let term_ids: HashMap<String, TermId> = vocabulary
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();

        let rows: Vec<SparseRow> = tokenized
            .par_iter()
            .map(|tokens| {
                let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
                for token in tokens {
                    // Every token was added to the vocabulary above
                    if let Some(&id) = term_ids.get(token) {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        debug!(
            "Built term-document matrix: {} documents, {} terms",
            rows.len(),
            vocabulary.len()
        );

        Self {
            vocabulary,
            term_ids,
            rows,
        }
    }

    /// `(documents, terms)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.vocabulary.len())
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn row(&self, doc: usize) -> Option<&[(TermId, u32)]> {
        self.rows.get(doc).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Count of `term` in document `doc`, 0 when either is unknown
    pub fn term_count(&self, doc: usize, term: &str) -> u32 {
        let Some(&id) = self.term_ids.get(term) else {
            return 0;
        };
        self.row(doc)
            .and_then(|row| {
                row.binary_search_by_key(&id, |&(t, _)| t)
                    .ok()
                    .map(|pos| row[pos].1)
            })
            .unwrap_or(0)
    }
}
