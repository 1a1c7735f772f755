//! TF-IDF vector space over catalog documents.
//!
//! Terms are lowercased runs of two or more word characters. Each term gets a
//! smoothed inverse document frequency:
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! and a document vector holds `count(t, d) * idf(t)` for every term, scaled to
//! unit length. The vocabulary is kept in sorted order so that column indices,
//! and everything computed from them, are identical across runs.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use sprs::CsVec;

use super::EngineError;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Splits text into lowercase terms
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self, EngineError> {
        let pattern =
            Regex::new(TOKEN_PATTERN).map_err(|e| EngineError::Tokenizer(e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Fitted term weights plus one unit-length sparse vector per document
#[derive(Debug, Clone)]
pub struct VectorSpace {
    /// Sorted vocabulary; a term's position is its column index
    terms: Vec<String>,
    idf: Vec<f64>,
    vectors: Vec<CsVec<f64>>,
}

impl VectorSpace {
    /// Learns the vocabulary and term weights from `documents` and vectorizes each one.
    ///
    /// Vectors are returned in document order. A document without any term gets a
    /// zero vector.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Result<Self, EngineError> {
        if documents.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let tokenizer = Tokenizer::new()?;
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|d| tokenizer.tokenize(d.as_ref()))
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let mut terms = Vec::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        let mut columns: BTreeMap<&str, usize> = BTreeMap::new();
        for (column, (term, df)) in doc_freq.iter().enumerate() {
            terms.push(term.to_string());
            idf.push(((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0);
            columns.insert(*term, column);
        }

        let dim = terms.len();
        let vectors = tokenized
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for token in tokens {
                    if let Some(&column) = columns.get(token.as_str()) {
                        *counts.entry(column).or_insert(0.0) += 1.0;
                    }
                }
                weighted_vector(dim, &counts, &idf)
            })
            .collect();

        Ok(Self {
            terms,
            idf,
            vectors,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Fitted inverse document frequency of `term`, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.terms
            .binary_search_by(|candidate| candidate.as_str().cmp(term))
            .ok()
            .map(|column| self.idf[column])
    }

    pub fn vectors(&self) -> &[CsVec<f64>] {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Weights raw counts by idf and scales the result to unit length
fn weighted_vector(dim: usize, counts: &BTreeMap<usize, f64>, idf: &[f64]) -> CsVec<f64> {
    let mut indices = Vec::with_capacity(counts.len());
    let mut data = Vec::with_capacity(counts.len());
    for (&column, &count) in counts {
        indices.push(column);
        data.push(count * idf[column]);
    }

    let norm = data.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in data.iter_mut() {
            *value /= norm;
        }
    }

    CsVec::new(dim, indices, data)
}
