// ============================================================
// Layer 5 — TF-IDF Vectorizer
// ============================================================
// Maps normalised text to a fixed-width vector so phrases can be
// compared with cosine similarity and fed to the classifier.
//
// Fitting over N documents (the normalised patterns):
//   vocabulary  = sorted set of every feature token seen
//                 (tokens of 2+ characters, see Preprocessor)
//   df(t)       = number of documents containing t
//   idf(t)      = ln((1 + N) / (1 + df(t))) + 1
//
// Transforming one document:
//   tf(t)       = raw count of t in the document
//   w(t)        = tf(t) * idf(t)
//   vector      = w / ||w||₂     (the zero vector stays zero)
//
// Tokens outside the vocabulary are ignored, so an input made
// only of unseen words maps to the zero vector.
//
// The fitted state is plain data (serde) and is stored next to
// the classifier weights.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::{ChatbotError, ChatbotResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// token → feature index; indices follow sorted token order
    vocabulary: BTreeMap<String, usize>,
    /// smoothed inverse document frequency per feature index
    idf: Vec<f64>,
    /// number of documents seen while fitting
    n_documents: usize,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and IDF weights on normalised documents.
    ///
    /// Fails with `Training` when there are no documents or when no
    /// document contains a single feature token.
    pub fn fit(documents: &[String]) -> ChatbotResult<Self> {
        if documents.is_empty() {
            return Err(ChatbotError::training("cannot fit a vector space on zero examples"));
        }

        let prep = Preprocessor::new();

        // ── Document frequencies ──────────────────────────────────────────────
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<&str> = prep.feature_tokens(doc).collect();
            for token in unique {
                *document_frequency.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ChatbotError::training(
                "empty vocabulary: no pattern contains a token of two or more characters",
            ));
        }

        // ── Vocabulary (sorted) + smoothed IDF ────────────────────────────────
        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf        = Vec::with_capacity(document_frequency.len());
        for (idx, (token, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(token, idx);
        }

        Ok(Self { vocabulary, idf, n_documents: documents.len() })
    }

    /// Project one normalised document into the vector space.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let prep = Preprocessor::new();
        let mut weights = vec![0.0; self.vocabulary.len()];

        for token in prep.feature_tokens(document) {
            if let Some(&idx) = self.vocabulary.get(token) {
                weights[idx] += 1.0;
            }
        }

        for (w, idf) in weights.iter_mut().zip(&self.idf) {
            *w *= idf;
        }

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in &mut weights {
                *w /= norm;
            }
        }
        weights
    }

    pub fn transform_all(&self, documents: &[String]) -> Vec<Vec<f64>> {
        documents.iter().map(|d| self.transform(d)).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

/// Cosine of the angle between two vectors; 0.0 when either is zero
/// or the lengths differ.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64   = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a     = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b     = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
