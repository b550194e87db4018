// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// The failures the core can report. Everything else (unknown
// tags, empty pattern lists, duplicate tags, non-ASCII input) is
// tolerated by the loader and normaliser.
//
// The application layer wraps these in anyhow with extra context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatbotError {
    /// The dataset could not be read or is not usable JSON.
    #[error("cannot read intent dataset: {0}")]
    DatasetRead(String),

    /// Nothing to train on (no examples, or no usable vocabulary).
    #[error("training failed: {0}")]
    Training(String),

    /// The best-matching example was defined without responses.
    #[error("no response available for intent '{tag}' (matched pattern '{question}')")]
    NoResponseAvailable { tag: String, question: String },
}

impl ChatbotError {
    pub fn dataset_read(msg: impl Into<String>) -> Self {
        Self::DatasetRead(msg.into())
    }

    pub fn training(msg: impl Into<String>) -> Self {
        Self::Training(msg.into())
    }
}

pub type ChatbotResult<T> = std::result::Result<T, ChatbotError>;
