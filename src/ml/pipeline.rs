// ============================================================
// Layer 5 — Trained Model
// ============================================================
// The fitted pipeline produced by one training run:
//
//   ModelMetadata     — identifier, creation time, tag labels
//   TfidfVectorizer   — the vector space
//   IntentClassifier  — logistic-regression weights (NdArray)
//
// A TrainedModel is built once, then only read. Retraining makes
// a new value with a new identifier.

use anyhow::Result;
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::batcher::IntentBatcher;
use crate::ml::model::IntentClassifier;
use crate::ml::vectorizer::TfidfVectorizer;

/// Backend used for serving and for loading checkpoints.
pub type InferBackend = NdArray;

/// Everything needed to rebuild the classifier before loading
/// its weights, plus the label names for its outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id:         String,
    pub created_at: DateTime<Utc>,
    /// Tag per classifier output, in output order
    pub labels:     Vec<String>,
    pub n_features: usize,
}

/// The classifier's opinion about one input.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPrediction {
    pub tag:         String,
    pub label_index: usize,
    pub probability: f32,
}

#[derive(Debug)]
pub struct TrainedModel {
    metadata:   ModelMetadata,
    vectorizer: TfidfVectorizer,
    classifier: IntentClassifier<InferBackend>,
    device:     NdArrayDevice,
}

impl TrainedModel {
    pub fn new(
        metadata:   ModelMetadata,
        vectorizer: TfidfVectorizer,
        classifier: IntentClassifier<InferBackend>,
    ) -> Self {
        Self { metadata, vectorizer, classifier, device: NdArrayDevice::default() }
    }

    /// Same fitted state under a different identifier. Used by the
    /// model store when two runs land in the same second.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn labels(&self) -> &[String] {
        &self.metadata.labels
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &IntentClassifier<InferBackend> {
        &self.classifier
    }

    /// Project normalised text into the model's vector space.
    pub fn vectorize(&self, normalized: &str) -> Vec<f64> {
        self.vectorizer.transform(normalized)
    }

    /// Ask the classifier which tag it would pick for normalised text.
    /// Ties go to the lower label index.
    pub fn predict_tag(&self, normalized: &str) -> Result<TagPrediction> {
        let row     = self.vectorize(normalized);
        let batcher = IntentBatcher::<InferBackend>::new(self.device.clone());
        let input   = batcher.features(&[row], self.metadata.n_features);

        let probs: Vec<f32> = self
            .classifier
            .probabilities(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read classifier output: {e:?}"))?;

        let mut best = 0usize;
        for (idx, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = idx;
            }
        }

        let probability = probs
            .get(best)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Classifier produced no outputs"))?;
        let tag = self
            .metadata
            .labels
            .get(best)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No label for classifier output {best}"))?;

        Ok(TagPrediction { tag, label_index: best, probability })
    }
}
