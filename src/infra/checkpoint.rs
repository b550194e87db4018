// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores trained models. Every training run gets its
// own directory named after its identifier:
//
//   models/
//     chatbot_model_20240309_140507/
//       classifier.mpk.gz     ← classifier weights (CompactRecorder)
//       vectorizer.json       ← fitted TF-IDF vocabulary + idf
//       model.json            ← id, creation time, labels, dims
//       train_config.json     ← configuration used for training
//       metrics.csv           ← per-epoch loss / accuracy
//     latest_model.json       ← id of the most recent run
//
// Burn's CompactRecorder:
//   - Serialises module parameters to MessagePack
//   - Compresses with gzip
//   - Type-safe: loading fails if the architecture doesn't match,
//     which is why model.json is read first to rebuild the layer
//     with the right dimensions
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use burn::{
    backend::ndarray::NdArrayDevice,
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::infra::metrics::MetricsLogger;
use crate::ml::model::{IntentClassifier, IntentClassifierConfig};
use crate::ml::pipeline::{InferBackend, ModelMetadata, TrainedModel};
use crate::ml::vectorizer::TfidfVectorizer;

const CLASSIFIER_FILE: &str = "classifier";
const VECTORIZER_FILE: &str = "vectorizer.json";
const METADATA_FILE:   &str = "model.json";
const CONFIG_FILE:     &str = "train_config.json";
const LATEST_FILE:     &str = "latest_model.json";

const MAX_ID_SUFFIX: usize = 10_000;

/// Manages saving and loading of trained models.
/// All files are stored under the configured directory.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model_dir(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }

    /// Persist a freshly trained model under its own directory.
    ///
    /// If a directory with the model's identifier already exists
    /// (two runs in the same second), a numeric suffix is added and
    /// the returned model carries the final identifier.
    ///
    /// The latest pointer is left alone; call `mark_latest` once
    /// everything else belonging to the run has been written.
    pub fn save(&self, model: TrainedModel) -> Result<TrainedModel> {
        let id    = self.claim_dir(model.id())?;
        let model = if id == model.id() { model } else { model.with_id(id) };
        let dir   = self.model_dir(model.id());

        // ── Classifier weights ────────────────────────────────────────────────
        let weights = dir.join(CLASSIFIER_FILE);
        CompactRecorder::new()
            .record(model.classifier().clone().into_record(), weights.clone())
            .with_context(|| format!("Failed to save classifier to '{}'", weights.display()))?;

        // ── Vectorizer + metadata ─────────────────────────────────────────────
        write_json(&dir.join(VECTORIZER_FILE), model.vectorizer())?;
        write_json(&dir.join(METADATA_FILE), model.metadata())?;

        tracing::info!("Saved model '{}' to '{}'", model.id(), dir.display());
        Ok(model)
    }

    /// Point `latest_model.json` at `id`.
    pub fn mark_latest(&self, id: &str) -> Result<()> {
        write_json(&self.dir.join(LATEST_FILE), id)?;
        tracing::debug!("Latest model is now '{}'", id);
        Ok(())
    }

    /// Save the configuration a model was trained with.
    pub fn save_config(&self, id: &str, cfg: &TrainConfig) -> Result<()> {
        write_json(&self.model_dir(id).join(CONFIG_FILE), cfg)
    }

    /// Load the configuration a model was trained with.
    pub fn load_config(&self, id: &str) -> Result<TrainConfig> {
        read_json(&self.model_dir(id).join(CONFIG_FILE)).with_context(|| {
            format!("Model '{}' has no training configuration", id)
        })
    }

    /// Metrics CSV inside the model's directory.
    pub fn metrics_logger(&self, id: &str) -> Result<MetricsLogger> {
        MetricsLogger::new(self.model_dir(id))
    }

    /// Identifier of the most recently saved model.
    pub fn latest_id(&self) -> Result<String> {
        read_json(&self.dir.join(LATEST_FILE)).with_context(|| {
            format!(
                "No trained model found in '{}'. Have you run 'train' first?",
                self.dir.display()
            )
        })
    }

    pub fn load_latest(&self) -> Result<TrainedModel> {
        let id = self.latest_id()?;
        self.load(&id)
    }

    /// Rebuild a model from its directory.
    pub fn load(&self, id: &str) -> Result<TrainedModel> {
        let dir = self.model_dir(id);

        let metadata: ModelMetadata = read_json(&dir.join(METADATA_FILE))
            .with_context(|| format!("Cannot load model '{}'", id))?;
        let vectorizer: TfidfVectorizer = read_json(&dir.join(VECTORIZER_FILE))
            .with_context(|| format!("Cannot load vectorizer of model '{}'", id))?;

        let device = NdArrayDevice::default();
        let classifier: IntentClassifier<InferBackend> =
            IntentClassifierConfig::new(metadata.n_features, metadata.labels.len()).init(&device);

        let weights = dir.join(CLASSIFIER_FILE);
        let record = CompactRecorder::new()
            .load(weights.clone(), &device)
            .with_context(|| format!("Cannot load classifier weights '{}'", weights.display()))?;
        let classifier = classifier.load_record(record);

        tracing::info!("Loaded model '{}' ({} intents)", metadata.id, metadata.labels.len());
        Ok(TrainedModel::new(metadata, vectorizer, classifier))
    }

    /// Create the first free directory among `base`, `base_1`,
    /// `base_2`, ... and return its name. Creation is the claim, so
    /// two runs racing for the same identifier end up in different
    /// directories.
    fn claim_dir(&self, base: &str) -> Result<String> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model store '{}'", self.dir.display()))?;

        for n in 0..MAX_ID_SUFFIX {
            let candidate = if n == 0 { base.to_string() } else { format!("{base}_{n}") };
            match fs::create_dir(self.model_dir(&candidate)) {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Cannot create model directory '{}'", self.model_dir(&candidate).display())
                    })
                }
            }
        }
        anyhow::bail!("No free model directory for '{}' in '{}'", base, self.dir.display())
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed JSON in '{}'", path.display()))
}
