// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Load + repair the intents file   (Layer 4 - data)
//   Step 2: Write the cleaned snapshot       (Layer 4 - data)
//   Step 3: Fit vectorizer + classifier      (Layer 5 - ml)
//   Step 4: Save the model                   (Layer 6 - infra)
//   Step 5: Save config + epoch metrics      (Layer 6 - infra)
//   Step 6: Mark the model as the latest     (Layer 6 - infra)
//
// The latest pointer moves only after every file of the run is on
// disk, so a failed run never becomes the model `ask`/`chat` serve.
//
// The TrainedModel produced here is a value handed to the model
// store; nothing is kept in global state.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{
    dataset::{DatasetOptions, IntentDataset},
    loader::IntentLoader,
};
use crate::infra::checkpoint::ModelStore;
use crate::ml::trainer::{train, Misclassified};

// ─── Training Configuration ──────────────────────────────────────────────────
// Saved beside every model so serving loads the dataset exactly the
// way training did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub dataset_path:        String,
    /// Where the cleaned snapshot goes; `None` skips it
    pub snapshot_path:       Option<String>,
    pub model_dir:           String,
    pub epochs:              usize,
    pub lr:                  f64,
    pub normalize_responses: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:        "source_data/raw/intents.json".to_string(),
            snapshot_path:       Some("source_data/cleaned/intents.json".to_string()),
            model_dir:           "models".to_string(),
            epochs:              300,
            lr:                  0.1,
            normalize_responses: false,
        }
    }
}

impl TrainConfig {
    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions { normalize_responses: self.normalize_responses }
    }
}

/// Summary of a finished run, for the CLI to print.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub model_id:      String,
    pub examples:      usize,
    pub intents:       usize,
    pub accuracy:      f64,
    /// Patterns the classifier puts under another intent
    pub misclassified: Vec<Misclassified>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Load + repair ─────────────────────────────────────────────
        tracing::info!("Loading intents from '{}'", cfg.dataset_path);
        let loader  = IntentLoader::new(&cfg.dataset_path);
        let dataset = IntentDataset::load(&loader, cfg.dataset_options())
            .with_context(|| format!("Cannot load dataset '{}'", cfg.dataset_path))?;

        // ── Step 2: Snapshot ──────────────────────────────────────────────────
        if let Some(snapshot) = &cfg.snapshot_path {
            dataset.write_snapshot(Path::new(snapshot))?;
        }

        // ── Step 3: Fit ───────────────────────────────────────────────────────
        let (model, report) = train(dataset.examples(), cfg).context("Training failed")?;

        // ── Step 4: Save the model ────────────────────────────────────────────
        let store = ModelStore::new(&cfg.model_dir);
        let model = store.save(model)?;

        // ── Step 5: Config + metrics ──────────────────────────────────────────
        store.save_config(model.id(), cfg)?;
        let metrics = store.metrics_logger(model.id())?;
        metrics.log_all(&report.epochs)?;
        tracing::info!("Epoch metrics written to '{}'", metrics.csv_path().display());

        // ── Step 6: Latest pointer ────────────────────────────────────────────
        store.mark_latest(model.id())?;

        Ok(TrainOutcome {
            model_id:      model.id().to_string(),
            examples:      dataset.examples().len(),
            intents:       model.labels().len(),
            accuracy:      report.accuracy,
            misclassified: report.misclassified,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ChatbotError;
    use std::fs;

    #[test]
    fn test_train_writes_model_snapshot_and_metrics() {
        let dir     = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("intents.json");
        fs::write(
            &dataset,
            r#"{"intents": [
                {"tag": "greeting", "patterns": ["Hi", "Hello"], "responses": ["Hey!"]},
                {"tag": "hours", "patterns": ["When are you open?"], "responses": ["9 to 5."]}
            ]}"#,
        )
        .unwrap();

        let cfg = TrainConfig {
            dataset_path:  dataset.display().to_string(),
            snapshot_path: Some(dir.path().join("cleaned/intents.json").display().to_string()),
            model_dir:     dir.path().join("models").display().to_string(),
            epochs:        40,
            ..TrainConfig::default()
        };
        let outcome = TrainUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(outcome.examples, 3);
        assert_eq!(outcome.intents, 2);
        assert!(outcome.model_id.starts_with("chatbot_model_"));

        let model_dir = dir.path().join("models").join(&outcome.model_id);
        assert!(model_dir.join("model.json").exists());
        assert!(model_dir.join("vectorizer.json").exists());
        assert_eq!(
            fs::read_to_string(model_dir.join("metrics.csv")).unwrap().lines().count(),
            41
        );
        assert!(dir.path().join("cleaned/intents.json").exists());

        assert!(outcome.misclassified.is_empty());

        let store = ModelStore::new(dir.path().join("models"));
        assert_eq!(store.latest_id().unwrap(), outcome.model_id);
        assert_eq!(store.load_config(&outcome.model_id).unwrap(), cfg);
    }

    #[test]
    fn test_empty_dataset_is_a_training_error() {
        let dir     = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("intents.json");
        fs::write(&dataset, r#"{"intents": [{"tag": "empty"}]}"#).unwrap();

        let cfg = TrainConfig {
            dataset_path:  dataset.display().to_string(),
            snapshot_path: None,
            model_dir:     dir.path().join("models").display().to_string(),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<ChatbotError>(), Some(ChatbotError::Training(_))));
        assert!(!dir.path().join("models").exists());
    }

    #[test]
    fn test_unreadable_dataset_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            dataset_path:  dir.path().join("missing.json").display().to_string(),
            snapshot_path: None,
            model_dir:     dir.path().join("models").display().to_string(),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(err.downcast_ref::<ChatbotError>(), Some(ChatbotError::DatasetRead(_))));
    }
}
