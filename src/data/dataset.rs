// ============================================================
// Layer 4 — Intent Dataset
// ============================================================
// Flattens repaired intent records into one TrainingExample per
// (intent, pattern) pair and collects the greeting phrases.
//
//   IntentRecord { tag: "farewell",
//                  patterns: ["Bye!", "See you"],
//                  responses: ["Goodbye!"] }
//       │
//       ▼
//   TrainingExample { question: "bye",     responses: [...], tag: "farewell" }
//   TrainingExample { question: "see you", responses: [...], tag: "farewell" }
//
// Example order follows the dataset: intents in file order,
// patterns in list order. The matcher relies on this order for
// its first-match-wins tie break.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::preprocessor::Preprocessor;
use crate::domain::error::ChatbotResult;
use crate::domain::intent::{GreetingSet, IntentRecord, TrainingExample, GREETING_TAG};
use crate::domain::traits::IntentSource;

/// How responses are carried into the training examples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOptions {
    /// Run responses through the normaliser too, as the cleaning
    /// step of the intents file is documented to do. Off by default:
    /// normalised replies lose their capitalisation and punctuation,
    /// so a farewell intent would answer "goodbye" instead of the
    /// "Goodbye!" it was written with. `train --normalize-responses`
    /// turns it on.
    pub normalize_responses: bool,
}

/// The flattened dataset the trainer and matcher work from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDataset {
    examples:  Vec<TrainingExample>,
    greetings: GreetingSet,
}

/// Layout of the cleaned snapshot file.
#[derive(Serialize)]
struct Snapshot<'a> {
    intents: &'a [TrainingExample],
}

impl IntentDataset {
    /// Load from any source and flatten.
    pub fn load(source: &dyn IntentSource, options: DatasetOptions) -> ChatbotResult<Self> {
        let records = source.load_intents()?;
        let dataset = Self::from_records(&records, options);
        tracing::info!(
            "Loaded {} intents → {} training examples, {} greeting phrases",
            records.len(),
            dataset.examples.len(),
            dataset.greetings.len(),
        );
        if dataset.greetings.is_empty() {
            tracing::warn!("No '{}' intent with patterns: greeting shortcut disabled", GREETING_TAG);
        }
        Ok(dataset)
    }

    /// Flatten already-repaired records. Pure and deterministic.
    pub fn from_records(records: &[IntentRecord], options: DatasetOptions) -> Self {
        let prep          = Preprocessor::new();
        let mut examples  = Vec::new();
        let mut greetings = GreetingSet::new();

        for record in records {
            if record.is_greeting() {
                for pattern in &record.patterns {
                    greetings.insert(pattern.clone());
                }
            }

            let responses: Vec<String> = if options.normalize_responses {
                record.responses.iter().map(|r| prep.normalize(r)).collect()
            } else {
                record.responses.clone()
            };

            for pattern in &record.patterns {
                examples.push(TrainingExample::new(
                    prep.normalize(pattern),
                    responses.clone(),
                    record.tag.clone(),
                ));
            }
        }

        Self { examples, greetings }
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn greetings(&self) -> &GreetingSet {
        &self.greetings
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Write the flattened examples as pretty JSON for auditing.
    /// Parent directories are created as needed.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&Snapshot { intents: &self.examples })?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write snapshot to '{}'", path.display()))?;
        tracing::debug!("Wrote cleaned dataset snapshot to '{}'", path.display());
        Ok(())
    }
}
