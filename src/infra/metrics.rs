// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records classifier training metrics to a CSV file, one row per
// epoch, next to the model they describe.
//
// Metrics recorded per epoch:
//   - epoch:    the epoch number (1, 2, 3, ...)
//   - loss:     softmax cross-entropy over the full training set
//   - accuracy: fraction of training examples whose predicted
//               tag matches their own tag
//
// Output file: models/<model id>/metrics.csv
//
// Example CSV output:
//   epoch,loss,accuracy
//   1,1.098612,0.333333
//   2,1.012345,1.000000
//   ...
//
// How to read the metrics:
//   - Loss should fall every epoch
//   - Accuracy below 1.0 at the end means some patterns sit on
//     the wrong side of another intent's decision boundary

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Cross-entropy loss before this epoch's update.
    /// Zero-initialised weights start at ln(n_intents).
    pub loss: f64,

    /// Training-set accuracy before this epoch's update, in [0.0, 1.0]
    pub accuracy: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(epoch: usize, loss: f64, accuracy: f64) -> Self {
        Self { epoch, loss, accuracy }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,loss,accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append many rows with a single open/flush.
    pub fn log_all(&self, rows: &[EpochMetrics]) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        for m in rows {
            writeln!(f, "{},{:.6},{:.6}", m.epoch, m.loss, m.accuracy)?;
        }

        tracing::debug!("Logged {} epoch rows to '{}'", rows.len(), self.csv_path.display());
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
