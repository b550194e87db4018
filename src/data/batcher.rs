// ============================================================
// Layer 4 — Intent Batcher
// ============================================================
// Turns TF-IDF feature rows and label indices into Burn tensors.
//
// The datasets this chatbot trains on are tiny (tens to a few
// hundred patterns), so the whole training set is one batch:
//
//   Input:  N feature rows of width V, N label indices
//   Output: IntentBatch { features: [N, V], labels: [N] }
//
// Rows are flattened into one long Vec and reshaped:
//   [r1_f1, r1_f2, ..., r1_fV, r2_f1, ..., rN_fV] → [N, V]
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::prelude::*;

// ─── IntentBatch ──────────────────────────────────────────────────────────────
/// Features and targets for one forward pass.
#[derive(Debug, Clone)]
pub struct IntentBatch<B: Backend> {
    /// TF-IDF rows — shape: [batch_size, n_features]
    pub features: Tensor<B, 2>,

    /// Index into the label list per row — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── IntentBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right backend.
#[derive(Clone, Debug)]
pub struct IntentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> IntentBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack feature rows into a [rows, n_features] float tensor.
    /// Every row must have the same width.
    pub fn features(&self, rows: &[Vec<f64>], n_features: usize) -> Tensor<B, 2> {
        let flat: Vec<f32> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&x| x as f32))
            .collect();

        Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([rows.len(), n_features])
    }

    /// Build the full training batch.
    pub fn batch(&self, rows: &[Vec<f64>], labels: &[usize], n_features: usize) -> IntentBatch<B> {
        let features = self.features(rows, n_features);

        let targets: Vec<i64> = labels.iter().map(|&l| l as i64).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        IntentBatch { features, labels }
    }
}
