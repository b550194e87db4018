// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw intents file and the tensors the
// classifier trains on:
//
//   intents.json
//       │
//       ▼
//   IntentLoader      → reads the file, repairs missing fields
//       │
//       ▼
//   Preprocessor      → lower-cases, strips symbols, collapses spaces
//       │
//       ▼
//   IntentDataset     → one TrainingExample per pattern + greetings
//       │
//       ▼
//   (ml::vectorizer)  → TF-IDF rows
//       │
//       ▼
//   IntentBatcher     → Burn tensors for the trainer
//
// Each module is responsible for exactly one step.

/// Reads and repairs the intents JSON document
pub mod loader;

/// Canonical text normalisation
pub mod preprocessor;

/// Flattened training examples and the greeting set
pub mod dataset;

/// Stacks feature rows and labels into Burn tensors
pub mod batcher;
