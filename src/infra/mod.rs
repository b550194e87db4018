// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of the other
// layers:
//
//   checkpoint.rs — ModelStore: one directory per trained model
//                   (classifier weights via Burn's CompactRecorder,
//                   vectorizer and metadata as JSON) plus a
//                   pointer to the latest run
//
//   metrics.rs    — per-epoch loss/accuracy CSV for a training run
//
//   chat_log.rs   — append-only CSV of conversation turns
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Conversation history CSV
pub mod chat_log;
