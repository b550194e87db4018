// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers:
//   - IntentLoader (a JSON file) implements IntentSource
//   - Matcher implements Responder
//
// The application layer only talks to these traits, so a test
// can feed an in-memory dataset and a seeded random source.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use rand::RngCore;

use crate::domain::error::ChatbotResult;
use crate::domain::intent::IntentRecord;

// ─── IntentSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the repaired list of intent records.
///
/// Implementations:
///   - IntentLoader → reads a JSON dataset file
///   - serde_json::Value → an already-parsed document
pub trait IntentSource {
    /// Load every intent, applying the structural repairs
    /// (missing tag → "unknown", missing lists → empty).
    fn load_intents(&self) -> ChatbotResult<Vec<IntentRecord>>;
}

// ─── Responder ────────────────────────────────────────────────────────────────
/// Anything that can turn one user message into one reply.
///
/// The random source is passed in rather than owned so callers
/// decide between a seeded generator (tests, `--seed`) and entropy.
pub trait Responder {
    fn respond(&self, user_input: &str, rng: &mut dyn RngCore) -> ChatbotResult<String>;
}
