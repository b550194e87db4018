// ============================================================
// Layer 2 — Chat Use Case
// ============================================================
// Serves replies from a saved model:
//   1. Find the model (latest, or a given identifier)
//   2. Reload the dataset it was trained on, with the same options
//   3. Build the matcher and the random source
//   4. For every turn: reply, record it in the conversation log,
//      and tell the caller whether the reply ends the session
//
// A reply ends the session when, once normalised, it reads
// "goodbye" or "bye".

use anyhow::{Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use crate::data::{dataset::IntentDataset, loader::IntentLoader, preprocessor::Preprocessor};
use crate::domain::conversation::ConversationLogEntry;
use crate::domain::error::ChatbotResult;
use crate::domain::traits::Responder;
use crate::infra::{chat_log::ConversationLog, checkpoint::ModelStore};
use crate::ml::matcher::{Explanation, Matcher};

/// Printed when a reply ends the conversation.
pub const FAREWELL_MESSAGE: &str = "Thank you for chatting with me. Have a great day!";

const FAREWELL_REPLIES: [&str; 2] = ["goodbye", "bye"];

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model_dir:    String,
    /// `None` serves the latest model
    pub model_id:     Option<String>,
    /// Overrides the dataset path stored with the model
    pub dataset_path: Option<String>,
    /// Fixed seed for reproducible response choice
    pub seed:         Option<u64>,
    /// `None` disables the conversation log
    pub log_path:     Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model_dir:    "models".to_string(),
            model_id:     None,
            dataset_path: None,
            seed:         None,
            log_path:     Some("chat_log.csv".to_string()),
        }
    }
}

/// One answered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub response: String,
    pub farewell: bool,
}

/// True when `response` should end the conversation.
pub fn is_farewell(response: &str) -> bool {
    let normalized = Preprocessor::new().normalize(response);
    FAREWELL_REPLIES.contains(&normalized.as_str())
}

pub struct ChatUseCase {
    matcher: Matcher,
    rng:     StdRng,
    log:     Option<ConversationLog>,
}

impl ChatUseCase {
    pub fn new(cfg: ChatConfig) -> Result<Self> {
        // ── Step 1: Model ─────────────────────────────────────────────────────
        let store = ModelStore::new(&cfg.model_dir);
        let model = match &cfg.model_id {
            Some(id) => store.load(id)?,
            None     => store.load_latest()?,
        };
        let train_cfg = store.load_config(model.id())?;

        // ── Step 2: Dataset ───────────────────────────────────────────────────
        let dataset_path = cfg.dataset_path.unwrap_or_else(|| train_cfg.dataset_path.clone());
        let loader  = IntentLoader::new(&dataset_path);
        let dataset = IntentDataset::load(&loader, train_cfg.dataset_options())
            .with_context(|| format!("Cannot load dataset '{}'", dataset_path))?;
        if dataset.is_empty() {
            tracing::warn!("Dataset '{}' has no patterns: nothing can be answered", dataset_path);
        }

        // ── Step 3: Matcher, rng, log ─────────────────────────────────────────
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let log = cfg.log_path.map(ConversationLog::open).transpose()?;

        Ok(Self::from_parts(Matcher::new(model, dataset), rng, log))
    }

    /// Assemble from already-built parts.
    pub fn from_parts(matcher: Matcher, rng: StdRng, log: Option<ConversationLog>) -> Self {
        Self { matcher, rng, log }
    }

    pub fn model_id(&self) -> &str {
        self.matcher.model().id()
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log.as_ref().map(|l| l.path().to_path_buf())
    }

    /// Answer one message and log the turn.
    ///
    /// A `NoResponseAvailable` error is returned untouched (and
    /// nothing is logged) so the caller can decide whether the
    /// session survives it.
    pub fn reply(&mut self, user_input: &str) -> Result<Turn> {
        let response = self.respond(user_input)?;

        if let Some(log) = &self.log {
            log.append(&ConversationLogEntry::now(user_input, response.clone()))?;
        }

        let farewell = is_farewell(&response);
        Ok(Turn { response, farewell })
    }

    pub fn explain(&self, user_input: &str) -> Result<Explanation> {
        self.matcher.explain(user_input)
    }

    fn respond(&mut self, user_input: &str) -> ChatbotResult<String> {
        self.matcher.respond(user_input, &mut self.rng)
    }
}
