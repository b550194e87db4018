// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `train`, `ask`, `chat` and
// `history`, and all their configurable flags.
//
// Paths can also come from the environment:
//   CHATBOT_DATASET    → --dataset
//   CHATBOT_MODEL_DIR  → --model-dir
//   CHATBOT_LOG        → --log
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::chat_use_case::ChatConfig;
use crate::application::train_use_case::TrainConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the intents file and train a model on it
    Train(TrainArgs),

    /// Answer a single question with a trained model
    Ask(AskArgs),

    /// Hold an interactive conversation on stdin
    Chat(ChatArgs),

    /// Print the conversation log
    History(HistoryArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Intents JSON file to train on
    #[arg(long, env = "CHATBOT_DATASET", default_value = "source_data/raw/intents.json")]
    pub dataset: String,

    /// Where to write the cleaned dataset snapshot
    #[arg(long, default_value = "source_data/cleaned/intents.json")]
    pub snapshot: String,

    /// Skip writing the snapshot
    #[arg(long)]
    pub no_snapshot: bool,

    /// Directory that holds one sub-directory per trained model
    #[arg(long, env = "CHATBOT_MODEL_DIR", default_value = "models")]
    pub model_dir: String,

    /// Full-batch optimisation steps for the intent classifier
    #[arg(long, default_value_t = 300)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.1)]
    pub lr: f64,

    /// Lower-case and strip punctuation from responses as well
    #[arg(long)]
    pub normalize_responses: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:        a.dataset,
            snapshot_path:       (!a.no_snapshot).then_some(a.snapshot),
            model_dir:           a.model_dir,
            epochs:              a.epochs,
            lr:                  a.lr,
            normalize_responses: a.normalize_responses,
        }
    }
}

/// Flags shared by every command that serves replies.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory the models were saved to
    #[arg(long, env = "CHATBOT_MODEL_DIR", default_value = "models")]
    pub model_dir: String,

    /// Serve this model instead of the latest one
    #[arg(long)]
    pub model_id: Option<String>,

    /// Read intents from here instead of the training-time dataset
    #[arg(long, env = "CHATBOT_DATASET")]
    pub dataset: Option<String>,

    /// Seed for response selection (random when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Conversation log CSV
    #[arg(long, env = "CHATBOT_LOG", default_value = "chat_log.csv")]
    pub log: String,

    /// Do not record the conversation
    #[arg(long)]
    pub no_log: bool,
}

impl From<ServeArgs> for ChatConfig {
    fn from(a: ServeArgs) -> Self {
        ChatConfig {
            model_dir:    a.model_dir,
            model_id:     a.model_id,
            dataset_path: a.dataset,
            seed:         a.seed,
            log_path:     (!a.no_log).then_some(a.log),
        }
    }
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to answer
    #[arg(long)]
    pub question: String,

    /// Also show the matched pattern, its similarity and the
    /// classifier's prediction
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub serve: ServeArgs,
}

/// All arguments for the `chat` command
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub serve: ServeArgs,
}

/// All arguments for the `history` command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Conversation log CSV
    #[arg(long, env = "CHATBOT_LOG", default_value = "chat_log.csv")]
    pub log: String,
}
