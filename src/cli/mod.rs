// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Four commands are supported:
//   1. `train`   — cleans the intents file and trains a model
//   2. `ask`     — answers one message with the latest model
//   3. `chat`    — a conversation on stdin/stdout
//   4. `history` — prints the conversation log
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::{
    io::{self, BufRead, Write},
    path::Path,
};

use crate::application::chat_use_case::{ChatUseCase, FAREWELL_MESSAGE};
use crate::domain::error::ChatbotError;
use crate::infra::chat_log::ConversationLog;
use crate::ml::matcher::Explanation;
use commands::{AskArgs, ChatArgs, Commands, HistoryArgs, TrainArgs};

/// Shown in `chat` when the matched intent has no responses.
const NO_RESPONSE_NOTICE: &str = "Sorry, I don't have an answer for that yet.";

#[derive(Parser, Debug)]
#[command(
    name = "intent-chatbot",
    version = "0.1.0",
    about = "Train an intent-matching chatbot on a JSON intents file, then talk to it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Ask(args)     => run_ask(args),
            Commands::Chat(args)    => run_chat(args),
            Commands::History(args) => run_history(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.dataset);

    let outcome = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete. Model '{}' ({} intents, {} patterns, training accuracy {:.1}%).",
        outcome.model_id,
        outcome.intents,
        outcome.examples,
        outcome.accuracy * 100.0
    );
    for m in &outcome.misclassified {
        println!(
            "  classifier puts '{}' ({}) under '{}'",
            m.question, m.expected, m.predicted
        );
    }
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let mut chat = ChatUseCase::new(args.serve.into())?;

    if args.explain {
        print_explanation(&chat.explain(&args.question)?);
    }

    let turn = chat.reply(&args.question)?;
    println!("Chatbot: {}", turn.response);
    if turn.farewell {
        println!("{}", FAREWELL_MESSAGE);
    }
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let mut chat = ChatUseCase::new(args.serve.into())?;
    tracing::info!("Serving model '{}'", chat.model_id());
    match chat.log_path() {
        Some(path) => tracing::info!("Recording the conversation in '{}'", path.display()),
        None       => tracing::info!("Conversation log disabled"),
    }

    let stdin = io::stdin();
    chat_loop(&mut chat, stdin.lock(), &mut io::stdout())
}

fn run_history(args: HistoryArgs) -> Result<()> {
    render_history(Path::new(&args.log), &mut io::stdout())
}

/// Read messages line by line until EOF, `quit`/`exit`, or a
/// farewell reply.
///
/// Surrounding whitespace only decides whether a line is blank or a
/// quit command. The line itself is answered as typed, the same way
/// `ask` answers its `--question`.
pub fn chat_loop<R: BufRead, W: Write>(chat: &mut ChatUseCase, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "Welcome to the chatbot. Type a message and press Enter ('quit' to leave).")?;

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line    = line?;
        let command = line.trim();

        if command.is_empty() {
            continue;
        }
        if command.eq_ignore_ascii_case("quit") || command.eq_ignore_ascii_case("exit") {
            break;
        }

        match chat.reply(&line) {
            Ok(turn) => {
                writeln!(out, "Chatbot: {}", turn.response)?;
                if turn.farewell {
                    writeln!(out, "{}", FAREWELL_MESSAGE)?;
                    break;
                }
            }
            Err(e) if matches!(
                e.downcast_ref::<ChatbotError>(),
                Some(ChatbotError::NoResponseAvailable { .. })
            ) => {
                tracing::warn!("{}", e);
                writeln!(out, "Chatbot: {}", NO_RESPONSE_NOTICE)?;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Print every logged turn, or a notice when there is no log yet.
pub fn render_history<W: Write>(log: &Path, out: &mut W) -> Result<()> {
    if !log.exists() {
        writeln!(out, "No conversation history yet ('{}' does not exist).", log.display())?;
        return Ok(());
    }

    for entry in ConversationLog::read_all(log)? {
        writeln!(out, "User: {}", entry.user_input)?;
        writeln!(out, "Chatbot: {}", entry.response)?;
        writeln!(out, "Timestamp: {}", entry.formatted_timestamp())?;
        writeln!(out, "---")?;
    }
    Ok(())
}

fn print_explanation(explanation: &Explanation) {
    match explanation {
        Explanation::Greeting => println!("Match: greeting phrase"),
        Explanation::Matched { tag, question, similarity, classifier } => {
            println!("Match: '{}' ({}) similarity={:.4}", question, tag, similarity);
            println!(
                "Classifier: {} (p={:.3})",
                classifier.tag, classifier.probability
            );
        }
        Explanation::NoCandidates => println!("Match: none (the dataset has no patterns)"),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat_use_case::ChatConfig;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use std::fs;

    const INTENTS: &str = r#"{"intents": [
        {"tag": "greeting", "patterns": ["hi"], "responses": []},
        {"tag": "farewell", "patterns": ["bye"], "responses": ["Goodbye!"]},
        {"tag": "hours", "patterns": ["when are you open"], "responses": ["9 to 5."]},
        {"tag": "silent", "patterns": ["say nothing"]}
    ]}"#;

    fn chat_in(dir: &Path) -> ChatUseCase {
        let dataset = dir.join("intents.json");
        fs::write(&dataset, INTENTS).unwrap();
        let model_dir = dir.join("models").display().to_string();
        TrainUseCase::new(TrainConfig {
            dataset_path:  dataset.display().to_string(),
            snapshot_path: None,
            model_dir:     model_dir.clone(),
            epochs:        20,
            ..TrainConfig::default()
        })
        .execute()
        .unwrap();

        ChatUseCase::new(ChatConfig {
            model_dir,
            seed:     Some(3),
            log_path: Some(dir.join("chat_log.csv").display().to_string()),
            ..ChatConfig::default()
        })
        .unwrap()
    }

    fn run(chat: &mut ChatUseCase, input: &str) -> String {
        let mut out = Vec::new();
        chat_loop(chat, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_chat_ends_on_farewell() {
        let dir  = tempfile::tempdir().unwrap();
        let mut chat = chat_in(dir.path());
        let out  = run(&mut chat, "hi\n\nwhen are you open\nbye\nhi\n");

        assert!(out.contains("Chatbot: hi\n"));
        assert!(out.contains("Chatbot: 9 to 5.\n"));
        assert!(out.contains(&format!("Chatbot: Goodbye!\n{FAREWELL_MESSAGE}\n")));
        // nothing after the farewell is answered
        assert_eq!(out.matches("Chatbot: hi").count(), 1);

        let logged = ConversationLog::read_all(&dir.path().join("chat_log.csv")).unwrap();
        assert_eq!(logged.len(), 3);
    }

    #[test]
    fn test_chat_survives_missing_responses_and_stops_on_quit() {
        let dir  = tempfile::tempdir().unwrap();
        let mut chat = chat_in(dir.path());
        let out  = run(&mut chat, "say nothing\nQUIT\nwhen are you open\n");

        assert!(out.contains(NO_RESPONSE_NOTICE));
        assert!(!out.contains("9 to 5."));
    }

    #[test]
    fn test_padded_greeting_is_answered_like_ask() {
        let dir  = tempfile::tempdir().unwrap();
        let mut chat = chat_in(dir.path());
        // "  hi  " is not the greeting phrase "hi"; it goes through
        // similarity to the greeting pattern, which has no responses
        let out  = run(&mut chat, "  hi  \n");
        assert!(out.contains(NO_RESPONSE_NOTICE));
        assert!(!out.contains("Chatbot: hi"));
    }

    #[test]
    fn test_chat_ends_on_eof() {
        let dir  = tempfile::tempdir().unwrap();
        let mut chat = chat_in(dir.path());
        let out  = run(&mut chat, "when are you open");
        assert!(out.ends_with("Chatbot: 9 to 5.\nYou: \n"));
    }

    #[test]
    fn test_history_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("chat_log.csv");
        fs::write(
            &log,
            "User Input,Chatbot Response,Timestamp\nhi,hello,2024-03-09 14:05:07\n",
        )
        .unwrap();

        let mut out = Vec::new();
        render_history(&log, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "User: hi\nChatbot: hello\nTimestamp: 2024-03-09 14:05:07\n---\n"
        );
    }

    #[test]
    fn test_history_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        render_history(&dir.path().join("none.csv"), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("No conversation history yet"));
    }

    #[test]
    fn test_cli_arguments_convert() {
        let cli = Cli::try_parse_from([
            "intent-chatbot", "train", "--dataset", "d.json", "--no-snapshot",
            "--epochs", "12", "--normalize-responses",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.dataset_path, "d.json");
        assert_eq!(cfg.snapshot_path, None);
        assert_eq!(cfg.epochs, 12);
        assert!(cfg.normalize_responses);

        let cli = Cli::try_parse_from([
            "intent-chatbot", "ask", "--question", "hi", "--seed", "9", "--no-log",
        ])
        .unwrap();
        let Commands::Ask(args) = cli.command else { panic!("expected ask") };
        assert_eq!(args.question, "hi");
        let cfg: ChatConfig = args.serve.into();
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.log_path, None);
    }
}
