// ============================================================
// Layer 6 — Conversation Log
// ============================================================
// Append-only CSV record of every turn the session driver
// handles:
//
//   User Input,Chatbot Response,Timestamp
//   Hi,Hello,2024-03-09 14:05:07
//   "Hours, please?",9 to 5.,2024-03-09 14:05:19
//
// The header is written when the file is first created. Fields
// are quoted by the csv crate whenever they contain commas,
// quotes or newlines.
//
// Appends go through a mutex so one ConversationLog can be shared
// between sessions; each append opens, writes and flushes.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::domain::conversation::{ConversationLogEntry, TIMESTAMP_FORMAT};

pub const HEADER: [&str; 3] = ["User Input", "Chatbot Response", "Timestamp"];

pub struct ConversationLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConversationLog {
    /// Open (or create, with header) the log at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Cannot create '{}'", parent.display()))?;
            }
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("Cannot create conversation log '{}'", path.display()))?;
            writer.write_record(HEADER)?;
            writer.flush()?;
            tracing::debug!("Created conversation log '{}'", path.display());
        }

        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one turn.
    pub fn append(&self, entry: &ConversationLogEntry) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow::anyhow!("conversation log lock poisoned"))?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open conversation log '{}'", self.path.display()))?;

        let timestamp = entry.formatted_timestamp();
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([
            entry.user_input.as_str(),
            entry.response.as_str(),
            timestamp.as_str(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    /// Every logged turn, oldest first. Rows that cannot be parsed
    /// are skipped with a warning.
    pub fn read_all(path: &Path) -> Result<Vec<ConversationLogEntry>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Cannot read conversation log '{}'", path.display()))?;

        let mut entries = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Skipping unreadable log row {}: {}", line + 1, e);
                    continue;
                }
            };

            let (Some(input), Some(response), Some(ts)) = (record.get(0), record.get(1), record.get(2))
            else {
                tracing::warn!("Skipping short log row {}", line + 1);
                continue;
            };

            match NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT) {
                Ok(timestamp) => entries.push(ConversationLogEntry {
                    user_input: input.to_string(),
                    response:   response.to_string(),
                    timestamp,
                }),
                Err(e) => tracing::warn!("Skipping log row {} with bad timestamp '{}': {}", line + 1, ts, e),
            }
        }
        Ok(entries)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(input: &str, response: &str) -> ConversationLogEntry {
        ConversationLogEntry {
            user_input: input.to_string(),
            response:   response.to_string(),
            timestamp:  NaiveDateTime::parse_from_str("2024-03-09 14:05:07", TIMESTAMP_FORMAT)
                .unwrap(),
        }
    }

    #[test]
    fn test_header_on_create() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_log.csv");
        ConversationLog::open(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["User Input,Chatbot Response,Timestamp"]);
    }

    #[test]
    fn test_append_and_read_back_with_quoting() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_log.csv");
        let log  = ConversationLog::open(&path).unwrap();
        log.append(&entry("Hi", "Hello")).unwrap();
        log.append(&entry("Hours, please?", "He said \"9 to 5\"")).unwrap();

        // reopening keeps existing rows and does not repeat the header
        let log = ConversationLog::open(&path).unwrap();
        log.append(&entry("bye", "Goodbye!")).unwrap();

        let entries = ConversationLog::read_all(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], entry("Hours, please?", "He said \"9 to 5\""));
        assert_eq!(entries[2].response, "Goodbye!");
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_log.csv");
        fs::write(
            &path,
            "User Input,Chatbot Response,Timestamp\nhi,hello,yesterday\nhey,hi,2024-03-09 14:05:07\n",
        )
        .unwrap();
        let entries = ConversationLog::read_all(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_input, "hey");
    }
}
