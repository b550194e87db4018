// ============================================================
// Layer 3 — Conversation Log Entry
// ============================================================
// One user turn and the reply it received. Owned by the session
// driver; the matching core never sees it.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in the conversation log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLogEntry {
    pub user_input: String,
    pub response:   String,
    pub timestamp:  NaiveDateTime,
}

impl ConversationLogEntry {
    /// Stamp a turn with the current local time, truncated to seconds.
    pub fn now(user_input: impl Into<String>, response: impl Into<String>) -> Self {
        let now = Local::now().naive_local();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        Self { user_input: user_input.into(), response: response.into(), timestamp }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_whole_seconds() {
        let entry = ConversationLogEntry::now("hi", "hello");
        let parsed = NaiveDateTime::parse_from_str(&entry.formatted_timestamp(), TIMESTAMP_FORMAT)
            .unwrap();
        assert_eq!(parsed, entry.timestamp);
    }
}
