// ============================================================
// Layer 4 — Intent Dataset Loader
// ============================================================
// Reads the intent definition file and repairs its structure.
//
// Accepted document shapes:
//   { "intents": [ {tag, patterns, responses}, ... ] }
//   [ {tag, patterns, responses}, ... ]          ← bare list
//
// Anything else that is valid JSON (an object without an
// "intents" key, a number, a string) is read as an empty
// intents list.
//
// Per-intent repair (never an error):
//   missing or null "tag"       → "unknown"
//   missing or null "patterns"  → []
//   missing or null "responses" → []
//
// Errors (DatasetRead):
//   - the file cannot be read
//   - the file is not JSON
//   - "intents" is not a list
//   - an intent entry is not an object, or a field has the
//     wrong type (e.g. "patterns": "hello")
//
// Reference: serde_json documentation (Value)
//            Rust Book §9 (Error Handling)

use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::PathBuf};

use crate::domain::error::{ChatbotError, ChatbotResult};
use crate::domain::intent::{IntentRecord, UNKNOWN_TAG};
use crate::domain::traits::IntentSource;

/// Loads intents from a JSON file on disk.
pub struct IntentLoader {
    path: PathBuf,
}

impl IntentLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IntentSource for IntentLoader {
    fn load_intents(&self) -> ChatbotResult<Vec<IntentRecord>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ChatbotError::dataset_read(format!("'{}': {}", self.path.display(), e))
        })?;

        let document: Value = serde_json::from_str(&text).map_err(|e| {
            ChatbotError::dataset_read(format!("'{}' is not valid JSON: {}", self.path.display(), e))
        })?;

        let intents = parse_intents(document)?;
        tracing::debug!("Read {} intents from '{}'", intents.len(), self.path.display());
        Ok(intents)
    }
}

/// An already-parsed JSON document is a source too.
impl IntentSource for Value {
    fn load_intents(&self) -> ChatbotResult<Vec<IntentRecord>> {
        parse_intents(self.clone())
    }
}

/// Wire shape of one intent. Options absorb both "missing" and
/// "null"; unknown keys (context_set, etc.) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIntent {
    tag:       Option<String>,
    patterns:  Option<Vec<String>>,
    responses: Option<Vec<String>>,
}

impl From<RawIntent> for IntentRecord {
    fn from(raw: RawIntent) -> Self {
        IntentRecord::new(
            raw.tag.unwrap_or_else(|| UNKNOWN_TAG.to_string()),
            raw.patterns.unwrap_or_default(),
            raw.responses.unwrap_or_default(),
        )
    }
}

/// Unwrap the document into its intents list and repair every entry.
pub fn parse_intents(document: Value) -> ChatbotResult<Vec<IntentRecord>> {
    let list = match document {
        Value::Object(mut map) => match map.remove("intents") {
            Some(list) => list,
            None => {
                tracing::warn!("Dataset object has no 'intents' key — treating it as empty");
                Value::Array(Vec::new())
            }
        },
        list @ Value::Array(_) => list,
        other => {
            tracing::warn!("Dataset root is {} — treating it as empty", kind_of(&other));
            Value::Array(Vec::new())
        }
    };

    let entries = match list {
        Value::Array(entries) => entries,
        other => {
            return Err(ChatbotError::dataset_read(format!(
                "'intents' must be a list, found {}",
                kind_of(&other)
            )))
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if !entry.is_object() {
                return Err(ChatbotError::dataset_read(format!(
                    "intent #{} must be an object, found {}",
                    i,
                    kind_of(&entry)
                )));
            }
            serde_json::from_value::<RawIntent>(entry)
                .map(IntentRecord::from)
                .map_err(|e| ChatbotError::dataset_read(format!("intent #{}: {}", i, e)))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "a list",
        Value::Object(_) => "an object",
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_missing_fields_are_repaired() {
        let doc = json!({ "intents": [ {} ] });
        let intents = parse_intents(doc).unwrap();
        assert_eq!(intents, vec![IntentRecord::new("unknown", vec![], vec![])]);
    }

    #[test]
    fn test_null_fields_are_repaired() {
        let doc = json!([{ "tag": null, "patterns": null, "responses": ["ok"] }]);
        let intents = parse_intents(doc).unwrap();
        assert_eq!(intents[0].tag, "unknown");
        assert!(intents[0].patterns.is_empty());
        assert_eq!(intents[0].responses, vec!["ok".to_string()]);
    }

    #[test]
    fn test_bare_list_is_accepted() {
        let doc = json!([{ "tag": "thanks", "patterns": ["thanks"], "responses": ["any time"] }]);
        let intents = parse_intents(doc).unwrap();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].tag, "thanks");
    }

    #[test]
    fn test_object_without_intents_is_empty() {
        assert!(parse_intents(json!({ "data": [] })).unwrap().is_empty());
        assert!(parse_intents(json!(42)).unwrap().is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let doc = json!([{ "tag": "a", "patterns": [], "responses": [], "context_set": "" }]);
        assert_eq!(parse_intents(doc).unwrap().len(), 1);
    }

    #[test]
    fn test_intents_not_a_list_fails() {
        let err = parse_intents(json!({ "intents": "nope" })).unwrap_err();
        assert!(matches!(err, ChatbotError::DatasetRead(_)));
    }

    #[test]
    fn test_wrong_field_type_fails() {
        let err = parse_intents(json!([{ "tag": "a", "patterns": "hello" }])).unwrap_err();
        assert!(matches!(err, ChatbotError::DatasetRead(_)));
    }

    #[test]
    fn test_non_object_entry_fails() {
        let err = parse_intents(json!(["greeting"])).unwrap_err();
        assert!(matches!(err, ChatbotError::DatasetRead(_)));
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let loader = IntentLoader::new(dir.path().join("absent.json"));
        assert!(matches!(loader.load_intents(), Err(ChatbotError::DatasetRead(_))));
    }

    #[test]
    fn test_invalid_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let loader = IntentLoader::new(file.path());
        assert!(matches!(loader.load_intents(), Err(ChatbotError::DatasetRead(_))));
    }

    #[test]
    fn test_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"intents": [{{"tag": "greeting", "patterns": ["Hi"], "responses": ["Hello!"]}}]}}"#
        )
        .unwrap();
        let intents = IntentLoader::new(file.path()).load_intents().unwrap();
        assert_eq!(intents[0].patterns, vec!["Hi".to_string()]);
    }
}
