// ============================================================
// Layer 3 — Intent Domain Types
// ============================================================
// The three shapes the intent dataset takes on its way through
// the system:
//
//   IntentRecord     — one intent as written in the dataset file
//                      (tag → patterns → responses)
//   TrainingExample  — one (intent, pattern) pair, flattened and
//                      normalised; the unit we vectorise and match
//   GreetingSet      — raw patterns of the "greeting" intent, used
//                      only for an exact case-insensitive lookup
//
// Reference: Rust Book §5 (Structs), §8 (Collections)

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tag assigned to an intent that does not carry one.
pub const UNKNOWN_TAG: &str = "unknown";

/// Tag whose patterns double as greeting replies.
pub const GREETING_TAG: &str = "greeting";

/// One intent from the dataset, after structural repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub tag:       String,
    pub patterns:  Vec<String>,
    pub responses: Vec<String>,
}

impl IntentRecord {
    pub fn new(
        tag:       impl Into<String>,
        patterns:  Vec<String>,
        responses: Vec<String>,
    ) -> Self {
        Self { tag: tag.into(), patterns, responses }
    }

    pub fn is_greeting(&self) -> bool {
        self.tag == GREETING_TAG
    }
}

/// A single flattened training/matching anchor.
///
/// Field names match the cleaned-snapshot JSON layout:
/// `{"question": ..., "responses": [...], "tag": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// The pattern after normalisation
    pub question:  String,
    pub responses: Vec<String>,
    pub tag:       String,
}

impl TrainingExample {
    pub fn new(
        question:  impl Into<String>,
        responses: Vec<String>,
        tag:       impl Into<String>,
    ) -> Self {
        Self { question: question.into(), responses, tag: tag.into() }
    }

    /// Pick one of this example's responses uniformly at random.
    /// Returns `None` when the intent was defined without responses.
    pub fn choose_response<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.responses.choose(rng).map(String::as_str)
    }
}

/// Raw greeting patterns, de-duplicated, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingSet {
    phrases: Vec<String>,
}

impl GreetingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw phrase. Exact duplicates are ignored.
    pub fn insert(&mut self, phrase: impl Into<String>) {
        let phrase = phrase.into();
        if !self.phrases.contains(&phrase) {
            self.phrases.push(phrase);
        }
    }

    /// Case-insensitive exact membership. No other normalisation is
    /// applied: "hi!" does not match a stored "hi".
    pub fn matches(&self, input: &str) -> bool {
        let needle = input.to_lowercase();
        self.phrases.iter().any(|p| p.to_lowercase() == needle)
    }

    /// Pick a greeting phrase uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.phrases.choose(rng).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GreetingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = GreetingSet::new();
        for phrase in iter {
            set.insert(phrase);
        }
        set
    }
}
