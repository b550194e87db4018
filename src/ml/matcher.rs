// ============================================================
// Layer 5 — Matcher / Responder
// ============================================================
// Picks a reply for one user message:
//
//   1. Greeting shortcut — if the message, lower-cased, equals a
//      greeting phrase (lower-cased), reply with a random greeting
//      phrase taken from the greeting set itself.
//   2. Otherwise normalise the message, project it into the TF-IDF
//      space and score it against every training example with
//      cosine similarity.
//   3. Highest score wins. The scan runs in dataset order and only
//      a strictly greater score replaces the current best, so on an
//      exact tie the earlier example wins (including the all-zero
//      case, where the very first example wins).
//   4. Reply with a random response of the winning example.
//
// Candidate vectors are computed once in Matcher::new; they are
// the same vectors a per-query re-vectorisation would produce.
//
// The classifier is NOT consulted for replies. `explain` reports
// its prediction next to the nearest-neighbour winner so the two
// can be compared.

use anyhow::Result;
use rand::RngCore;

use crate::data::dataset::IntentDataset;
use crate::data::preprocessor::Preprocessor;
use crate::domain::error::{ChatbotError, ChatbotResult};
use crate::domain::intent::TrainingExample;
use crate::domain::traits::Responder;
use crate::ml::pipeline::{TagPrediction, TrainedModel};
use crate::ml::vectorizer::cosine_similarity;

/// The nearest training example for one input.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub index:      usize,
    pub example:    &'a TrainingExample,
    pub similarity: f64,
}

/// Diagnostic view of how an input would be handled.
#[derive(Debug, Clone)]
pub enum Explanation {
    /// The input hits the greeting shortcut.
    Greeting,
    /// Nearest-neighbour winner plus the classifier's own guess.
    Matched {
        tag:        String,
        question:   String,
        similarity: f64,
        classifier: TagPrediction,
    },
    /// The dataset has no examples to match against.
    NoCandidates,
}

pub struct Matcher {
    model:      TrainedModel,
    dataset:    IntentDataset,
    candidates: Vec<Vec<f64>>,
    prep:       Preprocessor,
}

impl Matcher {
    pub fn new(model: TrainedModel, dataset: IntentDataset) -> Self {
        let candidates: Vec<Vec<f64>> = dataset
            .examples()
            .iter()
            .map(|e| model.vectorize(&e.question))
            .collect();

        tracing::debug!(
            "Matcher ready: {} candidates, {} greetings, model '{}'",
            candidates.len(),
            dataset.greetings().len(),
            model.id()
        );

        Self { model, dataset, candidates, prep: Preprocessor::new() }
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Nearest example by cosine similarity; first wins on ties.
    /// `None` only when the dataset has no examples.
    pub fn best_match(&self, user_input: &str) -> Option<MatchResult<'_>> {
        let query = self.model.vectorize(&self.prep.normalize(user_input));

        let mut best: Option<MatchResult<'_>> = None;
        for (index, (example, candidate)) in
            self.dataset.examples().iter().zip(&self.candidates).enumerate()
        {
            let similarity = cosine_similarity(&query, candidate);
            let better = best.map_or(true, |current| similarity > current.similarity);
            if better {
                best = Some(MatchResult { index, example, similarity });
            }
        }
        best
    }

    /// Describe how `user_input` would be answered without picking a reply.
    pub fn explain(&self, user_input: &str) -> Result<Explanation> {
        if self.dataset.greetings().matches(user_input) {
            return Ok(Explanation::Greeting);
        }
        let Some(found) = self.best_match(user_input) else {
            return Ok(Explanation::NoCandidates);
        };
        let classifier = self.model.predict_tag(&self.prep.normalize(user_input))?;
        Ok(Explanation::Matched {
            tag:        found.example.tag.clone(),
            question:   found.example.question.clone(),
            similarity: found.similarity,
            classifier,
        })
    }
}

impl Responder for Matcher {
    fn respond(&self, user_input: &str, rng: &mut dyn RngCore) -> ChatbotResult<String> {
        // ── Step 1: greeting shortcut ─────────────────────────────────────────
        let greetings = self.dataset.greetings();
        if greetings.matches(user_input) {
            if let Some(reply) = greetings.choose(rng) {
                return Ok(reply.to_string());
            }
        }

        // ── Steps 2–3: nearest example ────────────────────────────────────────
        let found = self.best_match(user_input).ok_or_else(|| {
            ChatbotError::NoResponseAvailable {
                tag:      String::new(),
                question: String::new(),
            }
        })?;

        tracing::debug!(
            "Matched '{}' → example #{} '{}' ({}) similarity={:.4}",
            user_input,
            found.index,
            found.example.question,
            found.example.tag,
            found.similarity
        );

        // ── Step 4: random response of the winner ─────────────────────────────
        found
            .example
            .choose_response(rng)
            .map(str::to_string)
            .ok_or_else(|| ChatbotError::NoResponseAvailable {
                tag:      found.example.tag.clone(),
                question: found.example.question.clone(),
            })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::data::dataset::DatasetOptions;
    use crate::ml::trainer::train;
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    fn matcher_for(doc: serde_json::Value) -> Matcher {
        let dataset = IntentDataset::load(&doc, DatasetOptions::default()).unwrap();
        let cfg = TrainConfig { epochs: 50, ..TrainConfig::default() };
        let (model, _) = train(dataset.examples(), &cfg).unwrap();
        Matcher::new(model, dataset)
    }

    fn greeting_farewell() -> Matcher {
        matcher_for(json!({ "intents": [
            { "tag": "greeting", "patterns": ["hi", "hello"], "responses": [] },
            { "tag": "farewell", "patterns": ["bye"], "responses": ["Goodbye!"] }
        ]}))
    }

    #[test]
    fn test_greeting_returns_a_greeting_phrase() {
        let m = greeting_farewell();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let reply = m.respond("hi", &mut rng).unwrap();
            assert!(reply == "hi" || reply == "hello", "unexpected reply {reply}");
        }
    }

    #[test]
    fn test_farewell_returns_verbatim_response() {
        let m = greeting_farewell();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(m.respond("bye", &mut rng).unwrap(), "Goodbye!");
        assert_eq!(m.respond("Bye!!", &mut rng).unwrap(), "Goodbye!");
    }

    #[test]
    fn test_greeting_check_is_case_insensitive_both_ways() {
        let m = matcher_for(json!([
            { "tag": "greeting", "patterns": ["Hi", "Hello"], "responses": [] },
            { "tag": "weather", "patterns": ["is it raining"], "responses": ["No idea."] }
        ]));
        let mut rng = StdRng::seed_from_u64(3);
        let reply = m.respond("hI", &mut rng).unwrap();
        assert!(reply == "Hi" || reply == "Hello");
    }

    #[test]
    fn test_greeting_pattern_with_extra_words_goes_through_similarity() {
        // "hello there" is not a greeting phrase, and the greeting intent
        // has no responses, so the nearest match has nothing to say.
        let m = greeting_farewell();
        let mut rng = StdRng::seed_from_u64(4);
        let err = m.respond("hello there", &mut rng).unwrap_err();
        match err {
            ChatbotError::NoResponseAvailable { tag, question } => {
                assert_eq!(tag, "greeting");
                assert_eq!(question, "hello");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_reply_comes_from_best_match() {
        let m = matcher_for(json!([
            { "tag": "hours", "patterns": ["when are you open", "opening hours"],
              "responses": ["9 to 5.", "Weekdays 9-5."] },
            { "tag": "price", "patterns": ["how much does it cost"],
              "responses": ["Ten dollars."] }
        ]));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            let reply = m.respond("what are your opening hours?", &mut rng).unwrap();
            assert!(reply == "9 to 5." || reply == "Weekdays 9-5.");
        }
        assert_eq!(m.respond("cost?", &mut rng).unwrap(), "Ten dollars.");
    }

    #[test]
    fn test_exact_tie_prefers_first_example() {
        let m = matcher_for(json!([
            { "tag": "first",  "patterns": ["order status"], "responses": ["first"] },
            { "tag": "second", "patterns": ["order status"], "responses": ["second"] }
        ]));
        let found = m.best_match("order status").unwrap();
        assert_eq!(found.index, 0);
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(m.respond("order status", &mut rng).unwrap(), "first");
    }

    #[test]
    fn test_unrelated_input_falls_back_to_first_example() {
        let m = greeting_farewell();
        let found = m.best_match("zzz qqq").unwrap();
        assert_eq!(found.index, 0);
        assert_eq!(found.similarity, 0.0);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let m = matcher_for(json!([
            { "tag": "joke", "patterns": ["tell me a joke"],
              "responses": ["a", "b", "c", "d", "e"] }
        ]));
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8).map(|_| m.respond("joke please", &mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_explain_reports_classifier_guess() {
        let m = greeting_farewell();
        assert!(matches!(m.explain("Hello").unwrap(), Explanation::Greeting));
        match m.explain("bye now").unwrap() {
            Explanation::Matched { tag, similarity, classifier, .. } => {
                assert_eq!(tag, "farewell");
                assert!(similarity > 0.9);
                assert!(m.model().labels().contains(&classifier.tag));
            }
            other => panic!("unexpected explanation {other:?}"),
        }
    }
}
