// ============================================================
// Layer 5 — Training
// ============================================================
// Fits the whole pipeline on the flattened examples:
//
//   Step 1: Fit the TF-IDF vector space on the questions
//   Step 2: Assign a label index per tag (first-appearance order)
//   Step 3: Full-batch Adam on softmax cross-entropy
//   Step 4: Check the fitted classifier on the training set
//
// Training uses TrainBackend (Autodiff<NdArray>) for gradients;
// model.valid() hands back the same weights on plain NdArray for
// serving, which is what TrainedModel stores.
//
// The classifier confirms the intents are linearly separable in
// the vector space. Response selection never consults it.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use chrono::{Local, Utc};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::IntentBatcher;
use crate::domain::error::{ChatbotError, ChatbotResult};
use crate::domain::intent::TrainingExample;
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{IntentClassifier, IntentClassifierConfig};
use crate::ml::pipeline::{ModelMetadata, TrainedModel};
use crate::ml::vectorizer::TfidfVectorizer;

type TrainBackend = Autodiff<NdArray>;

/// Prefix of every model identifier.
pub const MODEL_ID_PREFIX: &str = "chatbot_model";

/// A training example the fitted classifier still gets wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Misclassified {
    pub question:  String,
    pub expected:  String,
    pub predicted: String,
}

/// What happened during one training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs:        Vec<EpochMetrics>,
    pub accuracy:      f64,
    pub misclassified: Vec<Misclassified>,
}

/// Build a model identifier from the training time.
pub fn model_id_for(time: chrono::DateTime<Local>) -> String {
    format!("{}_{}", MODEL_ID_PREFIX, time.format("%Y%m%d_%H%M%S"))
}

/// Train the vectorizer and classifier on `examples`.
///
/// Fails with `Training` on an empty example list or when the
/// patterns yield no vocabulary.
pub fn train(
    examples: &[TrainingExample],
    cfg:      &TrainConfig,
) -> ChatbotResult<(TrainedModel, TrainingReport)> {
    if examples.is_empty() {
        return Err(ChatbotError::training("the dataset produced no training examples"));
    }

    // ── Step 1: Vector space ──────────────────────────────────────────────────
    let questions: Vec<String> = examples.iter().map(|e| e.question.clone()).collect();
    let vectorizer = TfidfVectorizer::fit(&questions)?;
    let rows       = vectorizer.transform_all(&questions);
    let n_features = vectorizer.vocabulary_size();
    tracing::info!(
        "Vector space: {} features over {} documents",
        n_features,
        vectorizer.n_documents()
    );

    // ── Step 2: Labels ────────────────────────────────────────────────────────
    let mut labels: Vec<String> = Vec::new();
    let targets: Vec<usize> = examples
        .iter()
        .map(|e| match labels.iter().position(|l| *l == e.tag) {
            Some(idx) => idx,
            None => {
                labels.push(e.tag.clone());
                labels.len() - 1
            }
        })
        .collect();
    tracing::info!("Training classifier over {} intents", labels.len());

    // ── Step 3: Full-batch Adam ───────────────────────────────────────────────
    let device    = NdArrayDevice::default();
    let model_cfg = IntentClassifierConfig::new(n_features, labels.len());
    let mut model: IntentClassifier<TrainBackend> = model_cfg.init(&device);

    let batcher = IntentBatcher::<TrainBackend>::new(device.clone());
    let batch   = batcher.batch(&rows, &targets, n_features);
    let total   = examples.len() as f64;

    let mut optim   = AdamConfig::new().with_epsilon(1e-8).init();
    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {
        let (loss, logits) = model.forward_loss(batch.features.clone(), batch.labels.clone());

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        let correct       = model.correct_count(logits, batch.labels.clone());

        // Backward pass + Adam update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(cfg.lr, model, grads);

        let metrics = EpochMetrics::new(epoch, loss_val, correct as f64 / total);
        if epoch % 50 == 0 || epoch == cfg.epochs {
            tracing::info!(
                "Epoch {:>4}/{} | loss={:.4} | accuracy={:.1}%",
                epoch,
                cfg.epochs,
                metrics.loss,
                metrics.accuracy * 100.0,
            );
        }
        history.push(metrics);
    }

    // ── Step 4: Check the fitted classifier ───────────────────────────────────
    let classifier = model.valid();
    let trained = TrainedModel::new(
        ModelMetadata {
            id:         model_id_for(Local::now()),
            created_at: Utc::now(),
            labels,
            n_features,
        },
        vectorizer,
        classifier,
    );

    let mut misclassified = Vec::new();
    for (example, &target) in examples.iter().zip(&targets) {
        let prediction = trained
            .predict_tag(&example.question)
            .map_err(|e| ChatbotError::training(e.to_string()))?;
        if prediction.label_index != target {
            misclassified.push(Misclassified {
                question:  example.question.clone(),
                expected:  example.tag.clone(),
                predicted: prediction.tag,
            });
        }
    }

    let accuracy = (total - misclassified.len() as f64) / total;
    if misclassified.is_empty() {
        tracing::info!("Classifier separates every training example");
    } else {
        for m in &misclassified {
            tracing::warn!(
                "Pattern '{}' ({}) is classified as '{}'",
                m.question,
                m.expected,
                m.predicted
            );
        }
        tracing::warn!(
            "Training accuracy {:.1}%: some intents are not linearly separable",
            accuracy * 100.0
        );
    }

    Ok((trained, TrainingReport { epochs: history, accuracy, misclassified }))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn example(q: &str, tag: &str) -> TrainingExample {
        TrainingExample::new(q, vec![format!("{tag} reply")], tag)
    }

    fn examples() -> Vec<TrainingExample> {
        vec![
            example("hello there", "greeting"),
            example("good morning", "greeting"),
            example("see you later", "farewell"),
            example("goodbye friend", "farewell"),
            example("what can you do", "skills"),
            example("tell me your skills", "skills"),
        ]
    }

    fn config() -> TrainConfig {
        TrainConfig { epochs: 200, ..TrainConfig::default() }
    }

    #[test]
    fn test_empty_examples_fail() {
        let err = train(&[], &config()).unwrap_err();
        assert!(matches!(err, ChatbotError::Training(_)));
    }

    #[test]
    fn test_no_vocabulary_fails() {
        let err = train(&[example("a", "x"), example("", "y")], &config()).unwrap_err();
        assert!(matches!(err, ChatbotError::Training(_)));
    }

    #[test]
    fn test_separable_intents_are_learned() {
        let (model, report) = train(&examples(), &config()).unwrap();
        assert_eq!(report.epochs.len(), 200);
        assert!(report.misclassified.is_empty());
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(model.labels(), ["greeting", "farewell", "skills"]);
        assert!(report.epochs.last().unwrap().loss < report.epochs[0].loss);
    }

    #[test]
    fn test_training_is_reproducible() {
        let (_, a) = train(&examples(), &config()).unwrap();
        let (_, b) = train(&examples(), &config()).unwrap();
        for (x, y) in a.epochs.iter().zip(&b.epochs) {
            assert!((x.loss - y.loss).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_patterns_with_different_tags_are_reported() {
        let data = vec![example("open account", "a"), example("open account", "b")];
        let (_, report) = train(&data, &config()).unwrap();
        assert_eq!(report.misclassified.len(), 1);
    }

    #[test]
    fn test_model_id_format() {
        let time = chrono::TimeZone::with_ymd_and_hms(&Local, 2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(model_id_for(time), "chatbot_model_20240309_140507");
    }
}
