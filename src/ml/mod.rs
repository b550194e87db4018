// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All Burn framework code lives here (plus the tensor batcher in
// the data layer). Other layers see plain Rust types only.
//
//   vectorizer.rs — TF-IDF vector space + cosine similarity
//   model.rs      — multinomial logistic-regression classifier
//   trainer.rs    — fits vectorizer and classifier, reports
//                   per-epoch loss/accuracy
//   pipeline.rs   — TrainedModel: the fitted state used for serving
//   matcher.rs    — nearest-pattern reply selection
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// TF-IDF vectorizer and cosine similarity
pub mod vectorizer;

/// Logistic-regression intent classifier
pub mod model;

/// Training loop for the classifier
pub mod trainer;

/// The fitted pipeline produced by training
pub mod pipeline;

/// Reply selection by nearest training pattern
pub mod matcher;
