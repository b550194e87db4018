// ============================================================
// Layer 5 — Intent Classifier (multinomial logistic regression)
// ============================================================
// One linear layer from the TF-IDF space to one logit per tag,
// trained with softmax cross-entropy:
//
//   logits = x · Wᵀ + b          x: [batch, n_features]
//   p      = softmax(logits)     p: [batch, n_classes]
//
// Weights and bias start at zero. Together with full-batch
// updates this makes training on the same data reproduce the
// same coefficients run after run.

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct IntentClassifierConfig {
    pub n_features: usize,
    pub n_classes:  usize,
}

impl IntentClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> IntentClassifier<B> {
        let linear = LinearConfig::new(self.n_features, self.n_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        IntentClassifier { linear }
    }
}

#[derive(Module, Debug)]
pub struct IntentClassifier<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> IntentClassifier<B> {
    /// features: [batch, n_features] → logits: [batch, n_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Class probabilities per row.
    pub fn probabilities(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(features), 1)
    }

    /// Number of rows whose arg-max class equals the label.
    pub fn correct_count(&self, logits: Tensor<B, 2>, labels: Tensor<B, 1, Int>) -> usize {
        // argmax(1) returns shape [batch, 1] — squeeze to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);
        let correct: i64 = predicted
            .equal(labels)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct.max(0) as usize
    }

    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        labels:   Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(features);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}
