//! Model invocation
//!
//! Logistic-regression scoring over the fixed-order feature vector. Pure
//! computation: no I/O, no randomness, so identical inputs always produce
//! bit-identical probabilities.

use crate::artifact::ModelArtifact;
use crate::errors::{ChurnError, ChurnResult};
use serde::{Deserialize, Serialize};

/// Binary churn label derived from the probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnLabel {
    Churn,
    NoChurn,
}

/// Raw model output before response formatting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub label: ChurnLabel,
}

/// Invoke the model on a feature vector of the exact expected length.
///
/// A length mismatch can only come from a broken artifact/transform pairing,
/// never from request content, so it surfaces as `ModelInvocation` (internal
/// fault). Label derivation: probability >= threshold is churn, so a score
/// landing exactly on the cutoff counts as churn.
pub fn predict(artifact: &ModelArtifact, features: &[f64]) -> ChurnResult<Prediction> {
    if features.len() != artifact.coefficients.len() {
        return Err(ChurnError::model_invocation(format!(
            "feature vector length {} does not match {} model coefficients",
            features.len(),
            artifact.coefficients.len()
        )));
    }

    let linear = artifact.intercept
        + features
            .iter()
            .zip(artifact.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>();

    let probability = sigmoid(linear);
    let label = if probability >= artifact.threshold {
        ChurnLabel::Churn
    } else {
        ChurnLabel::NoChurn
    };

    Ok(Prediction { probability, label })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
