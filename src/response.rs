//! Response formatting
//!
//! Pure transformation from a raw prediction to the external response shape.

use crate::artifact::{ModelArtifact, RiskBands};
use crate::predictor::{ChurnLabel, Prediction};
use serde::{Deserialize, Serialize};

/// Coarse risk grouping derived from the probability bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl RiskBucket {
    /// `p < medium` is low, `p < high` is medium, the rest is high
    pub fn from_probability(probability: f64, bands: &RiskBands) -> Self {
        if probability < bands.medium {
            RiskBucket::Low
        } else if probability < bands.high {
            RiskBucket::Medium
        } else {
            RiskBucket::High
        }
    }
}

/// External response payload for one prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub probability: f64,
    pub label: ChurnLabel,
    pub risk: RiskBucket,
    pub model_id: String,
    pub model_version: String,
}

/// Package a prediction for the caller. Upstream contracts guarantee the
/// probability is already in [0,1]; nothing here can fail.
pub fn format_response(artifact: &ModelArtifact, prediction: Prediction) -> PredictionResponse {
    PredictionResponse {
        probability: prediction.probability,
        label: prediction.label,
        risk: RiskBucket::from_probability(prediction.probability, &artifact.risk_bands),
        model_id: artifact.model_id.clone(),
        model_version: artifact.version.clone(),
    }
}
