//! Model artifact loading
//!
//! The artifact is the single source of truth for serving: feature order,
//! category-to-number maps, imputation defaults, trained weights, and the
//! decision threshold all come from the file exported at training time and
//! are never recomputed at request time. Loading fails fast on an incomplete
//! or inconsistent artifact; a bad artifact is a deployment fault, not a
//! per-request error.

use crate::errors::{ChurnError, ChurnResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// File name inside the model directory
pub const ARTIFACT_FILE: &str = "artifact.json";

/// Category-to-number mapping for one categorical field, captured at
/// training time. `unknown` is the designated bucket for values that are
/// valid per schema but were never seen in training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMap {
    pub levels: HashMap<String, f64>,
    pub unknown: f64,
}

impl CategoryMap {
    /// Encode a normalized category value, falling back to the unknown bucket.
    /// Returns `(code, was_known)` so callers can log fallback use.
    pub fn encode(&self, value: &str) -> (f64, bool) {
        match self.levels.get(value) {
            Some(code) => (*code, true),
            None => (self.unknown, false),
        }
    }
}

/// Probability bands for the coarse risk bucket: `p < medium` is low risk,
/// `p < high` is medium, the rest is high.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskBands {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 0.3,
            high: 0.6,
        }
    }
}

/// Immutable trained-model artifact plus its exact preprocessing metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_id: String,
    pub version: String,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    /// Feature order the model was trained on; immutable serving contract
    pub feature_columns: Vec<String>,
    pub categorical_maps: HashMap<String, CategoryMap>,
    /// Imputation defaults for optional numeric fields
    #[serde(default)]
    pub defaults: HashMap<String, f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub threshold: f64,
    #[serde(default)]
    pub risk_bands: RiskBands,
}

impl ModelArtifact {
    /// Consistency checks run once at load, never per request. Any failure
    /// here means the exported artifact and this build disagree.
    pub fn verify(&self) -> ChurnResult<()> {
        if self.feature_columns.is_empty() {
            return Err(ChurnError::config("artifact has no feature columns"));
        }
        if self.coefficients.len() != self.feature_columns.len() {
            return Err(ChurnError::config(format!(
                "artifact mismatch: {} coefficients for {} feature columns",
                self.coefficients.len(),
                self.feature_columns.len()
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ChurnError::config(format!(
                "decision threshold {} outside (0, 1)",
                self.threshold
            )));
        }
        if !(self.risk_bands.medium < self.risk_bands.high) {
            return Err(ChurnError::config(
                "risk bands are not strictly increasing",
            ));
        }
        Ok(())
    }

    /// Imputation default for an optional numeric field (0.0 when the
    /// artifact carries none, matching the training-side fill)
    pub fn default_for(&self, field: &str) -> f64 {
        self.defaults.get(field).copied().unwrap_or(0.0)
    }
}

/// Load and verify the model artifact from `path`, which may be either the
/// artifact file itself or the model directory containing `artifact.json`.
/// Called once at process start; the returned artifact is read-only for the
/// process lifetime.
pub fn load_artifact(path: &Path) -> ChurnResult<ModelArtifact> {
    let file = if path.is_dir() {
        path.join(ARTIFACT_FILE)
    } else {
        path.to_path_buf()
    };

    let raw = std::fs::read_to_string(&file)
        .map_err(|e| ChurnError::io(format!("reading artifact {}", file.display()), e))?;
    let artifact: ModelArtifact = serde_json::from_str(&raw)
        .map_err(|e| ChurnError::serialization(format!("artifact {}", file.display()), e))?;
    artifact.verify()?;

    tracing::info!(
        model_id = %artifact.model_id,
        version = %artifact.version,
        features = artifact.feature_columns.len(),
        "model artifact loaded"
    );
    Ok(artifact)
}
