//! Runtime core: artifact publication and the per-request pipeline
//!
//! The core owns the one piece of cross-request state, the published model
//! artifact. Readers clone an `Arc` snapshot under a read lock, so every
//! request runs against a single consistent artifact even while a reload is
//! in flight; reload loads and verifies the new artifact fully before the
//! reference is swapped.

use crate::artifact::{self, ModelArtifact};
use crate::errors::{ChurnError, ChurnResult};
use crate::predictor;
use crate::response::{self, PredictionResponse};
use crate::schema;
use crate::transform;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub struct ChurnRuntimeCore {
    artifact: RwLock<Arc<ModelArtifact>>,
    loaded_at: RwLock<DateTime<Utc>>,
    model_path: PathBuf,
    threshold_override: Option<f64>,
}

impl ChurnRuntimeCore {
    /// Publish an already-loaded artifact. Fails if the artifact cannot be
    /// served against the fixed request schema.
    pub fn new(
        mut artifact: ModelArtifact,
        model_path: impl Into<PathBuf>,
        threshold_override: Option<f64>,
    ) -> ChurnResult<Self> {
        if let Some(threshold) = threshold_override {
            artifact.threshold = threshold;
        }
        artifact.verify()?;
        transform::check_schema_compat(&artifact)?;
        Ok(Self {
            artifact: RwLock::new(Arc::new(artifact)),
            loaded_at: RwLock::new(Utc::now()),
            model_path: model_path.into(),
            threshold_override,
        })
    }

    /// Load the artifact from disk and publish it; the startup path.
    pub fn from_path(model_path: &Path, threshold_override: Option<f64>) -> ChurnResult<Self> {
        let artifact = artifact::load_artifact(model_path)?;
        Self::new(artifact, model_path, threshold_override)
    }

    /// Snapshot of the currently published artifact
    pub fn artifact(&self) -> ChurnResult<Arc<ModelArtifact>> {
        self.artifact
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|_| ChurnError::model_invocation("artifact lock poisoned"))
    }

    /// The single inbound operation: raw attributes in, prediction out.
    ///
    /// Validator -> Transformer -> Predictor -> Formatter, one pass, no
    /// retries, all against one artifact snapshot.
    pub fn predict(&self, raw: &Map<String, Value>) -> ChurnResult<PredictionResponse> {
        let artifact = self.artifact()?;
        let normalized = schema::validate(raw)?;
        let features = transform::transform(&artifact, &normalized)?;
        let prediction = predictor::predict(&artifact, &features)?;
        Ok(response::format_response(&artifact, prediction))
    }

    /// Hot-swap: load the artifact from disk again and republish the
    /// reference atomically. In-flight requests keep their old snapshot.
    pub fn reload(&self) -> ChurnResult<PublishedModel> {
        let mut fresh = artifact::load_artifact(&self.model_path)?;
        if let Some(threshold) = self.threshold_override {
            fresh.threshold = threshold;
        }
        fresh.verify()?;
        transform::check_schema_compat(&fresh)?;

        let fresh = Arc::new(fresh);
        let previous = {
            let mut guard = self
                .artifact
                .write()
                .map_err(|_| ChurnError::model_invocation("artifact lock poisoned"))?;
            std::mem::replace(&mut *guard, Arc::clone(&fresh))
        };
        {
            let mut loaded_at = self
                .loaded_at
                .write()
                .map_err(|_| ChurnError::model_invocation("loaded_at lock poisoned"))?;
            *loaded_at = Utc::now();
        }

        tracing::info!(
            from = %previous.version,
            to = %fresh.version,
            "model artifact reloaded"
        );
        Ok(PublishedModel {
            model_id: fresh.model_id.clone(),
            version: fresh.version.clone(),
            previous_version: previous.version.clone(),
        })
    }

    /// Operational status for the model endpoint
    pub fn status(&self) -> serde_json::Value {
        match (self.artifact(), self.loaded_at.read()) {
            (Ok(artifact), Ok(loaded_at)) => serde_json::json!({
                "model_id": artifact.model_id,
                "model_version": artifact.version,
                "trained_at": artifact.trained_at,
                "feature_count": artifact.feature_columns.len(),
                "threshold": artifact.threshold,
                "loaded_at": loaded_at.to_rfc3339(),
            }),
            _ => serde_json::json!({ "error": "artifact state unavailable" }),
        }
    }

    /// True once an artifact is published and readable
    pub fn ready(&self) -> bool {
        self.artifact().is_ok()
    }
}

/// Result of a successful reload, returned to the admin caller
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishedModel {
    pub model_id: String,
    pub version: String,
    pub previous_version: String,
}
