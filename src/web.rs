//! HTTP surface for the prediction pipeline
//!
//! Thin axum wiring around `ChurnRuntimeCore`: every handler delegates to
//! the core and maps `ChurnError` onto status classes via `AppError`.

use crate::api_errors::AppError;
use crate::runtime_core::ChurnRuntimeCore;
use axum::{
    extract::Extension,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the service router: prediction endpoints, model admin, and health
/// checks, with a versioned alias for the prediction route.
pub fn build_predict_router(core: Arc<ChurnRuntimeCore>) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/v1/predict", post(predict))
        .route("/api/model/status", get(model_status))
        .route("/api/model/reload", post(model_reload))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(CorsLayer::permissive())
        .layer(Extension(core))
}

#[axum::debug_handler]
async fn predict(
    Extension(core): Extension<Arc<ChurnRuntimeCore>>,
    Json(raw): Json<Map<String, Value>>,
) -> Result<Json<crate::response::PredictionResponse>, AppError> {
    let response = core.predict(&raw)?;
    tracing::info!(
        probability = response.probability,
        label = ?response.label,
        model_version = %response.model_version,
        "prediction served"
    );
    Ok(Json(response))
}

#[axum::debug_handler]
async fn model_status(
    Extension(core): Extension<Arc<ChurnRuntimeCore>>,
) -> Json<serde_json::Value> {
    Json(core.status())
}

#[axum::debug_handler]
async fn model_reload(
    Extension(core): Extension<Arc<ChurnRuntimeCore>>,
) -> Result<Json<crate::runtime_core::PublishedModel>, AppError> {
    let published = core.reload()?;
    Ok(Json(published))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(
    Extension(core): Extension<Arc<ChurnRuntimeCore>>,
) -> (axum::http::StatusCode, Json<serde_json::Value>) {
    let ready = core.ready();
    let code = if ready {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(serde_json::json!({ "ready": ready })))
}
