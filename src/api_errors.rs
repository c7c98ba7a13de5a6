use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

// Conversion from ChurnError: request errors surface as 400, internal faults
// as a generic 500 (details stay in the server log, never in the body).
impl From<crate::errors::ChurnError> for AppError {
    fn from(err: crate::errors::ChurnError) -> Self {
        use crate::errors::ChurnError;
        match err {
            ChurnError::Validation { field, message } => {
                AppError::BadRequest(format!("Validation error for {field}: {message}"))
            }
            ChurnError::FeatureTransform { field, message } => {
                AppError::BadRequest(format!("Cannot encode {field}: {message}"))
            }
            ChurnError::ModelInvocation { message } => {
                tracing::error!("model invocation failed: {message}");
                AppError::Internal("prediction failed".to_string())
            }
            ChurnError::Config { message } => {
                tracing::error!("configuration fault: {message}");
                AppError::Internal("service misconfigured".to_string())
            }
            ChurnError::Io { operation, source } => {
                tracing::error!("I/O failure during {operation}: {source}");
                AppError::Internal("internal I/O failure".to_string())
            }
            ChurnError::Serialization { context, source } => {
                tracing::error!("serialization failure in {context}: {source}");
                AppError::Internal("internal serialization failure".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ChurnError;

    #[test]
    fn validation_maps_to_bad_request() {
        let app: AppError = ChurnError::validation("tenure", "missing").into();
        assert!(matches!(app, AppError::BadRequest(_)));
    }

    #[test]
    fn model_invocation_maps_to_internal_without_detail() {
        let app: AppError = ChurnError::model_invocation("weights corrupt").into();
        match app {
            AppError::Internal(msg) => assert!(!msg.contains("weights")),
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
