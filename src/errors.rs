//! Structured error types for the churnd inference service
//!
//! The taxonomy separates caller-facing request errors (validation, feature
//! transformation) from operator-facing internal faults (model invocation,
//! configuration), so the web layer can map each to the right status class.

use thiserror::Error;

/// Main error type for the churnd inference pipeline
#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Feature transform error: {field} - {message}")]
    FeatureTransform { field: String, message: String },

    #[error("Model invocation failed: {message}")]
    ModelInvocation { message: String },
}

/// Type alias for Result with ChurnError
pub type ChurnResult<T> = Result<T, ChurnError>;

impl ChurnError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error with operation context
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create a validation error naming the offending request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a feature transform error naming the offending field
    pub fn feature_transform(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeatureTransform {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a model invocation error (internal fault, 5xx class)
    pub fn model_invocation(message: impl Into<String>) -> Self {
        Self::ModelInvocation {
            message: message.into(),
        }
    }

    /// True for errors the caller can fix by correcting the request
    pub fn is_caller_facing(&self) -> bool {
        matches!(
            self,
            ChurnError::Validation { .. } | ChurnError::FeatureTransform { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = ChurnError::validation("tenure", "missing required field");
        assert!(err.to_string().contains("tenure"));
        assert!(err.is_caller_facing());
    }

    #[test]
    fn model_invocation_is_operator_facing() {
        let err = ChurnError::model_invocation("artifact not loaded");
        assert!(!err.is_caller_facing());
    }
}
