//! Library root for the `churnd` crate
//!
//! churnd serves a trained churn-classification model over HTTP. The per-
//! request path is a single synchronous pipeline (validate -> transform ->
//! predict -> format) reading one immutable model-artifact snapshot.

// Core error handling
pub mod api_errors;
pub mod errors;

// Model artifact
pub mod artifact;

// Inference pipeline
pub mod predictor;
pub mod response;
pub mod schema;
pub mod transform;

// Runtime & publication
pub mod runtime_core;

// Configuration
pub mod config_loader;

// Web server interface
pub mod web;
