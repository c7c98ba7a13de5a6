//! Request schema and validation
//!
//! The expected customer attributes form a fixed table: each field is either
//! numeric (with advisory plausibility bounds) or categorical (with an
//! enumerated set of accepted values). Validation normalizes a raw JSON
//! object into a typed mapping or rejects it naming the offending field.
//! Unknown extra fields are ignored and logged, never silently folded into
//! known values.

use crate::errors::{ChurnError, ChurnResult};
use lazy_static::lazy_static;
use serde_json::{Map, Value};
use std::collections::HashMap;

const YES_NO: &[&str] = &["yes", "no"];

/// Kind of a request field. Numeric bounds are advisory plausibility
/// checks: out-of-range values warn but never reject.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Numeric { min: f64, max: Option<f64> },
    Categorical { levels: &'static [&'static str] },
}

/// One entry in the fixed request-field table
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

lazy_static! {
    /// The fixed schema of customer attributes accepted by `predict`.
    /// Order matters only for error reporting (first offending field wins).
    pub static ref REQUEST_SCHEMA: Vec<FieldSpec> = vec![
        FieldSpec {
            name: "tenure",
            required: true,
            kind: FieldKind::Numeric { min: 0.0, max: Some(120.0) },
        },
        FieldSpec {
            name: "monthly_charges",
            required: true,
            kind: FieldKind::Numeric { min: 0.0, max: Some(200.0) },
        },
        FieldSpec {
            name: "total_charges",
            required: false,
            kind: FieldKind::Numeric { min: 0.0, max: None },
        },
        FieldSpec {
            name: "gender",
            required: true,
            kind: FieldKind::Categorical { levels: &["male", "female"] },
        },
        FieldSpec {
            name: "partner",
            required: true,
            kind: FieldKind::Categorical { levels: YES_NO },
        },
        FieldSpec {
            name: "dependents",
            required: true,
            kind: FieldKind::Categorical { levels: YES_NO },
        },
        FieldSpec {
            name: "phone_service",
            required: true,
            kind: FieldKind::Categorical { levels: YES_NO },
        },
        FieldSpec {
            name: "paperless_billing",
            required: false,
            kind: FieldKind::Categorical { levels: YES_NO },
        },
        FieldSpec {
            name: "internet_service",
            required: true,
            kind: FieldKind::Categorical { levels: &["dsl", "fiber", "none"] },
        },
        FieldSpec {
            name: "contract",
            required: true,
            kind: FieldKind::Categorical {
                levels: &["month-to-month", "one-year", "two-year"],
            },
        },
    ];
}

/// A validated request: every present field is typed and normalized
/// (categoricals trimmed and lowercased), ready for feature transformation.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRequest {
    numeric: HashMap<String, f64>,
    categorical: HashMap<String, String>,
}

impl NormalizedRequest {
    pub fn numeric(&self, field: &str) -> Option<f64> {
        self.numeric.get(field).copied()
    }

    pub fn category(&self, field: &str) -> Option<&str> {
        self.categorical.get(field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn insert_numeric(&mut self, field: &str, value: f64) {
        self.numeric.insert(field.to_string(), value);
    }

    #[cfg(test)]
    pub fn insert_category(&mut self, field: &str, value: &str) {
        self.categorical.insert(field.to_string(), value.to_string());
    }
}

/// Validate a raw attribute mapping against the fixed schema.
///
/// No side effects beyond logging. Fails with a `Validation` error naming
/// the first offending field in schema order, so a request missing several
/// fields gets a stable, deterministic report.
pub fn validate(raw: &Map<String, Value>) -> ChurnResult<NormalizedRequest> {
    let mut normalized = NormalizedRequest::default();

    for spec in REQUEST_SCHEMA.iter() {
        let value = match raw.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ChurnError::validation(spec.name, "missing required field"));
                }
                continue;
            }
            Some(v) => v,
        };

        match &spec.kind {
            FieldKind::Numeric { min, max } => {
                let num = coerce_numeric(spec.name, value)?;
                if num < *min || max.is_some_and(|m| num > m) {
                    tracing::warn!(
                        field = spec.name,
                        value = num,
                        "numeric value outside plausible range, accepting"
                    );
                }
                normalized.numeric.insert(spec.name.to_string(), num);
            }
            FieldKind::Categorical { levels } => {
                let s = match value {
                    Value::String(s) => s.trim().to_lowercase(),
                    other => {
                        return Err(ChurnError::validation(
                            spec.name,
                            format!("expected a string, got {}", type_name(other)),
                        ));
                    }
                };
                if !levels.contains(&s.as_str()) {
                    return Err(ChurnError::validation(
                        spec.name,
                        format!("unrecognized category {s:?}, expected one of {levels:?}"),
                    ));
                }
                normalized.categorical.insert(spec.name.to_string(), s);
            }
        }
    }

    // Documented policy: extra fields are ignored, not errors
    for key in raw.keys() {
        if !REQUEST_SCHEMA.iter().any(|s| s.name == key) {
            tracing::debug!(field = %key, "ignoring unknown request field");
        }
    }

    Ok(normalized)
}

/// Accept JSON numbers and finite numeric strings; reject everything else.
/// Numeric strings show up in payloads exported from CSV tooling, and
/// `f64::parse` also accepts "NaN"/"inf", which must never reach the model.
fn coerce_numeric(field: &str, value: &Value) -> ChurnResult<f64> {
    let num = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ChurnError::validation(field, "number not representable as f64"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ChurnError::validation(field, format!("non-numeric value {s:?}")))?,
        other => {
            return Err(ChurnError::validation(
                field,
                format!("expected a number, got {}", type_name(other)),
            ));
        }
    };
    if !num.is_finite() {
        return Err(ChurnError::validation(
            field,
            format!("non-finite value {num}"),
        ));
    }
    Ok(num)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
