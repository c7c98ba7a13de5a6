//! Feature transformation
//!
//! Turns a validated request into the fixed-order numeric vector the model
//! was trained on. All encoding decisions come from the artifact, never from
//! request-time computation: category codes, unknown buckets and imputation
//! defaults were captured at training time, which is what guarantees
//! training/serving parity.

use crate::artifact::ModelArtifact;
use crate::errors::{ChurnError, ChurnResult};
use crate::schema::{FieldKind, NormalizedRequest, REQUEST_SCHEMA};

/// Verify that every feature column the artifact expects can be produced
/// from the request schema. Run once when an artifact is published; a
/// mismatch is a configuration fault, not a per-request error.
pub fn check_schema_compat(artifact: &ModelArtifact) -> ChurnResult<()> {
    for column in &artifact.feature_columns {
        let spec = REQUEST_SCHEMA
            .iter()
            .find(|s| s.name == column.as_str())
            .ok_or_else(|| {
                ChurnError::config(format!(
                    "artifact feature column {column:?} has no request-schema field"
                ))
            })?;
        if matches!(spec.kind, FieldKind::Categorical { .. })
            && !artifact.categorical_maps.contains_key(column)
        {
            return Err(ChurnError::config(format!(
                "artifact carries no category map for {column:?}"
            )));
        }
    }
    Ok(())
}

/// Produce the feature vector in exactly the artifact's column order.
///
/// The output length always equals `artifact.feature_columns.len()` for any
/// artifact that passed `check_schema_compat`. Categorical values unseen at
/// training time land in the artifact's unknown bucket rather than failing,
/// so a schema update ahead of a retrain cannot take serving down.
pub fn transform(artifact: &ModelArtifact, request: &NormalizedRequest) -> ChurnResult<Vec<f64>> {
    let mut features = Vec::with_capacity(artifact.feature_columns.len());

    for column in &artifact.feature_columns {
        let spec = REQUEST_SCHEMA
            .iter()
            .find(|s| s.name == column.as_str())
            .ok_or_else(|| {
                ChurnError::feature_transform(column, "no request-schema field for this column")
            })?;

        let value = match &spec.kind {
            FieldKind::Numeric { .. } => request
                .numeric(column)
                .unwrap_or_else(|| artifact.default_for(column)),
            FieldKind::Categorical { .. } => {
                let map = artifact.categorical_maps.get(column).ok_or_else(|| {
                    ChurnError::feature_transform(column, "artifact has no category map")
                })?;
                match request.category(column) {
                    Some(raw) => {
                        let (code, known) = map.encode(raw);
                        if !known {
                            tracing::warn!(
                                field = %column,
                                value = %raw,
                                "category unseen at training time, using unknown bucket"
                            );
                        }
                        code
                    }
                    // Optional categorical absent: artifact default if one
                    // was exported, otherwise the unknown bucket
                    None => artifact
                        .defaults
                        .get(column)
                        .copied()
                        .unwrap_or(map.unknown),
                }
            }
        };
        features.push(value);
    }

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{CategoryMap, RiskBands};
    use std::collections::HashMap;

    fn category_map(pairs: &[(&str, f64)], unknown: f64) -> CategoryMap {
        CategoryMap {
            levels: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            unknown,
        }
    }

    fn fixture_artifact() -> ModelArtifact {
        let mut categorical_maps = HashMap::new();
        categorical_maps.insert(
            "contract".to_string(),
            category_map(
                &[("month-to-month", 2.0), ("one-year", 1.0), ("two-year", 0.0)],
                0.0,
            ),
        );
        // "dsl" deliberately absent: valid per schema, unseen at training
        categorical_maps.insert(
            "internet_service".to_string(),
            category_map(&[("fiber", 2.0), ("none", 0.0)], 1.0),
        );
        categorical_maps.insert(
            "paperless_billing".to_string(),
            category_map(&[("yes", 1.0), ("no", 0.0)], 0.0),
        );

        let mut defaults = HashMap::new();
        defaults.insert("total_charges".to_string(), 0.0);

        ModelArtifact {
            model_id: "churn-logreg".to_string(),
            version: "test".to_string(),
            trained_at: None,
            feature_columns: vec![
                "tenure".to_string(),
                "monthly_charges".to_string(),
                "total_charges".to_string(),
                "contract".to_string(),
                "internet_service".to_string(),
                "paperless_billing".to_string(),
            ],
            categorical_maps,
            defaults,
            coefficients: vec![-0.04, 0.02, 0.0001, 0.6, 0.4, 0.2],
            intercept: -2.0,
            threshold: 0.5,
            risk_bands: RiskBands::default(),
        }
    }

    fn fixture_request() -> NormalizedRequest {
        let mut req = NormalizedRequest::default();
        req.insert_numeric("tenure", 1.0);
        req.insert_numeric("monthly_charges", 70.35);
        req.insert_category("contract", "month-to-month");
        req.insert_category("internet_service", "fiber");
        req
    }

    #[test]
    fn vector_has_artifact_length_and_order() {
        let artifact = fixture_artifact();
        let features = transform(&artifact, &fixture_request()).unwrap();
        assert_eq!(features.len(), artifact.feature_columns.len());
        assert_eq!(features[0], 1.0); // tenure
        assert_eq!(features[1], 70.35); // monthly_charges
        assert_eq!(features[3], 2.0); // contract = month-to-month
    }

    #[test]
    fn missing_optional_numeric_uses_artifact_default() {
        let artifact = fixture_artifact();
        let features = transform(&artifact, &fixture_request()).unwrap();
        assert_eq!(features[2], 0.0); // total_charges imputed
    }

    #[test]
    fn unseen_category_lands_in_unknown_bucket() {
        let artifact = fixture_artifact();
        let mut req = fixture_request();
        req.insert_category("internet_service", "dsl");
        let features = transform(&artifact, &req).unwrap();
        assert_eq!(features[4], 1.0); // unknown bucket, not a failure
    }

    #[test]
    fn absent_optional_categorical_uses_unknown_bucket() {
        let artifact = fixture_artifact();
        let features = transform(&artifact, &fixture_request()).unwrap();
        assert_eq!(features[5], 0.0); // paperless_billing absent
    }

    #[test]
    fn missing_category_map_is_a_transform_error() {
        let mut artifact = fixture_artifact();
        artifact.categorical_maps.remove("contract");
        let err = transform(&artifact, &fixture_request()).unwrap_err();
        match err {
            ChurnError::FeatureTransform { field, .. } => assert_eq!(field, "contract"),
            other => panic!("expected FeatureTransform, got {other:?}"),
        }
    }

    #[test]
    fn schema_compat_rejects_unmapped_feature_column() {
        let mut artifact = fixture_artifact();
        artifact.feature_columns.push("loyalty_tier".to_string());
        artifact.coefficients.push(0.0);
        let err = check_schema_compat(&artifact).unwrap_err();
        assert!(matches!(err, ChurnError::Config { .. }));
    }

    #[test]
    fn schema_compat_accepts_fixture() {
        assert!(check_schema_compat(&fixture_artifact()).is_ok());
    }
}
