// End-to-end pipeline tests against an artifact loaded from disk,
// exercising the same path the serving binary takes at startup.

use churnd::artifact::ARTIFACT_FILE;
use churnd::errors::ChurnError;
use churnd::runtime_core::ChurnRuntimeCore;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

fn artifact_json(version: &str) -> Value {
    let yes_no = || json!({ "levels": { "yes": 1.0, "no": 0.0 }, "unknown": 0.0 });
    json!({
        "model_id": "churn-logreg",
        "version": version,
        "feature_columns": [
            "tenure", "monthly_charges", "total_charges",
            "gender", "partner", "dependents", "phone_service",
            "paperless_billing", "internet_service", "contract"
        ],
        "categorical_maps": {
            "gender": { "levels": { "female": 0.0, "male": 1.0 }, "unknown": 0.0 },
            "partner": yes_no(),
            "dependents": yes_no(),
            "phone_service": yes_no(),
            "paperless_billing": yes_no(),
            "internet_service": {
                "levels": { "none": 0.0, "dsl": 1.0, "fiber": 2.0 },
                "unknown": 0.0
            },
            "contract": {
                "levels": { "two-year": 0.0, "one-year": 1.0, "month-to-month": 2.0 },
                "unknown": 0.0
            }
        },
        "defaults": { "total_charges": 0.0 },
        "coefficients": [-0.06, 0.02, -0.0001, 0.0, -0.1, -0.15, 0.05, 0.1, 0.35, 0.9],
        "intercept": -2.2,
        "threshold": 0.5,
        "risk_bands": { "medium": 0.3, "high": 0.6 }
    })
}

fn write_artifact(version: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(ARTIFACT_FILE);
    std::fs::write(&path, serde_json::to_string(&artifact_json(version)).unwrap()).unwrap();
    let model_dir = dir.path().to_path_buf();
    (dir, model_dir)
}

fn example_payload() -> Map<String, Value> {
    json!({
        "tenure": 1,
        "monthly_charges": 70.35,
        "gender": "female",
        "partner": "no",
        "dependents": "no",
        "phone_service": "yes",
        "internet_service": "fiber",
        "contract": "month-to-month",
    })
    .as_object()
    .cloned()
    .unwrap()
}

#[test]
fn typical_new_customer_gets_a_complete_prediction() {
    let (_dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).expect("artifact should load");

    let response = core.predict(&example_payload()).expect("prediction");
    assert!((0.0..=1.0).contains(&response.probability));
    assert_eq!(response.model_id, "churn-logreg");

    let body = serde_json::to_value(&response).unwrap();
    let label = body["label"].as_str().unwrap();
    assert!(label == "churn" || label == "no_churn");
    let risk = body["risk"].as_str().unwrap();
    assert!(["low", "medium", "high"].contains(&risk));
}

#[test]
fn risk_bucket_is_consistent_with_probability_bands() {
    let (_dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).unwrap();
    let response = core.predict(&example_payload()).unwrap();
    let body = serde_json::to_value(&response).unwrap();
    let expected = if response.probability < 0.3 {
        "low"
    } else if response.probability < 0.6 {
        "medium"
    } else {
        "high"
    };
    assert_eq!(body["risk"].as_str().unwrap(), expected);
}

#[test]
fn missing_tenure_is_a_validation_error_citing_tenure() {
    let (_dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).unwrap();

    let mut payload = example_payload();
    payload.remove("tenure");
    match core.predict(&payload).unwrap_err() {
        ChurnError::Validation { field, .. } => assert_eq!(field, "tenure"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn nan_tenure_never_reaches_the_model() {
    let (_dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).unwrap();

    let mut payload = example_payload();
    payload.insert("tenure".to_string(), json!("NaN"));
    match core.predict(&payload) {
        Err(ChurnError::Validation { field, .. }) => assert_eq!(field, "tenure"),
        Err(other) => panic!("expected Validation, got {other:?}"),
        Ok(response) => panic!(
            "non-finite input produced probability {}",
            response.probability
        ),
    }
}

#[test]
fn repeated_calls_are_bit_for_bit_identical() {
    let (_dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).unwrap();
    let a = core.predict(&example_payload()).unwrap();
    let b = core.predict(&example_payload()).unwrap();
    assert_eq!(a.probability.to_bits(), b.probability.to_bits());
}

#[test]
fn reload_publishes_the_new_version() {
    let (dir, model_dir) = write_artifact("v1");
    let core = ChurnRuntimeCore::from_path(&model_dir, None).unwrap();
    let before = core.predict(&example_payload()).unwrap();
    assert_eq!(before.model_version, "v1");

    std::fs::write(
        dir.path().join(ARTIFACT_FILE),
        serde_json::to_string(&artifact_json("v2")).unwrap(),
    )
    .unwrap();
    core.reload().expect("reload");

    let after = core.predict(&example_payload()).unwrap();
    assert_eq!(after.model_version, "v2");
}

#[test]
fn artifact_with_wrong_coefficient_count_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = artifact_json("v1");
    bad["coefficients"] = json!([0.1, 0.2]);
    std::fs::write(
        dir.path().join(ARTIFACT_FILE),
        serde_json::to_string(&bad).unwrap(),
    )
    .unwrap();

    match ChurnRuntimeCore::from_path(dir.path(), None) {
        Err(ChurnError::Config { .. }) => {}
        Err(other) => panic!("expected Config, got {other:?}"),
        Ok(_) => panic!("expected Config error, artifact should not publish"),
    }
}
