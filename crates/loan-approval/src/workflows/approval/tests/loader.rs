use super::common::*;

use std::sync::Arc;

use serde_json::json;

use crate::workflows::approval::model::{
    load_model, shared_model, ApprovalClassifier, CachedModel, ClassifierSpec, ModelLoadError,
};

#[test]
fn loads_logistic_artifact() {
    let dir = temp_dir();
    let path = write_artifact(&dir, "loan_model.json", &credit_logistic_artifact());

    let model = load_model(&path).expect("artifact loads");

    assert_eq!(model.name(), "credit-logistic");
    assert_eq!(model.kind(), "logistic_regression");
    assert!(model.supports_probabilities());
    assert!(matches!(model.spec(), ClassifierSpec::LogisticRegression(_)));
}

#[test]
fn missing_file_is_not_found() {
    let dir = temp_dir();
    let path = dir.path().join("loan_model.json");

    let err = load_model(&path).unwrap_err();

    assert_eq!(err, ModelLoadError::NotFound { path: path.clone() });
    assert!(err.to_string().contains("not found"));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn malformed_json_is_invalid() {
    let dir = temp_dir();
    let path = dir.path().join("loan_model.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        load_model(&path),
        Err(ModelLoadError::Invalid { .. })
    ));
}

#[test]
fn unknown_classifier_kind_is_invalid() {
    let dir = temp_dir();
    let path = write_artifact(
        &dir,
        "loan_model.json",
        &json!({ "classifier": { "kind": "gradient_boosting", "stages": [] } }),
    );

    assert!(matches!(
        load_model(&path),
        Err(ModelLoadError::Invalid { .. })
    ));
}

#[test]
fn reordered_feature_names_are_rejected() {
    let mut artifact = credit_logistic_artifact();
    artifact["feature_names"][0] = json!("Married");
    artifact["feature_names"][1] = json!("Gender");
    let dir = temp_dir();
    let path = write_artifact(&dir, "loan_model.json", &artifact);

    let err = load_model(&path).unwrap_err();
    match err {
        ModelLoadError::Invalid { detail, .. } => assert!(detail.contains("feature_names")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn short_coefficient_vector_is_rejected() {
    let mut artifact = credit_logistic_artifact();
    artifact["classifier"]["coefficients"] = json!([1.0, 2.0]);
    let dir = temp_dir();
    let path = write_artifact(&dir, "loan_model.json", &artifact);

    assert!(matches!(
        load_model(&path),
        Err(ModelLoadError::Invalid { .. })
    ));
}

#[test]
fn descending_tree_classes_are_rejected() {
    let dir = temp_dir();
    let path = write_artifact(
        &dir,
        "loan_model.json",
        &json!({
            "classifier": {
                "kind": "decision_tree",
                "classes": [1, 0],
                "nodes": [{ "value": [0.9, 0.1] }]
            }
        }),
    );

    match load_model(&path).unwrap_err() {
        ModelLoadError::Invalid { detail, .. } => assert!(detail.contains("ascending")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unnamed_artifact_takes_its_kind_as_name() {
    let mut artifact = credit_forest_artifact();
    artifact.as_object_mut().unwrap().remove("name");
    let dir = temp_dir();
    let path = write_artifact(&dir, "forest.json", &artifact);

    assert_eq!(load_model(&path).unwrap().name(), "random_forest");
}

#[test]
fn cache_reads_the_file_once() {
    let dir = temp_dir();
    let path = write_artifact(&dir, "loan_model.json", &credit_logistic_artifact());
    let cache = CachedModel::new(&path);
    assert!(!cache.is_loaded());

    let first = cache.get().expect("first load");
    std::fs::remove_file(&path).unwrap();
    let second = cache.get().expect("served from cache");

    assert!(cache.is_loaded());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn cache_keeps_a_failed_load() {
    let dir = temp_dir();
    let path = dir.path().join("loan_model.json");
    let cache = CachedModel::new(&path);

    assert!(matches!(cache.get(), Err(ModelLoadError::NotFound { .. })));

    write_artifact(&dir, "loan_model.json", &credit_logistic_artifact());
    assert!(matches!(cache.get(), Err(ModelLoadError::NotFound { .. })));
}

#[test]
fn shared_model_binds_the_first_path() {
    let dir = temp_dir();
    let first = shared_model(dir.path().join("first.json"));
    let again = shared_model(dir.path().join("second.json"));

    assert!(std::ptr::eq(first, again));
    assert_eq!(again.path(), dir.path().join("first.json").as_path());
}
