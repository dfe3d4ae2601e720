use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::workflows::approval::domain::{
    ApplicantInput, CreditHistory, Dependents, Education, Gender, Married, PropertyArea,
    SelfEmployed,
};
use crate::workflows::approval::form::ApplicantForm;
use crate::workflows::approval::model::{ApprovalClassifier, InferenceError};
use crate::workflows::approval::service::LoanApprovalService;

pub(super) fn sample_input() -> ApplicantInput {
    ApplicantInput {
        gender: Gender::Male,
        married: Married::Yes,
        dependents: Dependents::ThreePlus,
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        applicant_income: 5000,
        coapplicant_income: 2000,
        loan_amount: 100,
        loan_term_months: 360,
        credit_history: CreditHistory::Good,
        property_area: PropertyArea::Rural,
    }
}

pub(super) fn sample_form() -> ApplicantForm {
    ApplicantForm {
        gender: Some("Male".to_string()),
        married: Some("Yes".to_string()),
        dependents: Some("3+".to_string()),
        education: Some("Graduate".to_string()),
        self_employed: Some("No".to_string()),
        applicant_income: Some("5000".to_string()),
        coapplicant_income: Some("2000".to_string()),
        loan_amount: Some("100".to_string()),
        loan_term_months: Some("360".to_string()),
        credit_history: Some("Good (1)".to_string()),
        property_area: Some("Rural".to_string()),
    }
}

/// Every combination of categorical values with a few income levels.
pub(super) fn all_valid_inputs() -> Vec<ApplicantInput> {
    let mut inputs = Vec::new();
    for gender in Gender::ALL {
        for married in Married::ALL {
            for dependents in Dependents::ALL {
                for education in Education::ALL {
                    for self_employed in SelfEmployed::ALL {
                        for credit_history in CreditHistory::ALL {
                            for property_area in PropertyArea::ALL {
                                for income in [0, 2500, 81000] {
                                    inputs.push(ApplicantInput {
                                        gender,
                                        married,
                                        dependents,
                                        education,
                                        self_employed,
                                        applicant_income: income,
                                        coapplicant_income: income / 2,
                                        loan_amount: 128,
                                        loan_term_months: 360,
                                        credit_history,
                                        property_area,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
    }
    inputs
}

/// Classifier double with a fixed answer that counts how often it is consulted.
#[derive(Default)]
pub(super) struct StubClassifier {
    pub(super) label: i64,
    pub(super) probabilities: Option<Vec<f64>>,
    pub(super) fail: bool,
    pub(super) calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn labelled(label: i64) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub(super) fn with_probabilities(label: i64, probabilities: Vec<f64>) -> Self {
        Self {
            label,
            probabilities: Some(probabilities),
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ApprovalClassifier for StubClassifier {
    fn classify(&self, _row: &[f64]) -> Result<i64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(InferenceError::Other("stub exploded".to_string()));
        }
        Ok(self.label)
    }

    fn class_probabilities(&self, _row: &[f64]) -> Option<Result<Vec<f64>, InferenceError>> {
        self.probabilities.clone().map(Ok)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn supports_probabilities(&self) -> bool {
        self.probabilities.is_some()
    }
}

pub(super) fn stub_service(
    stub: StubClassifier,
) -> (LoanApprovalService<StubClassifier>, Arc<StubClassifier>) {
    let stub = Arc::new(stub);
    (LoanApprovalService::with_model(stub.clone()), stub)
}

/// Logistic model that approves when credit history is good.
pub(super) fn credit_logistic_artifact() -> Value {
    json!({
        "name": "credit-logistic",
        "feature_names": [
            "Gender", "Married", "Dependents", "Education", "Self_Employed",
            "ApplicantIncome", "CoapplicantIncome", "LoanAmount", "Loan_Amount_Term",
            "Credit_History", "Property_Area"
        ],
        "classifier": {
            "kind": "logistic_regression",
            "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 0.0],
            "intercept": -1.5
        }
    })
}

pub(super) fn credit_forest_artifact() -> Value {
    json!({
        "name": "credit-forest",
        "classifier": {
            "kind": "random_forest",
            "trees": [
                { "nodes": [
                    { "feature": 9, "threshold": 0.5, "left": 1, "right": 2 },
                    { "value": [90, 10] },
                    { "value": [20, 80] }
                ]},
                { "nodes": [
                    { "feature": 5, "threshold": 3000.0, "left": 1, "right": 2 },
                    { "value": [60, 40] },
                    { "value": [30, 70] }
                ]}
            ]
        }
    })
}

pub(super) fn write_artifact(dir: &TempDir, file: &str, artifact: &Value) -> PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, serde_json::to_vec_pretty(artifact).expect("artifact serializes"))
        .expect("artifact written");
    path
}

pub(super) fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
