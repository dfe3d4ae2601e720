use super::common::*;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::approval::form::{EncodingError, EncodingReason};
use crate::workflows::approval::model::{InferenceError, ModelLoadError};
use crate::workflows::approval::predictor::PredictionError;
use crate::workflows::approval::router::{
    approval_error_response, approval_error_status, approval_router, predict_handler,
};
use crate::workflows::approval::service::{ApprovalError, LoanApprovalService};
use crate::workflows::approval::ApplicantField;

fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn unavailable() -> Arc<LoanApprovalService<StubClassifier>> {
    Arc::new(LoanApprovalService::unavailable(ModelLoadError::NotFound {
        path: "loan_model.json".into(),
    }))
}

#[tokio::test]
async fn predict_handler_returns_decision_and_probability() {
    let (service, _) = stub_service(StubClassifier::with_probabilities(1, vec![0.266, 0.734]));

    let response =
        predict_handler::<StubClassifier>(State(Arc::new(service)), axum::Json(sample_form()))
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["approved"], json!(true));
    assert_eq!(body["decision"], json!("approved"));
    assert_eq!(body["summary"], json!("Loan Approved"));
    assert_eq!(body["probability_caption"], json!("73.4%"));
}

#[tokio::test]
async fn predictions_route_accepts_numeric_json() {
    let (service, _) = stub_service(StubClassifier::labelled(0));
    let app = approval_router(Arc::new(service));
    let payload = json!({
        "gender": "Female",
        "married": "No",
        "dependents": "1",
        "education": "Not Graduate",
        "self_employed": "No",
        "applicant_income": 2500,
        "coapplicant_income": 0,
        "loan_amount": 120,
        "loan_term_months": 360,
        "credit_history": "Bad (0)",
        "property_area": "Semiurban"
    });

    let response = app
        .oneshot(json_request("/api/v1/loan/predictions", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["decision"], json!("not_approved"));
    assert_eq!(body["approval_probability"], Value::Null);
    assert!(body.get("probability_caption").is_none());
}

#[tokio::test]
async fn invalid_field_is_unprocessable() {
    let (service, stub) = stub_service(StubClassifier::labelled(1));
    let app = approval_router(Arc::new(service));
    let mut payload = serde_json::to_value(sample_form()).unwrap();
    payload["applicant_income"] = json!(-5);

    let response = app
        .oneshot(json_request("/api/v1/loan/predictions", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], json!("applicant_income"));
    assert_eq!(body["reason"], json!("'-5' must not be negative"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn missing_model_is_service_unavailable() {
    let app = approval_router(unavailable());
    let payload = serde_json::to_value(sample_form()).unwrap();

    let response = app
        .oneshot(json_request("/api/v1/loan/predictions", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn classifier_failure_is_internal_error() {
    let (service, _) = stub_service(StubClassifier::failing());
    let app = approval_router(Arc::new(service));
    let payload = serde_json::to_value(sample_form()).unwrap();

    let response = app
        .oneshot(json_request("/api/v1/loan/predictions", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn model_route_reports_availability() {
    let (service, _) = stub_service(StubClassifier::labelled(1));
    let ready = approval_router(Arc::new(service))
        .oneshot(
            Request::get("/api/v1/loan/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(read_json_body(ready).await["name"], json!("stub"));

    let missing = approval_router(unavailable())
        .oneshot(
            Request::get("/api/v1/loan/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(read_json_body(missing).await["available"], json!(false));
}

#[tokio::test]
async fn encoding_route_lists_columns() {
    let response = approval_router(unavailable())
        .oneshot(
            Request::get("/api/v1/loan/encoding")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let columns = body["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 11);
    assert_eq!(columns[9]["column"], json!("Credit_History"));
}

#[test]
fn error_responses_use_the_shared_status_mapping() {
    let cases = [
        (
            ApprovalError::ModelUnavailable(ModelLoadError::NotFound {
                path: "loan_model.json".into(),
            }),
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            ApprovalError::Encoding(EncodingError::new(
                ApplicantField::LoanAmount,
                EncodingReason::Missing,
            )),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            ApprovalError::Prediction(PredictionError::Inference(InferenceError::Other(
                "boom".to_string(),
            ))),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(approval_error_status(&error), expected, "{error}");
        assert_eq!(approval_error_response(&error).status(), expected, "{error}");
    }
}
