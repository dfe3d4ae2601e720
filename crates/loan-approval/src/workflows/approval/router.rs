use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::PredictionResult;
use super::encoder::encoding_notes;
use super::form::ApplicantForm;
use super::model::ApprovalClassifier;
use super::service::{ApprovalError, LoanApprovalService};

/// JSON body returned for a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub approved: bool,
    pub label: i64,
    pub decision: String,
    pub summary: String,
    pub approval_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_caption: Option<String>,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        let decision = if result.approved {
            "approved"
        } else {
            "not_approved"
        };
        Self {
            approved: result.approved,
            label: result.label,
            decision: decision.to_string(),
            summary: result.summary().to_string(),
            approval_probability: result.approval_probability,
            probability_caption: result.probability_caption(),
        }
    }
}

/// Router builder exposing the prediction API.
pub fn approval_router<M>(service: Arc<LoanApprovalService<M>>) -> Router
where
    M: ApprovalClassifier + 'static,
{
    Router::new()
        .route("/api/v1/loan/predictions", post(predict_handler::<M>))
        .route("/api/v1/loan/model", get(model_handler::<M>))
        .route("/api/v1/loan/encoding", get(encoding_handler))
        .with_state(service)
}

pub(crate) async fn predict_handler<M>(
    State(service): State<Arc<LoanApprovalService<M>>>,
    Json(form): Json<ApplicantForm>,
) -> Response
where
    M: ApprovalClassifier + 'static,
{
    match service.predict(&form) {
        Ok(result) => (StatusCode::OK, Json(PredictionResponse::from(result))).into_response(),
        Err(error) => approval_error_response(&error),
    }
}

pub(crate) async fn model_handler<M>(
    State(service): State<Arc<LoanApprovalService<M>>>,
) -> Response
where
    M: ApprovalClassifier + 'static,
{
    let status = service.model_status();
    let code = if status.available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status)).into_response()
}

pub(crate) async fn encoding_handler() -> Response {
    (StatusCode::OK, Json(json!({ "columns": encoding_notes() }))).into_response()
}

/// Status code for a failed predict action, shared by the JSON and HTML surfaces.
pub fn approval_error_status(error: &ApprovalError) -> StatusCode {
    match error {
        ApprovalError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ApprovalError::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApprovalError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a failed predict action onto a status code and JSON error body.
pub fn approval_error_response(error: &ApprovalError) -> Response {
    let payload = match error {
        ApprovalError::Encoding(encoding) => json!({
            "error": error.to_string(),
            "field": encoding.field,
            "reason": encoding.reason.to_string(),
        }),
        ApprovalError::ModelUnavailable(_) | ApprovalError::Prediction(_) => {
            json!({ "error": error.to_string() })
        }
    };
    (approval_error_status(error), Json(payload)).into_response()
}
