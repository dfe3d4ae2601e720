use crate::infra::AppState;
use crate::page::{render_page, Outcome, PageView};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use loan_approval::workflows::approval::{
    approval_error_status, approval_router, ApplicantForm, ApprovalClassifier,
    LoanApprovalService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_loan_routes<M>(service: Arc<LoanApprovalService<M>>) -> Router
where
    M: ApprovalClassifier + 'static,
{
    approval_router(service)
        .route("/", get(index_page))
        .route("/predict", post(predict_page))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn index_page(Extension(state): Extension<AppState>) -> Html<String> {
    let form = ApplicantForm::default();
    let model = state.approval.model_status();
    Html(
        render_page(&PageView {
            form: &form,
            model: &model,
            outcome: None,
        })
        .into_string(),
    )
}

/// Handles the HTML form post and re-renders the page with the submitted values.
pub(crate) async fn predict_page(
    Extension(state): Extension<AppState>,
    Form(form): Form<ApplicantForm>,
) -> Response {
    let model = state.approval.model_status();
    let prediction = state.approval.predict(&form);

    let (status, outcome) = match &prediction {
        Ok(result) => (StatusCode::OK, Outcome::Prediction(result)),
        Err(error) => (approval_error_status(error), Outcome::Failure(error)),
    };

    let markup = render_page(&PageView {
        form: &form,
        model: &model,
        outcome: Some(outcome),
    });
    (status, Html(markup.into_string())).into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    // The listener decides readiness; a missing model only disables predictions.
    let model = if state.approval.is_ready() {
        "loaded"
    } else {
        "unavailable"
    };
    let payload = if ready {
        json!({ "status": "ready", "model": model })
    } else {
        json!({ "status": "initializing", "model": model })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
