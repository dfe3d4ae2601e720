use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_loan_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::telemetry;
use loan_approval::workflows::approval::{shared_model, LoanApprovalService, ModelLoadError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(model) = args.model.take() {
        config.model.path = model;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    // Loaded before binding so the first request never pays for it.
    let approval = Arc::new(LoanApprovalService::from_cache(shared_model(
        config.model.path.clone(),
    )));
    match approval.load_error() {
        Some(ModelLoadError::NotFound { path }) => warn!(
            path = %path.display(),
            "model artifact missing; serving the form with predictions disabled"
        ),
        Some(err) => warn!(error = %err, "serving the form with predictions disabled"),
        None => {}
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        approval: approval.clone(),
    };

    let app = with_loan_routes(approval.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    let model = approval.model_status();
    info!(
        ?config.environment,
        %addr,
        model = model.name.as_deref().unwrap_or("unavailable"),
        "loan approval predictor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
