//! HTTP handlers for travel-service.

pub mod details;
pub mod recommendations;

use crate::error::{PipelineError, Stage, TravelError};
use crate::services::metrics;
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use validator::ValidationErrors;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "travel-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: ready once an upstream model has been resolved and the
/// provider is configured.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if !state.model.is_resolved() || state.provider.health_check().await.is_err() {
        return Err(AppError::ServiceUnavailable);
    }

    let model = state.model.current();
    Ok((
        StatusCode::OK,
        Json(json!({ "status": "ready", "model": &*model })),
    ))
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics::get_metrics(),
    )
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("No route for {}", uri.path()))
}

/// Map a malformed body to a 400.
fn rejected_body(pipeline: &'static str, rejection: JsonRejection) -> AppError {
    tracing::info!(pipeline, error = %rejection.body_text(), "Rejected request body");
    metrics::record_pipeline_failure(pipeline, "validation", Stage::Validating.as_str());
    AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
}

/// Field-level validator errors stay 422 but are counted like other rejections.
fn invalid_fields(pipeline: &'static str, errors: ValidationErrors) -> AppError {
    tracing::info!(pipeline, error = %errors, "Request failed field validation");
    metrics::record_pipeline_failure(pipeline, "validation", Stage::Validating.as_str());
    AppError::ValidationError(errors)
}

/// Map a semantic validation failure to a 400.
fn invalid_request(pipeline: &'static str, err: TravelError) -> AppError {
    tracing::info!(pipeline, error = %err, "Invalid request");
    metrics::record_pipeline_failure(pipeline, err.kind(), Stage::Validating.as_str());
    AppError::BadRequest(anyhow::anyhow!(err.to_string()))
}

/// Record a failed pipeline run for operators and hide it behind a uniform 500.
fn pipeline_failure(pipeline: &'static str, err: PipelineError, public_message: &str) -> AppError {
    tracing::error!(
        pipeline,
        kind = err.kind(),
        stage = %err.stage,
        error = %err.source,
        diagnostics = err.source.diagnostics().as_deref().unwrap_or(""),
        "Pipeline failed"
    );
    metrics::record_pipeline_failure(pipeline, err.kind(), err.stage.as_str());
    metrics::record_pipeline_request(pipeline, "failed");

    AppError::UpstreamFailure(public_message.to_string())
}
