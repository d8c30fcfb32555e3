use super::{invalid_fields, invalid_request, pipeline_failure, rejected_body};
use crate::dtos::RecommendationsRequest;
use crate::models::Destination;
use crate::services::metrics;
use crate::services::planner::RECOMMENDATIONS;
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

#[tracing::instrument(skip(state, payload))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationsRequest>, JsonRejection>,
) -> Result<Json<Vec<Destination>>, AppError> {
    let Json(request) = payload.map_err(|e| rejected_body(RECOMMENDATIONS, e))?;
    request
        .validate()
        .map_err(|e| invalid_fields(RECOMMENDATIONS, e))?;

    let query = request
        .into_query()
        .map_err(|e| invalid_request(RECOMMENDATIONS, e))?;

    let destinations = state
        .planner
        .recommend(&query)
        .await
        .map_err(|e| pipeline_failure(RECOMMENDATIONS, e, "Failed to fetch recommendations"))?;

    metrics::record_pipeline_request(RECOMMENDATIONS, "ok");
    Ok(Json(destinations))
}
