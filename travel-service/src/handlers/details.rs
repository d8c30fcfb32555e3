use super::{invalid_fields, invalid_request, pipeline_failure, rejected_body};
use crate::dtos::DestinationDetailsRequest;
use crate::models::DestinationDetails;
use crate::services::metrics;
use crate::services::planner::DESTINATION_DETAILS;
use crate::startup::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

#[tracing::instrument(skip(state, payload))]
pub async fn get_destination_details(
    State(state): State<AppState>,
    payload: Result<Json<DestinationDetailsRequest>, JsonRejection>,
) -> Result<Json<DestinationDetails>, AppError> {
    let Json(request) = payload.map_err(|e| rejected_body(DESTINATION_DETAILS, e))?;
    let destination = request.into_destination();
    destination
        .validate()
        .map_err(|e| invalid_fields(DESTINATION_DETAILS, e))?;

    let query = destination
        .into_query()
        .map_err(|e| invalid_request(DESTINATION_DETAILS, e))?;

    let details = state.planner.describe(&query).await.map_err(|e| {
        pipeline_failure(DESTINATION_DETAILS, e, "Failed to fetch destination details")
    })?;

    metrics::record_pipeline_request(DESTINATION_DETAILS, "ok");
    Ok(Json(details))
}
