//! Request pipelines: prompt, call the model, extract, normalize.
//!
//! Each call is a single pass. A failure at any stage stops the run and is
//! returned as a [`PipelineError`] carrying the stage it happened in.

use crate::error::{PipelineError, Stage, TravelError};
use crate::models::{Destination, DestinationDetails};
use crate::services::extractor::{extract_json_array, extract_json_object};
use crate::services::metrics;
use crate::services::model_resolver::ResolvedModel;
use crate::services::normalizer::{normalize_destinations, normalize_details, NormalizationWarning};
use crate::services::prompts::{build_details_prompt, build_recommendations_prompt};
use crate::services::providers::TextProvider;
use std::sync::Arc;
use std::time::Instant;

pub const RECOMMENDATIONS: &str = "recommendations";
pub const DESTINATION_DETAILS: &str = "destination_details";

/// Validated recommendations request, budget already in USD.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelQuery {
    pub location: String,
    pub budget_usd: f64,
}

/// Validated details request.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationQuery {
    pub name: String,
    pub distance: Option<f64>,
}

#[derive(Clone)]
pub struct TravelPlanner {
    provider: Arc<dyn TextProvider>,
    model: ResolvedModel,
}

impl TravelPlanner {
    pub fn new(provider: Arc<dyn TextProvider>, model: ResolvedModel) -> Self {
        Self { provider, model }
    }

    #[tracing::instrument(skip(self), fields(location = %query.location))]
    pub async fn recommend(&self, query: &TravelQuery) -> Result<Vec<Destination>, PipelineError> {
        enter(Stage::Prompting);
        let prompt = build_recommendations_prompt(&query.location, query.budget_usd);
        let text = self.call_model(&prompt).await?;

        enter(Stage::Extracting);
        let raw = extract_json_array(&text).map_err(|e| PipelineError::new(Stage::Extracting, e))?;

        enter(Stage::Normalizing);
        let (destinations, warnings) = normalize_destinations(&raw);
        report_warnings(RECOMMENDATIONS, &warnings);

        tracing::info!(count = destinations.len(), "Normalized destinations");
        Ok(destinations)
    }

    #[tracing::instrument(skip(self), fields(destination = %query.name))]
    pub async fn describe(&self, query: &DestinationQuery) -> Result<DestinationDetails, PipelineError> {
        enter(Stage::Prompting);
        let prompt = build_details_prompt(&query.name, query.distance);
        let text = self.call_model(&prompt).await?;

        enter(Stage::Extracting);
        let raw = extract_json_object(&text).map_err(|e| PipelineError::new(Stage::Extracting, e))?;

        enter(Stage::Normalizing);
        Ok(normalize_details(&raw))
    }

    async fn call_model(&self, prompt: &str) -> Result<String, PipelineError> {
        enter(Stage::ResolvingModel);
        let model = self.model.current();
        if model.is_empty() {
            return Err(PipelineError::new(
                Stage::ResolvingModel,
                TravelError::Resolution("no upstream model available".to_string()),
            ));
        }

        enter(Stage::CallingUpstream);
        let started = Instant::now();
        let result = self.provider.generate(&model, prompt).await;
        metrics::record_upstream_latency(&model, started.elapsed());

        let reply = result.map_err(|e| PipelineError::new(Stage::CallingUpstream, e))?;

        tracing::debug!(
            model = %model,
            reply_len = reply.text.len(),
            finish_reason = reply.finish_reason.as_deref().unwrap_or("unknown"),
            "Received model reply"
        );

        Ok(reply.text)
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = %stage, "Pipeline stage");
}

fn report_warnings(pipeline: &'static str, warnings: &[NormalizationWarning]) {
    for warning in warnings {
        tracing::warn!(
            pipeline,
            field = %warning.field,
            detail = %warning.detail,
            "Dropped part of model reply during normalization"
        );
        metrics::record_normalization_drop(pipeline, &metric_field(&warning.field));
    }
}

/// `destinations[2].cost.train` -> `destinations.cost.train`
fn metric_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut in_index = false;
    for ch in field.chars() {
        match ch {
            '[' => in_index = true,
            ']' => in_index = false,
            c if !in_index => out.push(c),
            _ => {}
        }
    }
    out
}
