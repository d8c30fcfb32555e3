//! Prometheus metrics for travel-service.
//!
//! Everything goes through the `metrics` facade; the Prometheus recorder is
//! installed once per process and rendered by the `/metrics` handler.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init_metrics() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(e) => {
                // Another recorder owns the global slot; render from a detached one.
                tracing::warn!(error = %e, "Prometheus recorder already installed");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_pipeline_request(pipeline: &'static str, outcome: &'static str) {
    counter!(
        "travel_pipeline_requests_total",
        "pipeline" => pipeline,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_pipeline_failure(pipeline: &'static str, kind: &'static str, stage: &'static str) {
    counter!(
        "travel_pipeline_failures_total",
        "pipeline" => pipeline,
        "kind" => kind,
        "stage" => stage
    )
    .increment(1);
}

pub fn record_upstream_latency(model: &str, elapsed: Duration) {
    histogram!("travel_upstream_latency_seconds", "model" => model.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_normalization_drop(pipeline: &'static str, field: &str) {
    counter!(
        "travel_normalization_drops_total",
        "pipeline" => pipeline,
        "field" => field.to_string()
    )
    .increment(1);
}
