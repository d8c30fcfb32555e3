//! Error taxonomy of the recommendation pipeline.

use crate::services::providers::ProviderError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TravelError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model resolution failed: {0}")]
    Resolution(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream rejected request with status {status}")]
    UpstreamRejected { status: u16, body: String },

    #[error("Malformed upstream reply: {0}")]
    MalformedUpstreamReply(String),

    #[error("No JSON payload found in model reply")]
    NoJsonFound,

    #[error("Model reply contained malformed JSON: {reason}")]
    MalformedJson { raw: String, reason: String },

    #[error("Invalid cost shape for '{transport}': {raw}")]
    InvalidCostShape {
        transport: String,
        raw: serde_json::Value,
    },
}

impl TravelError {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TravelError::Validation(_) => "validation",
            TravelError::Resolution(_) => "resolution",
            TravelError::UpstreamUnavailable(_) => "upstream_unavailable",
            TravelError::UpstreamRejected { .. } => "upstream_rejected",
            TravelError::MalformedUpstreamReply(_) => "malformed_upstream_reply",
            TravelError::NoJsonFound => "no_json_found",
            TravelError::MalformedJson { .. } => "malformed_json",
            TravelError::InvalidCostShape { .. } => "invalid_cost_shape",
        }
    }

    /// Operator-only payload: upstream body or the offending raw text.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            TravelError::UpstreamRejected { body, .. } => Some(body.clone()),
            TravelError::MalformedJson { raw, .. } => Some(raw.clone()),
            TravelError::InvalidCostShape { raw, .. } => Some(raw.to_string()),
            _ => None,
        }
    }
}

impl From<ProviderError> for TravelError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => TravelError::UpstreamUnavailable(msg),
            ProviderError::Rejected { status, body } => TravelError::UpstreamRejected { status, body },
            ProviderError::MalformedReply(msg) => TravelError::MalformedUpstreamReply(msg),
            ProviderError::NotConfigured(msg) => TravelError::UpstreamUnavailable(msg),
        }
    }
}

/// Where a request was in the pipeline when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    ResolvingModel,
    Prompting,
    CallingUpstream,
    Extracting,
    Normalizing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::ResolvingModel => "resolving_model",
            Stage::Prompting => "prompting",
            Stage::CallingUpstream => "calling_upstream",
            Stage::Extracting => "extracting",
            Stage::Normalizing => "normalizing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal `Failed` state of a pipeline run.
#[derive(Debug, Error)]
#[error("pipeline failed while {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: TravelError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<TravelError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}
