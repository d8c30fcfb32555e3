//! Generative model provider abstractions and implementations.
//!
//! The pipeline only talks to [`TextProvider`], so the Gemini client can be
//! swapped for [`mock::MockTextProvider`] in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Method name a catalog entry must list to be usable for prompting.
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Connection, DNS or timeout failure.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// Upstream answered with a non-success status.
    #[error("Upstream rejected request with status {status}")]
    Rejected { status: u16, body: String },

    /// Upstream answered 2xx but without a usable text candidate.
    #[error("Malformed upstream reply: {0}")]
    MalformedReply(String),
}

/// Sampling settings sent with every generation call.
///
/// These are fixed for the service so the reply shape stays predictable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
    max_output_tokens: 4096,
};

/// Text of the first candidate returned by the model.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub finish_reason: Option<String>,
}

/// One entry of the upstream model catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Identifier without the `models/` prefix, e.g. `gemini-1.5-flash-002`.
    pub id: String,
    pub supported_methods: Vec<String>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, methods: &[&str]) -> Self {
        Self {
            id: id.into(),
            supported_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn can_generate(&self) -> bool {
        self.supported_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT_METHOD)
    }
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` to `model` with [`GENERATION_CONFIG`].
    async fn generate(&self, model: &str, prompt: &str) -> Result<ModelReply, ProviderError>;

    /// List every model the credential can see.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError>;

    async fn health_check(&self) -> Result<(), ProviderError>;
}
