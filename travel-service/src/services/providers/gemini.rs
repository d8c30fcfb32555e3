//! Gemini provider implementation.
//!
//! Talks to the generative-language REST API: `models.list` for discovery and
//! `models.generateContent` for prompting. The API key travels as the `key`
//! query parameter.

use super::{
    GenerationConfig, ModelInfo, ModelReply, ProviderError, TextProvider, GENERATION_CONFIG,
};
use crate::config::GeminiSettings;
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on catalog pages followed during discovery.
const MAX_CATALOG_PAGES: usize = 20;
const CATALOG_PAGE_SIZE: &str = "100";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl From<&GeminiSettings> for GeminiConfig {
    fn from(settings: &GeminiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
            timeout: settings.timeout(),
        }
    }
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.api_base, model)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.api_base)
    }

    fn key(&self) -> &str {
        self.config.api_key.expose_secret()
    }

    /// Turn a non-success response into [`ProviderError::Rejected`].
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Unavailable(format!("request timed out: {}", e))
    } else {
        ProviderError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<ModelReply, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GENERATION_CONFIG,
        };

        tracing::debug!(
            model = %model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.generate_url(model))
            .query(&[("key", self.key())])
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check_status(response).await?;

        let api_response: GenerateContentResponse = read_json(response, "response").await?;

        first_candidate_text(api_response)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_CATALOG_PAGES {
            let mut query = vec![("key", self.key()), ("pageSize", CATALOG_PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self
                .client
                .get(self.models_url())
                .query(&query)
                .send()
                .await
                .map_err(transport_error)?;

            let response = Self::check_status(response).await?;

            let page: ListModelsResponse = read_json(response, "model list").await?;

            models.extend(page.models.into_iter().map(ModelInfo::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = models.len(), "Fetched Gemini model catalog");
        Ok(models)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.key().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the whole body, then parse it. A failure while reading is a transport
/// problem; only a body that arrives but does not parse is a malformed reply.
async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ProviderError> {
    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body)
        .map_err(|e| ProviderError::MalformedReply(format!("Failed to parse {}: {}", what, e)))
}

fn first_candidate_text(response: GenerateContentResponse) -> Result<ModelReply, ProviderError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedReply("reply has no candidates".to_string()))?;

    let text = candidate
        .content
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty());

    match text {
        Some(text) => Ok(ModelReply {
            text,
            finish_reason: candidate.finish_reason,
        }),
        None => Err(ProviderError::MalformedReply(format!(
            "first candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ))),
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<CatalogModel>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<CatalogModel> for ModelInfo {
    fn from(model: CatalogModel) -> Self {
        let id = model
            .name
            .strip_prefix("models/")
            .unwrap_or(&model.name)
            .to_string();
        ModelInfo {
            id,
            supported_methods: model.supported_generation_methods,
        }
    }
}
