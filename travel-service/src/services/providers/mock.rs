//! Mock provider implementation for testing.

use super::{ModelInfo, ModelReply, ProviderError, TextProvider, GENERATE_CONTENT_METHOD};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock answers to `generate`.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    Reply(String),
    Reject { status: u16, body: String },
    Unavailable(String),
    NoCandidates,
}

/// Mock text provider for testing.
///
/// Records every prompt it receives so tests can assert on prompt content.
pub struct MockTextProvider {
    behaviour: MockBehaviour,
    models: Vec<ModelInfo>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockTextProvider {
    pub fn new(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            models: vec![ModelInfo::new(
                "gemini-1.5-flash",
                &[GENERATE_CONTENT_METHOD],
            )],
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockBehaviour::Reply(text.into()))
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = models;
        self
    }

    /// `(model, prompt)` pairs seen so far.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, model: &str, prompt: &str) -> Result<ModelReply, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((model.to_string(), prompt.to_string()));
        }

        match &self.behaviour {
            MockBehaviour::Reply(text) => Ok(ModelReply {
                text: text.clone(),
                finish_reason: Some("STOP".to_string()),
            }),
            MockBehaviour::Reject { status, body } => Err(ProviderError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            MockBehaviour::Unavailable(msg) => Err(ProviderError::Unavailable(msg.clone())),
            MockBehaviour::NoCandidates => Err(ProviderError::MalformedReply(
                "reply has no candidates".to_string(),
            )),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
        Ok(self.models.clone())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
