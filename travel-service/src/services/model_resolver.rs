//! Upstream model discovery.
//!
//! The chosen model id lives in a [`ResolvedModel`] handle that request
//! handlers read and only [`ModelResolver::refresh`] writes.

use crate::error::TravelError;
use crate::services::providers::{ModelInfo, TextProvider};
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct ModelState {
    id: Arc<str>,
    resolved: bool,
}

/// Shared, read-mostly model id.
///
/// Readers get either the configured default or a fully written resolved id;
/// the id is swapped as a whole under the lock.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    inner: Arc<RwLock<ModelState>>,
}

impl ResolvedModel {
    pub fn new(default_model: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ModelState {
                id: Arc::from(default_model),
                resolved: false,
            })),
        }
    }

    pub fn current(&self) -> Arc<str> {
        let state = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&state.id)
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).resolved
    }

    fn store(&self, id: &str) {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        state.id = Arc::from(id);
        state.resolved = true;
    }
}

pub struct ModelResolver {
    provider: Arc<dyn TextProvider>,
    preferences: Vec<String>,
    handle: ResolvedModel,
}

impl ModelResolver {
    pub fn new(
        provider: Arc<dyn TextProvider>,
        preferences: Vec<String>,
        handle: ResolvedModel,
    ) -> Self {
        Self {
            provider,
            preferences,
            handle,
        }
    }

    /// Pick a model from the live catalog without touching the handle.
    pub async fn resolve(&self) -> Result<String, TravelError> {
        let catalog = self
            .provider
            .list_models()
            .await
            .map_err(|e| TravelError::Resolution(format!("model listing failed: {}", e)))?;

        select_model(&self.preferences, &catalog)
            .map(|m| m.id.clone())
            .ok_or_else(|| {
                TravelError::Resolution(format!(
                    "none of {} listed models supports content generation",
                    catalog.len()
                ))
            })
    }

    /// Resolve and publish the result to every holder of the handle.
    pub async fn refresh(&self) -> Result<String, TravelError> {
        let previous = self.handle.current();
        let model = self.resolve().await?;
        self.handle.store(&model);

        tracing::info!(
            model = %model,
            previous = %previous,
            "Resolved upstream model"
        );

        Ok(model)
    }
}

/// Preference order first, then any generation-capable model.
pub fn select_model<'a>(preferences: &[String], catalog: &'a [ModelInfo]) -> Option<&'a ModelInfo> {
    preferences
        .iter()
        .find_map(|name| {
            catalog
                .iter()
                .find(|m| m.can_generate() && is_variant_of(&m.id, name))
        })
        .or_else(|| catalog.iter().find(|m| m.can_generate()))
}

/// `id` is `name` itself or a dated/versioned release of it
/// (`-002`, `-latest`, `-exp-0827`, `-preview-05-06`).
fn is_variant_of(id: &str, name: &str) -> bool {
    if id == name {
        return true;
    }

    let Some(suffix) = id.strip_prefix(name).and_then(|s| s.strip_prefix('-')) else {
        return false;
    };

    let first = suffix.split('-').next().unwrap_or_default();
    (!first.is_empty() && first.chars().all(|c| c.is_ascii_digit()))
        || first == "latest"
        || first.starts_with("exp")
        || first.starts_with("preview")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::{ModelReply, ProviderError};
    use async_trait::async_trait;

    fn prefs() -> Vec<String> {
        vec!["gemini-1.5-flash".to_string(), "gemini-1.5-pro".to_string()]
    }

    fn gen(id: &str) -> ModelInfo {
        ModelInfo::new(id, &["generateContent"])
    }

    #[test]
    fn variant_matching() {
        assert!(is_variant_of("gemini-1.5-flash", "gemini-1.5-flash"));
        assert!(is_variant_of("gemini-1.5-flash-002", "gemini-1.5-flash"));
        assert!(is_variant_of("gemini-1.5-flash-latest", "gemini-1.5-flash"));
        assert!(is_variant_of("gemini-1.5-flash-exp-0827", "gemini-1.5-flash"));
        assert!(!is_variant_of("gemini-1.5-flash-8b", "gemini-1.5-flash"));
        assert!(!is_variant_of("gemini-1.5-flashy", "gemini-1.5-flash"));
        assert!(!is_variant_of("gemini-1.5-pro", "gemini-1.5-flash"));
    }

    #[test]
    fn preference_order_beats_catalog_order() {
        let catalog = vec![gen("gemini-1.5-pro-001"), gen("gemini-1.5-flash-002")];
        let chosen = select_model(&prefs(), &catalog).unwrap();
        assert_eq!(chosen.id, "gemini-1.5-flash-002");
    }

    #[test]
    fn capability_is_required_for_preferred_match() {
        let catalog = vec![
            ModelInfo::new("gemini-1.5-flash", &["countTokens"]),
            gen("gemini-1.5-pro"),
        ];
        let chosen = select_model(&prefs(), &catalog).unwrap();
        assert_eq!(chosen.id, "gemini-1.5-pro");
    }

    #[test]
    fn falls_back_to_any_capable_model() {
        let catalog = vec![
            ModelInfo::new("embedding-001", &["embedContent"]),
            gen("gemini-2.0-flash"),
        ];
        let chosen = select_model(&prefs(), &catalog).unwrap();
        assert_eq!(chosen.id, "gemini-2.0-flash");
    }

    #[test]
    fn nothing_capable_selects_nothing() {
        let catalog = vec![ModelInfo::new("embedding-001", &["embedContent"])];
        assert!(select_model(&prefs(), &catalog).is_none());
    }

    #[tokio::test]
    async fn refresh_publishes_resolved_model() {
        let provider = Arc::new(
            MockTextProvider::replying("[]").with_models(vec![gen("gemini-1.5-pro-002")]),
        );
        let handle = ResolvedModel::new("gemini-1.5-flash");
        let resolver = ModelResolver::new(provider, prefs(), handle.clone());

        assert!(!handle.is_resolved());
        assert_eq!(&*handle.current(), "gemini-1.5-flash");

        let model = resolver.refresh().await.unwrap();

        assert_eq!(model, "gemini-1.5-pro-002");
        assert!(handle.is_resolved());
        assert_eq!(&*handle.current(), "gemini-1.5-pro-002");
    }

    #[tokio::test]
    async fn empty_catalog_is_resolution_error() {
        let provider = Arc::new(MockTextProvider::replying("[]").with_models(vec![]));
        let handle = ResolvedModel::new("gemini-1.5-flash");
        let resolver = ModelResolver::new(provider, prefs(), handle.clone());

        let err = resolver.refresh().await.unwrap_err();
        assert_eq!(err.kind(), "resolution");
        assert!(!handle.is_resolved());
    }

    struct FailingCatalog;

    #[async_trait]
    impl TextProvider for FailingCatalog {
        async fn generate(&self, _: &str, _: &str) -> Result<ModelReply, ProviderError> {
            unreachable!("resolver never generates")
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError> {
            Err(ProviderError::Unavailable("connection refused".to_string()))
        }

        async fn health_check(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn listing_failure_is_resolution_error() {
        let resolver = ModelResolver::new(
            Arc::new(FailingCatalog),
            prefs(),
            ResolvedModel::new("gemini-1.5-flash"),
        );

        match resolver.resolve().await {
            Err(TravelError::Resolution(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("expected resolution error, got {:?}", other),
        }
    }
}
