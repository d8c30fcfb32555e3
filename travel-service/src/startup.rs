//! Application startup and lifecycle management.

use crate::config::TravelConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::{init_metrics, ModelResolver, ResolvedModel, TravelPlanner};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, tracing::make_request_span,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: TravelConfig,
    pub planner: TravelPlanner,
    pub model: ResolvedModel,
    pub provider: Arc<dyn TextProvider>,
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application against the real Gemini API.
    pub async fn build(config: TravelConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig::from(&config.gemini);
        let provider = GeminiTextProvider::new(gemini_config).map_err(|e| {
            tracing::error!("Failed to create Gemini client: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e.to_string()))
        })?;

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build with an arbitrary provider. Model discovery runs here and a
    /// failure aborts startup.
    pub async fn build_with_provider(
        config: TravelConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        init_metrics();

        provider.health_check().await.map_err(|e| {
            tracing::error!("Upstream provider is not usable: {}", e);
            AppError::ConfigError(anyhow::anyhow!(e.to_string()))
        })?;

        let model = ResolvedModel::new(&config.gemini.default_model);
        let resolver = ModelResolver::new(
            provider.clone(),
            config.gemini.preferred_models.clone(),
            model.clone(),
        );

        resolver.refresh().await.map_err(|e| {
            tracing::error!(kind = e.kind(), "Failed to resolve upstream model: {}", e);
            AppError::InternalError(anyhow::Error::new(e))
        })?;

        let planner = TravelPlanner::new(provider.clone(), model.clone());

        let state = AppState {
            config: config.clone(),
            planner,
            model,
            provider,
        };

        // Port 0 binds a random port for tests
        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(
            port = http_port,
            model = %state.model.current(),
            "Travel service ready"
        );

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = router(self.state);

        axum::serve(self.http_listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

/// Route table with the middleware stack.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let api = Router::new()
        .route("/recommendations", post(handlers::recommendations::get_recommendations))
        .route(
            "/api/travel-recommendations",
            post(handlers::recommendations::get_recommendations),
        )
        .route("/destination-details", post(handlers::details::get_destination_details))
        .route(
            "/api/destination-details",
            post(handlers::details::get_destination_details),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(from_fn(metrics_middleware));

    api.fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(config: &TravelConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
