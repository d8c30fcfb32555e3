use service_core::observability::init_tracing;
use travel_service::config::TravelConfig;
use travel_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = TravelConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "travel-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        api_base = %config.gemini.api_base,
        preferred_models = ?config.gemini.preferred_models,
        timeout_secs = config.gemini.timeout_secs,
        "Starting travel-service"
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
