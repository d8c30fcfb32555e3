use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config;
use service_core::error::AppError;
use travel_service::config::{CorsConfig, GeminiSettings, TravelConfig};
use travel_service::startup::Application;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_MODEL: &str = "gemini-1.5-flash";

pub const PROVIDENCE_REPLY: &str = r#"Here you go:
[{"id":"1","name":"Providence","description":"Historic capital of Rhode Island","cost":{"train":{"min":10,"max":20},"bus":{"min":8,"max":12}},"currency":"$","distance":50,"travelTime":"1h"}]
Enjoy!"#;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Stand-in for the generative-language API. Kept alive for the app's lifetime.
    pub gemini: MockServer,
}

impl TestApp {
    /// Spawn with a catalog that offers the default model and a model that
    /// answers every prompt with `reply_text`.
    pub async fn spawn(reply_text: &str) -> Self {
        let gemini = MockServer::start().await;
        mount_catalog(&gemini, catalog(&[(TEST_MODEL, &["generateContent"])])).await;
        mount_generate(&gemini, ResponseTemplate::new(200).set_body_json(text_reply(reply_text)))
            .await;

        Self::spawn_against(gemini)
            .await
            .expect("Failed to build test application")
    }

    /// Spawn against a mock server the caller has already primed.
    pub async fn spawn_against(gemini: MockServer) -> Result<Self, AppError> {
        let config = test_config(&gemini.uri());
        Self::spawn_with_config(gemini, config).await
    }

    pub async fn spawn_with_config(
        gemini: MockServer,
        config: TravelConfig,
    ) -> Result<Self, AppError> {
        let app = Application::build(config).await?;
        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        Ok(TestApp {
            address,
            port,
            gemini,
        })
    }

    pub async fn post_json(&self, route: &str, body: &Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", self.address, route))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Prompts the service sent upstream, in order.
    pub async fn sent_prompts(&self) -> Vec<String> {
        self.gemini
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.to_string() == "POST")
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .filter_map(|body| {
                body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .map(str::to_string)
            })
            .collect()
    }
}

pub fn test_config(api_base: &str) -> TravelConfig {
    TravelConfig {
        common: Config {
            port: 0, // Random port
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        gemini: GeminiSettings {
            api_key: Secret::new("test-key".to_string()),
            api_base: api_base.to_string(),
            default_model: TEST_MODEL.to_string(),
            preferred_models: vec![TEST_MODEL.to_string(), "gemini-1.5-pro".to_string()],
            timeout_secs: 5,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

pub fn catalog(models: &[(&str, &[&str])]) -> Value {
    let models: Vec<Value> = models
        .iter()
        .map(|(name, methods)| {
            json!({
                "name": format!("models/{}", name),
                "supportedGenerationMethods": methods,
            })
        })
        .collect();
    json!({ "models": models })
}

pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

pub async fn mount_catalog(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_generate(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/models/{}:generateContent", TEST_MODEL)))
        .respond_with(response)
        .mount(server)
        .await;
}
