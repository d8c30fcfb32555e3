use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PREFERRED_MODELS: &str = "gemini-1.5-flash,gemini-1.5-pro";

/// Upstream timeout when `UPSTREAM_TIMEOUT_SECS` is unset.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct TravelConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Base URL of the generative-language API, without a trailing slash.
    pub api_base: String,
    /// Model used until discovery has completed.
    pub default_model: String,
    /// Discovery preference order, most preferred first.
    pub preferred_models: Vec<String>,
    pub timeout_secs: u64,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl TravelConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        // The frontend build historically exported the key under its Vite name.
        let api_key = get_env("GEMINI_API_KEY", None, is_prod)
            .or_else(|_| get_env("VITE_GEMINI_API_KEY", None, is_prod))
            .map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "GEMINI_API_KEY is not configured in environment variables"
                ))
            })?;

        Ok(TravelConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?
                    .trim_end_matches('/')
                    .to_string(),
                default_model: get_env("GEMINI_DEFAULT_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                preferred_models: parse_list(&get_env(
                    "GEMINI_PREFERRED_MODELS",
                    Some(DEFAULT_PREFERRED_MODELS),
                    is_prod,
                )?),
                timeout_secs: parse_timeout_secs(&get_env(
                    "UPSTREAM_TIMEOUT_SECS",
                    Some(&DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?)?,
            },
            cors: CorsConfig {
                allowed_origins: parse_list(&get_env("CORS_ALLOWED_ORIGINS", Some("*"), is_prod)?),
            },
        })
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole seconds, at least one.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_SECS must be a positive whole number of seconds, got '{}'",
            raw
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
