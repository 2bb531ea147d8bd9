//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3001";
pub const DEFAULT_INFERENCE_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_INFERENCE_MODEL: &str = "google/flan-t5-xxl";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Bearer key for the inference provider. Without it every model call
    /// fails and the fallback heuristics take over.
    pub huggingface_api_key: Option<String>,
    pub inference_base_url: String,
    pub inference_model: String,
    /// Restricts CORS to a single origin; any origin is allowed when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Load Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = lookup("CORS_ORIGIN").filter(|origin| !origin.trim().is_empty());

        // --- Load Inference Settings ---
        let huggingface_api_key = lookup("HUGGINGFACE_API_KEY").filter(|key| !key.is_empty());

        let inference_base_url = lookup("INFERENCE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_INFERENCE_BASE_URL.to_string());
        if !inference_base_url.starts_with("http://")
            && !inference_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue(
                "INFERENCE_BASE_URL".to_string(),
                format!("'{}' is not an http(s) URL", inference_base_url),
            ));
        }

        let inference_model = lookup("INFERENCE_MODEL")
            .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string());
        if inference_model.trim().is_empty() {
            return Err(ConfigError::MissingVar("INFERENCE_MODEL".to_string()));
        }

        Ok(Self {
            bind_address,
            log_level,
            huggingface_api_key,
            inference_base_url: inference_base_url.trim_end_matches('/').to_string(),
            inference_model,
            cors_origin,
        })
    }
}
