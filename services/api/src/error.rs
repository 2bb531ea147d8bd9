//! services/api/src/error.rs
//!
//! Startup errors for the `api` binary. Request-time failures never reach
//! this type; the handlers turn them into HTTP responses directly.

use crate::config::ConfigError;
use axum::http::header::InvalidHeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `CORS_ORIGIN` is set but is not a valid header value.
    #[error("Invalid CORS origin: {0}")]
    CorsOrigin(#[from] InvalidHeaderValue),

    /// Binding the listener or serving connections failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
