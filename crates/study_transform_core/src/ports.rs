//! crates/study_transform_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the inference provider and of the storage backend.

use async_trait::async_trait;

use crate::domain::{Transformation, TransformationUpdate};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The text-generation call itself failed (network, auth, provider error).
    #[error("Upstream service error: {0}")]
    Upstream(String),
    /// The model answered, but not with JSON of the expected shape.
    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<serde_json::Error> for PortError {
    fn from(e: serde_json::Error) -> Self {
        PortError::InvalidOutput(e.to_string())
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A single text-generation call: the prompt plus its decoding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Runs the prompt through the model and returns only the generated text,
    /// without the prompt echoed back.
    async fn generate_text(&self, request: &GenerationRequest) -> PortResult<String>;
}

#[async_trait]
pub trait TransformationStore: Send + Sync {
    /// All stored transformations, newest first.
    async fn list_transformations(&self) -> PortResult<Vec<Transformation>>;

    async fn get_transformation(&self, id: &str) -> PortResult<Transformation>;

    async fn create_transformation(
        &self,
        transformation: Transformation,
    ) -> PortResult<Transformation>;

    async fn update_transformation(
        &self,
        id: &str,
        update: TransformationUpdate,
    ) -> PortResult<Transformation>;

    async fn delete_transformation(&self, id: &str) -> PortResult<()>;
}
