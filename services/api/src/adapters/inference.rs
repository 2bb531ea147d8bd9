//! services/api/src/adapters/inference.rs
//!
//! This module contains the adapter for the text-generation model.
//! It implements the `TextGenerationService` port from the `core` crate against
//! any OpenAI-compatible chat-completion endpoint (the Hugging Face inference
//! router by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use study_transform_core::ports::{
    GenerationRequest, PortError, PortResult, TextGenerationService,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiInferenceAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiInferenceAdapter {
    /// Creates a new `OpenAiInferenceAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// The prompt goes in as the only user message, so the reply never echoes it.
    #[allow(deprecated)]
    fn build_request(
        &self,
        request: &GenerationRequest,
    ) -> PortResult<CreateChatCompletionRequest> {
        let prompt = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let messages: Vec<ChatCompletionRequestMessage> = vec![prompt.into()];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(request.max_new_tokens)
            .temperature(request.temperature)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiInferenceAdapter {
    async fn generate_text(&self, request: &GenerationRequest) -> PortResult<String> {
        let chat_request = self.build_request(request)?;
        debug!(
            model = %self.model,
            max_new_tokens = request.max_new_tokens,
            "Calling inference endpoint"
        );

        // Map the error manually, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidOutput(
                    "Inference response contained no text content.".to_string(),
                )
            })
    }
}
