//! crates/study_transform_core/src/pipeline.rs
//!
//! The generate-then-fallback pipeline shared by every study format:
//! prompt the model once, extract and coerce its JSON, and degrade to the
//! format's heuristic (and finally its placeholder) on any failure.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::{GeneratedContent, GenerationOptions, TransformationType};
use crate::extract::extract_json_from_text;
use crate::formats::{
    FlashcardFormat, MindMapFormat, QuestionFormat, QuizFormat, StudyFormat, SummaryFormat,
    TEMPERATURE,
};
use crate::ports::{GenerationRequest, PortResult, TextGenerationService};

/// Turns source text into study material using a text-generation service.
#[derive(Clone)]
pub struct StudyMaterialGenerator {
    llm: Arc<dyn TextGenerationService>,
}

impl StudyMaterialGenerator {
    pub fn new(llm: Arc<dyn TextGenerationService>) -> Self {
        Self { llm }
    }

    /// Generates material of the requested type. Never fails: degraded output
    /// is returned as content (see `GeneratedContent::is_error_placeholder`).
    pub async fn transform(
        &self,
        kind: TransformationType,
        text: &str,
        options: &GenerationOptions,
    ) -> GeneratedContent {
        match kind {
            TransformationType::Flashcards => {
                GeneratedContent::Flashcards(self.generate::<FlashcardFormat>(text, options).await)
            }
            TransformationType::Summary => {
                GeneratedContent::Summary(self.generate::<SummaryFormat>(text, options).await)
            }
            TransformationType::MindMap => {
                GeneratedContent::MindMap(self.generate::<MindMapFormat>(text, options).await)
            }
            TransformationType::Questions => {
                GeneratedContent::Questions(self.generate::<QuestionFormat>(text, options).await)
            }
            TransformationType::Quiz => {
                GeneratedContent::Quiz(self.generate::<QuizFormat>(text, options).await)
            }
        }
    }

    pub async fn generate<F: StudyFormat>(
        &self,
        text: &str,
        options: &GenerationOptions,
    ) -> F::Output {
        match self.generate_with_model::<F>(text, options).await {
            Ok(output) => {
                info!(kind = %F::KIND, "Generated study material with the model");
                output
            }
            Err(e) => {
                warn!(kind = %F::KIND, error = %e, "Model generation failed, using fallback");
                match F::fallback(text, options) {
                    Ok(output) => output,
                    Err(e) => {
                        error!(kind = %F::KIND, error = %e, "Fallback generation failed");
                        F::error_placeholder()
                    }
                }
            }
        }
    }

    async fn generate_with_model<F: StudyFormat>(
        &self,
        text: &str,
        options: &GenerationOptions,
    ) -> PortResult<F::Output> {
        let request = GenerationRequest {
            prompt: F::prompt(text, options),
            max_new_tokens: F::MAX_NEW_TOKENS,
            temperature: TEMPERATURE,
        };
        let raw = self.llm.generate_text(&request).await?;
        let value = extract_json_from_text(&raw)?;
        F::coerce(value, options)
    }
}
