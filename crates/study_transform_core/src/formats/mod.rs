//! crates/study_transform_core/src/formats/mod.rs
//!
//! One `StudyFormat` per transformation type. A format owns everything that
//! differs between the types: the prompt, the decoding budget, how raw model
//! JSON is coerced into the typed output, the deterministic fallback, and the
//! placeholder returned on total failure.

use serde_json::Value;

use crate::domain::{GenerationOptions, TransformationType};
use crate::ports::{PortError, PortResult};

pub mod flashcards;
pub mod mind_map;
pub mod questions;
pub mod quiz;
pub mod summary;

pub use flashcards::FlashcardFormat;
pub use mind_map::MindMapFormat;
pub use questions::QuestionFormat;
pub use quiz::QuizFormat;
pub use summary::SummaryFormat;

/// Sampling temperature used for every format.
pub const TEMPERATURE: f32 = 0.7;

pub trait StudyFormat {
    type Output: Send;

    const KIND: TransformationType;
    const MAX_NEW_TOKENS: u32 = 1024;

    /// The prompt sent to the model, embedding `text` verbatim.
    fn prompt(text: &str, options: &GenerationOptions) -> String;

    /// Turns extracted JSON into the output, filling missing fields with
    /// placeholders. Fails only when the top-level shape is wrong or nothing
    /// usable is left.
    fn coerce(value: Value, options: &GenerationOptions) -> PortResult<Self::Output>;

    /// Builds the output from the source text alone.
    fn fallback(text: &str, options: &GenerationOptions) -> PortResult<Self::Output>;

    /// The sentinel output returned when both the model and the fallback failed.
    fn error_placeholder() -> Self::Output;
}

//=========================================================================================
// Coercion Helpers
//=========================================================================================

/// Reads `key` from a model-produced object as text. Empty or missing values
/// become `placeholder`; numbers and booleans are rendered as text.
pub(crate) fn text_field(item: &Value, key: &str, placeholder: &str) -> String {
    item.get(key)
        .and_then(value_as_text)
        .unwrap_or_else(|| placeholder.to_string())
}

pub(crate) fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn into_array(value: Value, what: &str) -> PortResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(PortError::InvalidOutput(format!("Expected a JSON array of {}", what))),
    }
}

pub(crate) fn non_empty<T>(items: Vec<T>, what: &str) -> PortResult<Vec<T>> {
    if items.is_empty() {
        Err(PortError::InvalidOutput(format!("Model returned no {}", what)))
    } else {
        Ok(items)
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
