//! crates/study_transform_core/src/extract.rs
//!
//! Pulls a JSON document out of free-form model output.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::ports::{PortError, PortResult};

static RE_CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?|\n?```").unwrap());

/// Extracts the JSON payload from a model response.
///
/// Markdown code fences are stripped, then the text is sliced from the first
/// `[` or `{` through the last closer of the same kind and parsed.
pub fn extract_json_from_text(text: &str) -> PortResult<Value> {
    let cleaned = RE_CODE_FENCE.replace_all(text, "");
    let cleaned = cleaned.trim();

    let start = cleaned
        .find(|c: char| c == '[' || c == '{')
        .ok_or_else(|| PortError::InvalidOutput("No valid JSON found in response".to_string()))?;
    let closer = if cleaned[start..].starts_with('[') { ']' } else { '}' };
    let end = cleaned
        .rfind(closer)
        .filter(|end| *end > start)
        .ok_or_else(|| PortError::InvalidOutput("No valid JSON found in response".to_string()))?;

    Ok(serde_json::from_str(&cleaned[start..=end])?)
}
