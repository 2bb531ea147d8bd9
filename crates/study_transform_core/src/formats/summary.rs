//! Summary: an ordered list of key points.

use serde_json::Value;

use super::{non_empty, value_as_text, StudyFormat};
use crate::domain::{sentinel, GenerationOptions, Summary, TransformationType};
use crate::ports::{PortError, PortResult};
use crate::text::sentences;

const PROMPT_TEMPLATE: &str = r#"Summarize the following text into key points. Format as JSON with a "points" array containing bullet points.

Text: {text}

Example format:
{
  "points": [
    "First key point about the text",
    "Second key point about the text",
    "Third key point about the text"
  ]
}"#;

const FILLER_POINT: &str =
    "The text covers important concepts and information related to the subject.";

pub struct SummaryFormat;

impl StudyFormat for SummaryFormat {
    type Output = Summary;

    const KIND: TransformationType = TransformationType::Summary;

    fn prompt(text: &str, _options: &GenerationOptions) -> String {
        PROMPT_TEMPLATE.replace("{text}", text)
    }

    fn coerce(value: Value, _options: &GenerationOptions) -> PortResult<Self::Output> {
        let points = match value.get("points") {
            Some(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
            _ => return Err(PortError::InvalidOutput("Invalid summary format".to_string())),
        };
        Ok(Summary {
            points: non_empty(points, "summary points")?,
        })
    }

    /// First sentence as the intro, the middle one, and the last as the conclusion.
    fn fallback(text: &str, _options: &GenerationOptions) -> PortResult<Self::Output> {
        let sentences = sentences(text);
        let mut points = Vec::with_capacity(3);

        if let Some(first) = sentences.first() {
            points.push(first.to_string());
        }
        if sentences.len() >= 3 {
            points.push(sentences[sentences.len() / 2].to_string());
        }
        if sentences.len() > 1 {
            if let Some(last) = sentences.last() {
                points.push(last.to_string());
            }
        }
        if points.len() < 3 {
            points.push(FILLER_POINT.to_string());
        }

        Ok(Summary { points })
    }

    fn error_placeholder() -> Self::Output {
        Summary {
            points: vec![sentinel::SUMMARY.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fallback(text: &str) -> Vec<String> {
        SummaryFormat::fallback(text, &GenerationOptions::default())
            .unwrap()
            .points
    }

    #[test]
    fn coerce_keeps_text_points() {
        let value = json!({"points": ["Cells divide", 7, null, ""]});
        let summary = SummaryFormat::coerce(value, &GenerationOptions::default()).unwrap();
        assert_eq!(summary.points, vec!["Cells divide", "7"]);
    }

    #[test]
    fn coerce_rejects_wrong_shape_and_empty_points() {
        for value in [
            json!(["bare", "array"]),
            json!({"points": "one"}),
            json!({"points": []}),
            json!({"points": [null, ""]}),
        ] {
            assert!(SummaryFormat::coerce(value, &GenerationOptions::default()).is_err());
        }
    }

    #[test]
    fn fallback_picks_first_middle_and_last_of_three() {
        let points = fallback("Atoms have a nucleus. Electrons orbit it! Protons are positive?");
        assert_eq!(
            points,
            vec![
                "Atoms have a nucleus",
                "Electrons orbit it",
                "Protons are positive"
            ]
        );
    }

    #[test]
    fn fallback_picks_middle_of_longer_text() {
        let points = fallback("One. Two. Three. Four. Five.");
        assert_eq!(points, vec!["One", "Three", "Five"]);
    }

    #[test]
    fn fallback_pads_short_text_with_filler() {
        assert_eq!(
            fallback("First idea. Second idea."),
            vec!["First idea", "Second idea", FILLER_POINT]
        );
        assert_eq!(
            fallback("Only a single sentence here"),
            vec!["Only a single sentence here", FILLER_POINT]
        );
        assert_eq!(fallback("..........."), vec![FILLER_POINT]);
    }

    #[test]
    fn prompt_embeds_text() {
        let prompt = SummaryFormat::prompt("Gravity pulls.", &GenerationOptions::default());
        assert!(prompt.contains("Text: Gravity pulls."));
        assert!(prompt.contains("\"points\""));
    }
}
