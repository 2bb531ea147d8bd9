//! crates/study_transform_core/src/domain.rs
//!
//! Defines the core data structures for the application: the stored
//! transformation record and the five kinds of generated study material.
//! The JSON shapes produced here are the wire format of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Number of items generated when the options don't ask for a specific count.
pub const DEFAULT_ITEM_COUNT: usize = 5;
/// Upper bound for `numberOfCards` / `numberOfQuestions`.
pub const MAX_ITEM_COUNT: usize = 20;

/// Texts of the placeholder entities returned when both the model and the
/// fallback heuristic failed.
pub mod sentinel {
    pub const FLASHCARDS: &str = "Error generating flashcards";
    pub const SUMMARY: &str =
        "Error generating summary. Please try again with different text or options.";
    pub const MIND_MAP_ROOT: &str = "Error";
    pub const MIND_MAP: &str = "Failed to generate mind map";
    pub const QUESTIONS: &str = "Error generating questions";
    pub const QUIZ: &str = "Error generating quiz";
    pub const RETRY_HINT: &str = "Please try again with different text or options.";
}

//=========================================================================================
// Transformation Type
//=========================================================================================

/// The kind of study material a transformation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationType {
    Flashcards,
    Summary,
    MindMap,
    Questions,
    Quiz,
}

impl TransformationType {
    pub const ALL: [TransformationType; 5] = [
        TransformationType::Flashcards,
        TransformationType::Summary,
        TransformationType::MindMap,
        TransformationType::Questions,
        TransformationType::Quiz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationType::Flashcards => "flashcards",
            TransformationType::Summary => "summary",
            TransformationType::MindMap => "mindmap",
            TransformationType::Questions => "questions",
            TransformationType::Quiz => "quiz",
        }
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown transformation type '{0}'")]
pub struct UnknownTransformationType(pub String);

impl FromStr for TransformationType {
    type Err = UnknownTransformationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTransformationType(s.to_string()))
    }
}

//=========================================================================================
// Transformation Record
//=========================================================================================

/// A persisted record of one transform request and its generated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub id: String,
    pub title: String,
    /// The source text the material was generated from.
    pub text: String,
    #[serde(rename = "type")]
    pub kind: TransformationType,
    pub subject: String,
    pub content_type: String,
    /// The generated material, serialized to JSON.
    pub content: String,
    pub options: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Transformation {
    /// Parses `content` back into the typed material for `kind`.
    pub fn parsed_content(&self) -> serde_json::Result<GeneratedContent> {
        GeneratedContent::from_json(self.kind, &self.content)
    }
}

/// A partial update of a stored transformation. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationUpdate {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content_type: Option<String>,
    pub options: Option<Map<String, Value>>,
}

impl TransformationUpdate {
    pub fn apply_to(self, transformation: &mut Transformation) {
        if let Some(title) = self.title {
            transformation.title = title;
        }
        if let Some(subject) = self.subject {
            transformation.subject = subject;
        }
        if let Some(content_type) = self.content_type {
            transformation.content_type = content_type;
        }
        if let Some(options) = self.options {
            transformation.options = options;
        }
    }
}

//=========================================================================================
// Generated Study Material
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub points: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapNode {
    pub id: String,
    pub text: String,
    pub parent_id: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub nodes: Vec<MindMapNode>,
    pub edges: Vec<MindMapEdge>,
}

impl MindMap {
    /// Lists violations of the tree shape: exactly one root, and every parent
    /// id and edge endpoint naming an existing node. Nothing here rejects a map.
    pub fn integrity_issues(&self) -> Vec<String> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut issues = Vec::new();

        let roots = self.nodes.iter().filter(|n| n.parent_id.is_none()).count();
        if roots != 1 {
            issues.push(format!("expected exactly one root node, found {}", roots));
        }

        for node in &self.nodes {
            if let Some(parent) = &node.parent_id {
                if !ids.contains(parent.as_str()) {
                    issues.push(format!(
                        "node '{}' references missing parent '{}'",
                        node.id, parent
                    ));
                }
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint.as_str()) {
                    issues.push(format!(
                        "edge '{}' references missing node '{}'",
                        edge.id, endpoint
                    ));
                }
            }
        }

        issues
    }
}

/// A practice question with a free-form answer (ungraded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// The output of one transformation, whichever type it was.
///
/// Serializes to the bare JSON shape of the inner value (an array for
/// flashcards and questions, an object otherwise), so the type has to be
/// known to parse it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedContent {
    Flashcards(Vec<Flashcard>),
    Summary(Summary),
    MindMap(MindMap),
    Questions(Vec<Question>),
    Quiz(Quiz),
}

impl GeneratedContent {
    pub fn kind(&self) -> TransformationType {
        match self {
            GeneratedContent::Flashcards(_) => TransformationType::Flashcards,
            GeneratedContent::Summary(_) => TransformationType::Summary,
            GeneratedContent::MindMap(_) => TransformationType::MindMap,
            GeneratedContent::Questions(_) => TransformationType::Questions,
            GeneratedContent::Quiz(_) => TransformationType::Quiz,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_json(kind: TransformationType, json: &str) -> serde_json::Result<Self> {
        Ok(match kind {
            TransformationType::Flashcards => {
                GeneratedContent::Flashcards(serde_json::from_str(json)?)
            }
            TransformationType::Summary => GeneratedContent::Summary(serde_json::from_str(json)?),
            TransformationType::MindMap => GeneratedContent::MindMap(serde_json::from_str(json)?),
            TransformationType::Questions => {
                GeneratedContent::Questions(serde_json::from_str(json)?)
            }
            TransformationType::Quiz => GeneratedContent::Quiz(serde_json::from_str(json)?),
        })
    }

    /// True when this is the placeholder returned after a total generation failure.
    /// Degraded output is delivered as content, so this is the only way to tell.
    pub fn is_error_placeholder(&self) -> bool {
        match self {
            GeneratedContent::Flashcards(cards) => {
                matches!(cards.as_slice(), [card] if card.question == sentinel::FLASHCARDS)
            }
            GeneratedContent::Summary(summary) => {
                matches!(summary.points.as_slice(), [point] if point == sentinel::SUMMARY)
            }
            GeneratedContent::MindMap(map) => matches!(
                map.nodes.as_slice(),
                [root, child]
                    if root.text == sentinel::MIND_MAP_ROOT && child.text == sentinel::MIND_MAP
            ),
            GeneratedContent::Questions(questions) => {
                matches!(questions.as_slice(), [q] if q.question == sentinel::QUESTIONS)
            }
            GeneratedContent::Quiz(quiz) => {
                matches!(quiz.questions.as_slice(), [q] if q.question == sentinel::QUIZ)
            }
        }
    }
}

//=========================================================================================
// Generation Options
//=========================================================================================

/// The typed view of a request's free-form options map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub number_of_cards: Option<usize>,
    pub number_of_questions: Option<usize>,
    pub subject: Option<String>,
}

impl GenerationOptions {
    /// Reads the known keys out of an options map. Unknown keys and values of
    /// the wrong type are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            number_of_cards: positive_count(map.get("numberOfCards")),
            number_of_questions: positive_count(map.get("numberOfQuestions")),
            subject: non_empty_string(map.get("subject")),
        }
    }

    /// Uses `subject` when the options didn't name one.
    pub fn with_default_subject(mut self, subject: &str) -> Self {
        if self.subject.is_none() && !subject.trim().is_empty() {
            self.subject = Some(subject.to_string());
        }
        self
    }

    pub fn card_count(&self) -> usize {
        self.number_of_cards
            .unwrap_or(DEFAULT_ITEM_COUNT)
            .min(MAX_ITEM_COUNT)
    }

    pub fn question_count(&self) -> usize {
        self.number_of_questions
            .unwrap_or(DEFAULT_ITEM_COUNT)
            .min(MAX_ITEM_COUNT)
    }

    pub fn subject_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.subject.as_deref().unwrap_or(default)
    }
}

fn positive_count(value: Option<&Value>) -> Option<usize> {
    let count = match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (count > 0).then_some(count as usize)
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, parent: Option<&str>) -> MindMapNode {
        MindMapNode {
            id: id.to_string(),
            text: id.to_string(),
            parent_id: parent.map(str::to_string),
            position: Position { x: 0.0, y: 0.0 },
        }
    }

    #[test]
    fn transformation_type_round_trips_through_strings() {
        for kind in TransformationType::ALL {
            assert_eq!(kind.as_str().parse::<TransformationType>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                Value::String(kind.to_string())
            );
        }
        assert_eq!(
            "mind-map".parse::<TransformationType>(),
            Err(UnknownTransformationType("mind-map".to_string()))
        );
    }

    #[test]
    fn transformation_uses_camel_case_field_names() {
        let transformation = Transformation {
            id: "1700000000000".to_string(),
            title: "biology summary".to_string(),
            text: "Cells are the basic unit of life.".to_string(),
            kind: TransformationType::Summary,
            subject: "biology".to_string(),
            content_type: "notes".to_string(),
            content: r#"{"points":["a"]}"#.to_string(),
            options: Map::new(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&transformation).unwrap();
        assert_eq!(value["type"], "summary");
        assert_eq!(value["contentType"], "notes");
        assert!(value.get("createdAt").is_some());

        let back: Transformation = serde_json::from_value(value).unwrap();
        assert_eq!(back, transformation);
        assert_eq!(
            back.parsed_content().unwrap(),
            GeneratedContent::Summary(Summary {
                points: vec!["a".to_string()]
            })
        );
    }

    #[test]
    fn update_only_touches_present_fields() {
        let mut transformation = Transformation {
            id: "1".to_string(),
            title: "old".to_string(),
            text: "text".to_string(),
            kind: TransformationType::Quiz,
            subject: "history".to_string(),
            content_type: "notes".to_string(),
            content: "{}".to_string(),
            options: Map::new(),
            created_at: Utc::now(),
        };

        TransformationUpdate {
            title: Some("new".to_string()),
            ..Default::default()
        }
        .apply_to(&mut transformation);

        assert_eq!(transformation.title, "new");
        assert_eq!(transformation.subject, "history");
    }

    #[test]
    fn content_serializes_to_bare_shapes() {
        let cards = GeneratedContent::Flashcards(vec![Flashcard {
            id: "c1".to_string(),
            question: "Q".to_string(),
            answer: "A".to_string(),
        }]);
        assert!(cards.to_value().unwrap().is_array());

        let quiz = GeneratedContent::Quiz(Quiz {
            questions: vec![QuizQuestion {
                id: "q1".to_string(),
                question: "Q".to_string(),
                answers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer_index: 2,
            }],
        });
        let value = quiz.to_value().unwrap();
        assert_eq!(value["questions"][0]["correctAnswerIndex"], 2);

        let json = quiz.to_json().unwrap();
        assert_eq!(
            GeneratedContent::from_json(TransformationType::Quiz, &json).unwrap(),
            quiz
        );
    }

    #[test]
    fn mind_map_parent_id_serializes_as_null() {
        let map = MindMap {
            nodes: vec![node("root", None)],
            edges: vec![],
        };
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["nodes"][0]["parentId"], Value::Null);
    }

    #[test]
    fn integrity_issues_reports_dangling_references() {
        let healthy = MindMap {
            nodes: vec![node("root", None), node("a", Some("root"))],
            edges: vec![MindMapEdge {
                id: "e".to_string(),
                source: "root".to_string(),
                target: "a".to_string(),
            }],
        };
        assert!(healthy.integrity_issues().is_empty());

        let broken = MindMap {
            nodes: vec![node("root", None), node("b", None), node("c", Some("ghost"))],
            edges: vec![MindMapEdge {
                id: "e".to_string(),
                source: "root".to_string(),
                target: "nowhere".to_string(),
            }],
        };
        let issues = broken.integrity_issues();
        assert_eq!(issues.len(), 3);
        assert!(issues[0].contains("found 2"));
        assert!(issues[1].contains("ghost"));
        assert!(issues[2].contains("nowhere"));
    }

    #[test]
    fn options_read_known_keys_leniently() {
        let map = json!({
            "numberOfCards": 8,
            "numberOfQuestions": "3",
            "subject": "  ",
            "layout": "radial",
            "unrelated": true
        });
        let options = GenerationOptions::from_map(map.as_object().unwrap());

        assert_eq!(
            options,
            GenerationOptions {
                number_of_cards: Some(8),
                number_of_questions: Some(3),
                subject: None,
            }
        );
    }

    #[test]
    fn options_fall_back_to_defaults_and_clamp() {
        let map = json!({ "numberOfCards": 0, "numberOfQuestions": 500 });
        let options = GenerationOptions::from_map(map.as_object().unwrap());

        assert_eq!(options.card_count(), DEFAULT_ITEM_COUNT);
        assert_eq!(options.question_count(), MAX_ITEM_COUNT);
        assert_eq!(options.subject_or("the subject"), "the subject");

        let options = options.with_default_subject("chemistry");
        assert_eq!(options.subject_or("the subject"), "chemistry");

        let explicit = GenerationOptions {
            subject: Some("physics".to_string()),
            ..Default::default()
        }
        .with_default_subject("chemistry");
        assert_eq!(explicit.subject.as_deref(), Some("physics"));
    }
}
