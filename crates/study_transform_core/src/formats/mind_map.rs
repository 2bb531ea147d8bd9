//! Mind map: a root topic with sub-topic nodes laid out in 2D.

use serde_json::Value;
use std::f64::consts::PI;
use tracing::warn;

use super::{non_empty, value_as_text, StudyFormat};
use crate::domain::{
    sentinel, GenerationOptions, MindMap, MindMapEdge, MindMapNode, Position, TransformationType,
};
use crate::ports::PortResult;
use crate::text::{first_words, sentences};

const PROMPT_TEMPLATE: &str = r#"Create a mind map from this text. Format as JSON with "nodes" array (each with "id", "text", "parentId", "position" with x/y coordinates) and "edges" array (each with "id", "source", "target").

Text: {text}

Example format:
{
  "nodes": [
    {
      "id": "root",
      "text": "Main Topic",
      "parentId": null,
      "position": {"x": 0, "y": 0}
    },
    {
      "id": "subtopic1",
      "text": "Subtopic 1",
      "parentId": "root",
      "position": {"x": -100, "y": 100}
    }
  ],
  "edges": [
    {
      "id": "edge1",
      "source": "root",
      "target": "subtopic1"
    }
  ]
}"#;

const ROOT_ID: &str = "root";
const MAX_BRANCHES: usize = 5;
const BRANCH_RADIUS: f64 = 150.0;
/// Grid used for model nodes that came without a position.
const GRID_COLUMNS: usize = 5;
const GRID_SPACING: f64 = 100.0;

pub struct MindMapFormat;

impl StudyFormat for MindMapFormat {
    type Output = MindMap;

    const KIND: TransformationType = TransformationType::MindMap;
    const MAX_NEW_TOKENS: u32 = 2048;

    fn prompt(text: &str, _options: &GenerationOptions) -> String {
        PROMPT_TEMPLATE.replace("{text}", text)
    }

    fn coerce(value: Value, _options: &GenerationOptions) -> PortResult<Self::Output> {
        let nodes = match value.get("nodes") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, node)| MindMapNode {
                    id: node
                        .get("id")
                        .and_then(value_as_text)
                        .unwrap_or_else(|| format!("node-{}", index)),
                    text: node
                        .get("text")
                        .and_then(value_as_text)
                        .unwrap_or_else(|| format!("Node {}", index)),
                    parent_id: node.get("parentId").and_then(value_as_text),
                    position: node
                        .get("position")
                        .and_then(read_position)
                        .unwrap_or_else(|| grid_position(index)),
                })
                .collect(),
            _ => Vec::new(),
        };

        // Edges without both endpoints can't be drawn.
        let edges = match value.get("edges") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, edge)| {
                    Some(MindMapEdge {
                        id: edge
                            .get("id")
                            .and_then(value_as_text)
                            .unwrap_or_else(|| format!("edge-{}", index)),
                        source: edge.get("source").and_then(value_as_text)?,
                        target: edge.get("target").and_then(value_as_text)?,
                    })
                })
                .collect(),
            _ => Vec::new(),
        };

        let map = MindMap {
            nodes: non_empty(nodes, "mind map nodes")?,
            edges,
        };
        let issues = map.integrity_issues();
        if !issues.is_empty() {
            warn!(?issues, "Model mind map is not a well-formed tree; keeping it as-is");
        }
        Ok(map)
    }

    /// A root labelled with the subject and one branch per leading sentence,
    /// spread evenly on a circle around it.
    fn fallback(text: &str, options: &GenerationOptions) -> PortResult<Self::Output> {
        let branches: Vec<&str> = sentences(text).into_iter().take(MAX_BRANCHES).collect();
        let count = branches.len() as f64;

        let mut nodes = vec![MindMapNode {
            id: ROOT_ID.to_string(),
            text: options.subject_or("Main Topic").to_string(),
            parent_id: None,
            position: Position { x: 0.0, y: 0.0 },
        }];
        let mut edges = Vec::with_capacity(branches.len());

        for (index, sentence) in branches.iter().enumerate() {
            let angle = 2.0 * PI * index as f64 / count;
            let node_id = format!("node-{}", index);
            nodes.push(MindMapNode {
                id: node_id.clone(),
                text: format!("{}...", first_words(sentence, 3)),
                parent_id: Some(ROOT_ID.to_string()),
                position: Position {
                    x: BRANCH_RADIUS * angle.cos(),
                    y: BRANCH_RADIUS * angle.sin(),
                },
            });
            edges.push(MindMapEdge {
                id: format!("edge-{}", index),
                source: ROOT_ID.to_string(),
                target: node_id,
            });
        }

        Ok(MindMap { nodes, edges })
    }

    fn error_placeholder() -> Self::Output {
        MindMap {
            nodes: vec![
                MindMapNode {
                    id: ROOT_ID.to_string(),
                    text: sentinel::MIND_MAP_ROOT.to_string(),
                    parent_id: None,
                    position: Position { x: 0.0, y: 0.0 },
                },
                MindMapNode {
                    id: "error".to_string(),
                    text: sentinel::MIND_MAP.to_string(),
                    parent_id: Some(ROOT_ID.to_string()),
                    position: Position { x: 0.0, y: 100.0 },
                },
            ],
            edges: vec![MindMapEdge {
                id: "edge1".to_string(),
                source: ROOT_ID.to_string(),
                target: "error".to_string(),
            }],
        }
    }
}

fn read_position(value: &Value) -> Option<Position> {
    Some(Position {
        x: value.get("x")?.as_f64()?,
        y: value.get("y")?.as_f64()?,
    })
}

fn grid_position(index: usize) -> Position {
    Position {
        x: GRID_SPACING * (index % GRID_COLUMNS) as f64,
        y: GRID_SPACING * (index / GRID_COLUMNS) as f64,
    }
}
