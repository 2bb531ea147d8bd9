pub mod domain;
pub mod extract;
pub mod formats;
pub mod pipeline;
pub mod ports;
mod text;

pub use domain::{
    Flashcard, GeneratedContent, GenerationOptions, MindMap, MindMapEdge, MindMapNode, Position,
    Question, Quiz, QuizQuestion, Summary, Transformation, TransformationType,
    TransformationUpdate,
};
pub use extract::extract_json_from_text;
pub use pipeline::StudyMaterialGenerator;
pub use ports::{
    GenerationRequest, PortError, PortResult, TextGenerationService, TransformationStore,
};
