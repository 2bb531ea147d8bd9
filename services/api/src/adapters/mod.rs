pub mod inference;
pub mod memory_store;

pub use inference::OpenAiInferenceAdapter;
pub use memory_store::InMemoryTransformationStore;
