//! services/api/src/adapters/memory_store.rs
//!
//! The server-side transformation store: a map held in process memory.
//! Nothing survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use study_transform_core::domain::{Transformation, TransformationUpdate};
use study_transform_core::ports::{PortError, PortResult, TransformationStore};
use tokio::sync::RwLock;

/// An in-memory adapter that implements the `TransformationStore` port.
#[derive(Default)]
pub struct InMemoryTransformationStore {
    transformations: RwLock<HashMap<String, Transformation>>,
}

impl InMemoryTransformationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &str) -> PortError {
    PortError::NotFound(format!("Transformation {} not found", id))
}

#[async_trait]
impl TransformationStore for InMemoryTransformationStore {
    async fn list_transformations(&self) -> PortResult<Vec<Transformation>> {
        let mut transformations: Vec<Transformation> =
            self.transformations.read().await.values().cloned().collect();
        transformations.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(transformations)
    }

    async fn get_transformation(&self, id: &str) -> PortResult<Transformation> {
        self.transformations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Stores the record under its id, replacing any record with the same id.
    async fn create_transformation(
        &self,
        transformation: Transformation,
    ) -> PortResult<Transformation> {
        self.transformations
            .write()
            .await
            .insert(transformation.id.clone(), transformation.clone());
        Ok(transformation)
    }

    async fn update_transformation(
        &self,
        id: &str,
        update: TransformationUpdate,
    ) -> PortResult<Transformation> {
        let mut transformations = self.transformations.write().await;
        let existing = transformations.get_mut(id).ok_or_else(|| not_found(id))?;
        update.apply_to(existing);
        Ok(existing.clone())
    }

    async fn delete_transformation(&self, id: &str) -> PortResult<()> {
        self.transformations
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
