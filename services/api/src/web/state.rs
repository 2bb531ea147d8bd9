//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use study_transform_core::ports::{TextGenerationService, TransformationStore};
use study_transform_core::StudyMaterialGenerator;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransformationStore>,
    pub generator: StudyMaterialGenerator,
    pub ids: Arc<TimestampIds>,
}

impl AppState {
    pub fn new(store: Arc<dyn TransformationStore>, llm: Arc<dyn TextGenerationService>) -> Self {
        Self {
            store,
            generator: StudyMaterialGenerator::new(llm),
            ids: Arc::new(TimestampIds::default()),
        }
    }
}

//=========================================================================================
// Transformation Ids
//=========================================================================================

/// Hands out transformation ids derived from the creation time in
/// milliseconds. Ids are strictly increasing, so two requests landing in the
/// same millisecond don't overwrite each other.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    pub fn next_id(&self, created_at: DateTime<Utc>) -> String {
        let millis = created_at.timestamp_millis();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = millis.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}
