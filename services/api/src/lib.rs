//! services/api/src/lib.rs
//!
//! The HTTP service around the study-material generator: configuration,
//! adapters for the ports defined in `study_transform_core`, and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
