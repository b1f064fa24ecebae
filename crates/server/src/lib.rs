//! Server crate for the movie-recs recommendation engine.
//!
//! This crate contains the orchestrator that ties title resolution,
//! ranking and metadata enrichment together.

pub mod orchestrator;

pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator, RecommendationReport};
