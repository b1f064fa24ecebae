//! Error types for title resolution and recommendation.

use thiserror::Error;

/// Recoverable lookup failures; callers re-prompt instead of exiting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// Fuzzy resolution found nothing above the acceptance threshold
    #[error("No close match found for '{input}'")]
    NoMatch { input: String },

    /// The exact title is not in the catalog
    #[error("Title '{title}' is not in the dataset")]
    NotFound { title: String },

    /// Catalog and similarity matrix were built from different data
    #[error("Catalog has {catalog} rows but similarity matrix has {matrix}")]
    DimensionMismatch { catalog: usize, matrix: usize },
}

pub type Result<T> = std::result::Result<T, RecommendError>;
