//! Title resolution and content-based recommendation.
//!
//! This crate provides:
//! - [`TitleResolver`] for typo-tolerant lookup of user input
//! - [`recommend`] for ranking the titles most similar to a known title
//! - [`RecommenderIndex`], the immutable bundle of catalog and matrices both
//!   operate on
//!
//! ## Example Usage
//! ```ignore
//! use recommender::{RecommenderIndex, TitleResolver};
//!
//! let index = RecommenderIndex::build(catalog, &["genres".to_string()]);
//! let resolver = TitleResolver::default();
//!
//! let found = index.resolve(&resolver, "Inceptoin")?;
//! for rec in index.recommend(&found.title, 5)? {
//!     println!("{}. {} ({:.2})", rec.rank, rec.title, rec.score);
//! }
//! ```

pub mod error;
pub mod traits;
pub mod fuzzy;
pub mod resolver;
pub mod recommend;
pub mod index;

// Re-export main types
pub use error::{RecommendError, Result};
pub use fuzzy::{LevenshteinRatio, WeightedRatio};
pub use index::RecommenderIndex;
pub use recommend::{recommend, Recommendation, DEFAULT_LIMIT};
pub use resolver::{resolve, ThresholdMode, TitleMatch, TitleResolver, DEFAULT_THRESHOLD};
pub use traits::Scorer;
