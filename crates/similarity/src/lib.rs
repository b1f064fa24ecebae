//! # Similarity Crate
//!
//! Content-based similarity between movies of a catalog.
//!
//! ## Components
//!
//! ### Vectorizer
//! Bag-of-words encoding of each movie's feature text:
//! - lowercase word tokens of two or more characters
//! - English stop words removed
//! - raw counts over a shared, sorted vocabulary (no TF-IDF weighting)
//!
//! ### Cosine
//! Dense all-pairs cosine similarity over the count vectors, computed once
//! per catalog load with rayon.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::SimilarityEngine;
//!
//! let engine = SimilarityEngine::new(["genres", "keywords", "cast", "director"]);
//! let (terms, sim) = engine.build(&catalog);
//!
//! let row = sim.row(catalog.position_of("Avatar").unwrap()).unwrap();
//! ```

pub mod stop_words;
pub mod vectorizer;
pub mod cosine;
pub mod engine;

// Re-export commonly used types
pub use cosine::SimilarityMatrix;
pub use engine::{build, SimilarityEngine};
pub use stop_words::is_stop_word;
pub use vectorizer::{tokenize, TermDocumentMatrix, TermId};
