//! The immutable recommender index.
//!
//! Bundles a catalog with the matrices derived from it. Built once at
//! startup, then shared read-only (typically behind an `Arc`) by every
//! resolution and recommendation call. A catalog reload means building a new
//! index; nothing is invalidated in place.

use crate::error::Result;
use crate::recommend::{self, Recommendation};
use crate::resolver::{TitleMatch, TitleResolver};
use data_loader::Catalog;
use similarity::{SimilarityEngine, SimilarityMatrix, TermDocumentMatrix};

#[derive(Debug, Clone)]
pub struct RecommenderIndex {
    catalog: Catalog,
    feature_fields: Vec<String>,
    term_matrix: TermDocumentMatrix,
    similarity: SimilarityMatrix,
}

impl RecommenderIndex {
    /// Vectorize the catalog and compute all pairwise similarities
    pub fn build(catalog: Catalog, feature_fields: &[String]) -> Self {
        let engine = SimilarityEngine::new(feature_fields.iter().cloned());
        let (term_matrix, similarity) = engine.build(&catalog);
        Self {
            catalog,
            feature_fields: feature_fields.to_vec(),
            term_matrix,
            similarity,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Attribute names used as feature text; empty means title only
    pub fn feature_fields(&self) -> &[String] {
        &self.feature_fields
    }

    pub fn term_matrix(&self) -> &TermDocumentMatrix {
        &self.term_matrix
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Top `n` titles similar to the exact title `title`
    pub fn recommend(&self, title: &str, n: usize) -> Result<Vec<Recommendation>> {
        recommend::recommend(title, &self.catalog, &self.similarity, n)
    }

    /// Fuzzy-resolve user input against this index's titles
    pub fn resolve(&self, resolver: &TitleResolver, input: &str) -> Result<TitleMatch> {
        resolver.resolve_or_err(&self.catalog, input)
    }
}
