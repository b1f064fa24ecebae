//! Similarity engine: catalog in, similarity matrix out.
//!
//! ## Algorithm
//! 1. Build feature text per movie by joining the configured fields with a
//!    single space (title alone when no fields are configured)
//! 2. Vectorize all feature texts into raw term counts
//! 3. Compute cosine similarity for every pair of rows

use crate::cosine::SimilarityMatrix;
use crate::vectorizer::TermDocumentMatrix;
use data_loader::{Catalog, Movie};
use std::time::Instant;
use tracing::{info, instrument};

/// Builds term-document and similarity matrices for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarityEngine {
    /// Attribute names joined into feature text, in order
    fields: Vec<String>,
}

impl SimilarityEngine {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Engine that describes every movie by its title only
    pub fn title_only() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Feature text for one movie; missing fields contribute empty text
    pub fn feature_text(&self, movie: &Movie) -> String {
        if self.fields.is_empty() {
            return movie.title.clone();
        }
        self.fields
            .iter()
            .map(|field| movie.attribute(field))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build both matrices for the catalog
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn build(&self, catalog: &Catalog) -> (TermDocumentMatrix, SimilarityMatrix) {
        let start = Instant::now();

        let documents: Vec<String> = catalog
            .movies()
            .iter()
            .map(|movie| self.feature_text(movie))
            .collect();

        let term_matrix = TermDocumentMatrix::from_documents(&documents);
        let similarity = SimilarityMatrix::from_term_matrix(&term_matrix);

        let (docs, terms) = term_matrix.shape();
        info!(
            "Built {}x{} similarity matrix over {} terms in {:.2?}",
            docs,
            docs,
            terms,
            start.elapsed()
        );
        (term_matrix, similarity)
    }
}

/// Build the similarity matrix for `catalog` using `fields` as feature text
pub fn build(catalog: &Catalog, fields: &[String]) -> SimilarityMatrix {
    SimilarityEngine::new(fields.iter().cloned()).build(catalog).1
}
