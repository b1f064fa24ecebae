//! Ranking similar titles for a resolved title.

use crate::error::{RecommendError, Result};
use data_loader::{Catalog, RowIndex};
use serde::{Deserialize, Serialize};
use similarity::SimilarityMatrix;
use std::cmp::Ordering;

/// Default number of recommendations
pub const DEFAULT_LIMIT: usize = 5;

/// One ranked result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the ranking
    pub rank: usize,
    pub row: RowIndex,
    pub title: String,
    pub score: f32,
}

/// Top `n` titles most similar to `title`.
///
/// ## Algorithm
/// 1. Find the first row whose title equals `title` exactly
/// 2. Pair that row's similarities with row indices
/// 3. Stable sort by score descending, so ties keep row order
/// 4. Drop the query row itself and keep the next `n`
///
/// Other rows sharing the query's title are kept; they are different rows.
pub fn recommend(
    title: &str,
    catalog: &Catalog,
    similarity: &SimilarityMatrix,
    n: usize,
) -> Result<Vec<Recommendation>> {
    if catalog.len() != similarity.dim() {
        return Err(RecommendError::DimensionMismatch {
            catalog: catalog.len(),
            matrix: similarity.dim(),
        });
    }

    let query_row = catalog
        .position_of(title)
        .ok_or_else(|| RecommendError::NotFound {
            title: title.to_string(),
        })?;

    // Dimensions were checked above
    let scores = similarity.row(query_row).unwrap_or(&[]);

    let mut ranked: Vec<(RowIndex, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(row, _)| row != query_row)
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(n);

    let recommendations = ranked
        .into_iter()
        .enumerate()
        .filter_map(|(i, (row, score))| {
            let movie = catalog.get(row)?;
            Some(Recommendation {
                rank: i + 1,
                row,
                title: movie.title.clone(),
                score,
            })
        })
        .collect();

    Ok(recommendations)
}
