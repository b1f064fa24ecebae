//! All-pairs cosine similarity over a term-document matrix.

use crate::vectorizer::{SparseRow, TermDocumentMatrix};
use rayon::prelude::*;

/// Dense square matrix of cosine similarities, row-major.
///
/// Invariants: symmetric bit-for-bit, every cell in `[0, 1]`, diagonal 1 for
/// documents with at least one term and 0 for empty ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute every pairwise similarity, one row per rayon task
    pub fn from_term_matrix(matrix: &TermDocumentMatrix) -> Self {
        let rows = matrix.rows();
        let dim = rows.len();
        let norms: Vec<f64> = rows.iter().map(|row| norm(row)).collect();

        let mut values = vec![0.0_f32; dim * dim];
        values
            .par_chunks_mut(dim.max(1))
            .enumerate()
            .for_each(|(i, out)| {
                for (j, cell) in out.iter_mut().enumerate() {
                    *cell = if i == j {
                        if norms[i] > 0.0 { 1.0 } else { 0.0 }
                    } else {
                        cosine(&rows[i], &rows[j], norms[i], norms[j])
                    };
                }
            });

        Self { dim, values }
    }

    /// Number of rows (and columns)
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.dim && j < self.dim {
            Some(self.values[i * self.dim + j])
        } else {
            None
        }
    }

    /// Similarities of row `i` against every row, including itself
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        if i < self.dim {
            Some(&self.values[i * self.dim..(i + 1) * self.dim])
        } else {
            None
        }
    }
}

fn norm(row: &SparseRow) -> f64 {
    let sum: u64 = row.iter().map(|&(_, c)| u64::from(c) * u64::from(c)).sum();
    (sum as f64).sqrt()
}

/// Exact integer dot product of two sorted sparse rows
fn dot(a: &SparseRow, b: &SparseRow) -> u64 {
    let (mut i, mut j, mut acc) = (0, 0, 0_u64);
    while i < a.len() && j < b.len() {
        let (ta, ca) = a[i];
        let (tb, cb) = b[j];
        match ta.cmp(&tb) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += u64::from(ca) * u64::from(cb);
                i += 1;
                j += 1;
            }
        }
    }
    acc
}

/// Cosine similarity, 0 when either vector is all zeros
fn cosine(a: &SparseRow, b: &SparseRow, norm_a: f64, norm_b: f64) -> f32 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }
    (dot(a, b) as f64 / denom).clamp(0.0, 1.0) as f32
}
