//! Core traits for title resolution.
//!
//! A [`Scorer`] rates how close a user's input is to a known title. The
//! resolver only needs the number, so the metric can be swapped without
//! touching the selection and threshold logic.

/// Similarity metric on a 0-100 scale.
///
/// Both arguments are already normalized (see
/// [`crate::fuzzy::normalize`]) and non-empty.
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer (for logging/debugging)
    fn name(&self) -> &str;

    /// Score `choice` against `query`; 100 means identical
    fn score(&self, query: &str, choice: &str) -> u8;
}
