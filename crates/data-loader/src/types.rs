//! Core domain types for the movie catalog.
//!
//! The catalog is an ordered table: row order is the order of the source
//! file and stays stable for the lifetime of the process, so a row index is
//! a valid identifier for a movie everywhere downstream (matrix rows, ranked
//! results).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a movie in the catalog (0-based, insertion order)
pub type RowIndex = usize;

/// Column used for titles when nothing else is configured
pub const DEFAULT_TITLE_COLUMN: &str = "Movie_Title";

// =============================================================================
// Movie
// =============================================================================

/// A single row of the dataset.
///
/// Every column (the title column too) is kept in `attributes` under its
/// header name. Which of them feed the similarity engine is decided later by
/// configuration, so the loader does not need to know about genres, cast or
/// keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub attributes: HashMap<String, String>,
}

impl Movie {
    /// Create a movie with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            attributes: HashMap::new(),
        }
    }

    /// Attach a descriptive field (builder pattern)
    pub fn with_attribute(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(column.into(), value.into());
        self
    }

    /// Value of a descriptive field, empty when the row has none
    pub fn attribute(&self, column: &str) -> &str {
        self.attributes.get(column).map(String::as_str).unwrap_or("")
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Describes how a dataset file maps onto the catalog.
///
/// Dataset variants differ only in column names and in which free-text
/// columns describe a movie, so this is configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSchema {
    /// Header name of the required title column
    pub title_column: String,
    /// Field separator, `b','` for CSV or `b'\t'` for TSV
    pub delimiter: u8,
    /// Descriptive columns used to build feature text, in join order.
    /// Empty means the title alone describes a movie.
    pub feature_columns: Vec<String>,
}

impl CatalogSchema {
    pub fn new(title_column: impl Into<String>) -> Self {
        Self {
            title_column: title_column.into(),
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for CatalogSchema {
    fn default() -> Self {
        Self {
            title_column: DEFAULT_TITLE_COLUMN.to_string(),
            delimiter: b',',
            feature_columns: Vec::new(),
        }
    }
}

// =============================================================================
// Catalog - The In-Memory Table
// =============================================================================

/// All movies loaded from the dataset, in file order.
///
/// Titles are not required to be unique. `title_index` remembers the first
/// row for each title, which is the row every exact lookup resolves to.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) title_index: HashMap<String, RowIndex>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            title_index: HashMap::new(),
        }
    }

    /// Build a catalog from movies already in memory, keeping their order
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.push(movie);
        }
        catalog
    }

    /// Append a movie and return its row index
    pub fn push(&mut self, movie: Movie) -> RowIndex {
        let row = self.movies.len();
        // First occurrence wins for duplicate titles
        self.title_index.entry(movie.title.clone()).or_insert(row);
        self.movies.push(movie);
        row
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Get a movie by row index
    pub fn get(&self, row: RowIndex) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// All movies in row order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// First row whose title equals `title` exactly (case-sensitive)
    pub fn position_of(&self, title: &str) -> Option<RowIndex> {
        self.title_index.get(title).copied()
    }

    /// Titles in row order, duplicates included
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    /// Unique non-empty titles in order of first appearance
    pub fn distinct_titles(&self) -> Vec<&str> {
        self.movies
            .iter()
            .enumerate()
            .filter(|(row, movie)| {
                !movie.title.is_empty() && self.title_index.get(&movie.title) == Some(row)
            })
            .map(|(_, movie)| movie.title.as_str())
            .collect()
    }
}
