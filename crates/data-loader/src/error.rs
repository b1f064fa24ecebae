//! Error types for the data-loader crate.
//!
//! Only a missing title column is treated as a dataset problem. Everything
//! else about a row (short rows, empty cells, duplicate titles) is accepted.

use thiserror::Error;

/// Errors that can occur while loading a movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited reader rejected the input
    #[error("Malformed dataset {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    ///
    /// This is fatal: callers must stop instead of working with a partial
    /// catalog.
    #[error("Dataset {file} must have a column named '{column}'")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
