//! # Data Loader Crate
//!
//! This crate loads a tabular movie dataset into an ordered, in-memory
//! [`Catalog`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Catalog, CatalogSchema)
//! - **parser**: Parse delimited files with a header row into movies
//! - **loader**: `Catalog::load_from_file`, the main entry point
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, CatalogSchema};
//! use std::path::Path;
//!
//! let schema = CatalogSchema::new("title").with_feature_columns(["genres", "keywords"]);
//! let catalog = Catalog::load_from_file(Path::new("data/movies.csv"), &schema)?;
//!
//! let row = catalog.position_of("Inception").unwrap();
//! println!("{}", catalog.get(row).unwrap().attribute("genres"));
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod loader;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Catalog, CatalogSchema, Movie, RowIndex, DEFAULT_TITLE_COLUMN};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();

        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_push_movie() {
        let mut catalog = Catalog::new();

        let row = catalog.push(Movie::new("Toy Story").with_attribute("genres", "Animation"));

        assert_eq!(row, 0);
        let retrieved = catalog.get(0).unwrap();
        assert_eq!(retrieved.title, "Toy Story");
        assert_eq!(retrieved.attribute("genres"), "Animation");
        assert_eq!(retrieved.attribute("cast"), "");
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let catalog = Catalog::from_movies(vec![
            Movie::new("Heat"),
            Movie::new("Alien"),
            Movie::new("Heat"),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.position_of("Heat"), Some(0));
        assert_eq!(catalog.distinct_titles(), vec!["Heat", "Alien"]);
        assert_eq!(catalog.titles().collect::<Vec<_>>(), vec!["Heat", "Alien", "Heat"]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = Catalog::from_movies(vec![Movie::new("Inception")]);

        assert_eq!(catalog.position_of("Inception"), Some(0));
        assert!(catalog.position_of("inception").is_none());
        assert!(catalog.position_of("Inception ").is_none());
    }

    #[test]
    fn test_distinct_titles_skip_empty() {
        let catalog = Catalog::from_movies(vec![Movie::new(""), Movie::new("Up")]);

        assert_eq!(catalog.distinct_titles(), vec!["Up"]);
        assert_eq!(catalog.position_of(""), Some(0));
    }

    #[test]
    fn test_empty_queries() {
        let catalog = Catalog::new();

        assert!(catalog.get(0).is_none());
        assert!(catalog.position_of("anything").is_none());
        assert!(catalog.distinct_titles().is_empty());
    }
}
