//! Catalog loading from a dataset file.

use crate::error::Result;
use crate::parser;
use crate::types::{Catalog, CatalogSchema};
use std::path::Path;
use std::time::Instant;
use tracing::info;

impl Catalog {
    /// Load the whole dataset into a Catalog
    ///
    /// This is the main entry point for loading data. It fails only when the
    /// file cannot be read or the title column is absent; rows with missing
    /// descriptive fields are kept as they are.
    pub fn load_from_file(path: &Path, schema: &CatalogSchema) -> Result<Self> {
        let start = Instant::now();
        info!("Loading movie catalog from {:?}", path);

        let movies = parser::parse_movies(path, schema)?;
        let catalog = Catalog::from_movies(movies);

        info!(
            "Loaded {} movies ({} distinct titles) in {:.2?}",
            catalog.len(),
            catalog.distinct_titles().len(),
            start.elapsed()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_dataset() {
        let file = write_dataset(
            "Movie_Title,genres\nInception,Sci-Fi\nInterstellar,Sci-Fi\nTitanic,Romance\n",
        );
        let catalog = Catalog::load_from_file(file.path(), &CatalogSchema::default()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.position_of("Titanic"), Some(2));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load_from_file(
            Path::new("does/not/exist.csv"),
            &CatalogSchema::default(),
        );
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
