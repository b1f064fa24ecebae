//! Parser for delimited movie datasets.
//!
//! The file must start with a header row. The column named by
//! `CatalogSchema::title_column` is required; every column, the title
//! included, is also kept as a free-text attribute of the row.
//!
//! Cells are read as raw bytes and decoded lossily, since scraped movie
//! datasets are frequently not clean UTF-8.

use crate::error::{DataLoadError, Result};
use crate::types::{CatalogSchema, Movie};
use csv::{ByteRecord, ReaderBuilder};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

/// Parse a dataset file into movies, in file order
pub fn parse_movies(path: &Path, schema: &CatalogSchema) -> Result<Vec<Movie>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::Io(e),
    })?;

    parse_movies_from_reader(file, &path.display().to_string(), schema)
}

/// Parse a dataset from any reader.
///
/// `source_name` is only used in error messages.
pub fn parse_movies_from_reader<R: Read>(
    reader: R,
    source_name: &str,
    schema: &CatalogSchema,
) -> Result<Vec<Movie>> {
    let csv_error = |source: csv::Error| DataLoadError::Csv {
        file: source_name.to_string(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(schema.delimiter)
        .has_headers(true)
        // Short rows are fine, missing cells read as empty text
        .flexible(true)
        .from_reader(reader);

    let headers = decode_headers(reader.byte_headers().map_err(csv_error)?);
    debug!("Dataset {} has columns {:?}", source_name, headers);

    let title_pos = headers
        .iter()
        .position(|h| h == &schema.title_column)
        .ok_or_else(|| DataLoadError::MissingColumn {
            file: source_name.to_string(),
            column: schema.title_column.clone(),
        })?;

    for column in &schema.feature_columns {
        if !headers.iter().any(|h| h == column) {
            warn!(
                "Feature column '{}' not found in {}, treating it as empty text",
                column, source_name
            );
        }
    }

    let mut movies = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record).map_err(csv_error)? {
        movies.push(record_to_movie(&record, &headers, title_pos));
    }

    Ok(movies)
}

/// Decode the header row, dropping a leading byte-order mark
fn decode_headers(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = decode_cell(cell);
            if i == 0 {
                name.trim_start_matches(UTF8_BOM).to_string()
            } else {
                name
            }
        })
        .collect()
}

fn decode_cell(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Convert one row into a Movie.
///
/// Cells beyond the header width have no column name and are ignored.
fn record_to_movie(record: &ByteRecord, headers: &[String], title_pos: usize) -> Movie {
    let title = record.get(title_pos).map(decode_cell).unwrap_or_default();

    let attributes: HashMap<String, String> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, name)| record.get(i).map(|cell| (name.clone(), decode_cell(cell))))
        .collect();

    Movie { title, attributes }
}
