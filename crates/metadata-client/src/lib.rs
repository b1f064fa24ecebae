//! Client for an OMDb-compatible movie metadata API.
//!
//! Fetches rating, genre, plot and poster for a title over HTTP/JSON. Each
//! request is bounded by a timeout and retried a configurable number of
//! times. Enrichment is optional: [`MetadataClient::fetch_or_placeholder`]
//! turns every failure into a placeholder record so callers can always show
//! something.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MetadataClient, MetadataConfig, DEFAULT_BASE_URL, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
pub use error::{MetadataError, Result};
pub use types::{DisplayMetadata, MovieMetadata, NOT_AVAILABLE};
