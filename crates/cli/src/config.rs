use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde::Deserialize;

use data_loader::{CatalogSchema, DEFAULT_TITLE_COLUMN};
use metadata_client::MetadataConfig;
use recommender::{ThresholdMode, TitleResolver, DEFAULT_LIMIT, DEFAULT_THRESHOLD};

/// Prefix of every environment variable read into [`Config`]
pub const ENV_PREFIX: &str = "MOVIE_RECS_";

/// Application configuration loaded from `MOVIE_RECS_*` environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Delimited dataset file with a header row
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    #[serde(default = "default_title_column")]
    pub title_column: String,

    /// Columns joined into feature text; empty means title only
    #[serde(default)]
    pub feature_columns: Vec<String>,

    /// Single character, or `tab`
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Number of recommendations per request
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Fuzzy match acceptance threshold, 0-100
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,

    /// `at_least` or `greater_than`
    #[serde(default = "default_threshold_mode")]
    pub threshold_mode: String,

    /// Metadata enrichment is disabled when absent
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    #[serde(default = "default_omdb_timeout_secs")]
    pub omdb_timeout_secs: u64,

    #[serde(default = "default_omdb_retries")]
    pub omdb_retries: u32,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/movies.csv")
}

fn default_title_column() -> String {
    DEFAULT_TITLE_COLUMN.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_top_n() -> usize {
    DEFAULT_LIMIT
}

fn default_match_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_threshold_mode() -> String {
    ThresholdMode::default().to_string()
}

fn default_omdb_api_url() -> String {
    metadata_client::DEFAULT_BASE_URL.to_string()
}

fn default_omdb_timeout_secs() -> u64 {
    metadata_client::DEFAULT_TIMEOUT.as_secs()
}

fn default_omdb_retries() -> u32 {
    metadata_client::DEFAULT_RETRIES
}

impl Config {
    /// Load configuration from the environment, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `(name, value)` pairs
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    /// Command-line flags win over environment values
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.dataset {
            self.dataset_path = path;
        }
        if let Some(column) = overrides.title_column {
            self.title_column = column;
        }
        if let Some(columns) = overrides.feature_columns {
            self.feature_columns = columns;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(threshold) = overrides.threshold {
            self.match_threshold = threshold;
        }
        if let Some(mode) = overrides.threshold_mode {
            self.threshold_mode = mode.to_string();
        }
        if overrides.no_metadata {
            self.omdb_api_key = None;
        }
    }

    /// Feature columns with blanks removed
    pub fn feature_fields(&self) -> Vec<String> {
        self.feature_columns
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn schema(&self) -> Result<CatalogSchema> {
        Ok(CatalogSchema::new(self.title_column.clone())
            .with_delimiter(self.delimiter_byte()?)
            .with_feature_columns(self.feature_fields()))
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_str() {
            "tab" | "\\t" | "\t" => Ok(b'\t'),
            d if d.len() == 1 => Ok(d.as_bytes()[0]),
            d => bail!("Delimiter must be a single ASCII character or 'tab', got '{}'", d),
        }
    }

    pub fn resolver(&self) -> Result<TitleResolver> {
        let mode: ThresholdMode = self
            .threshold_mode
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("Invalid MOVIE_RECS_THRESHOLD_MODE")?;
        if self.match_threshold > 100 {
            bail!("Match threshold must be between 0 and 100, got {}", self.match_threshold);
        }
        Ok(TitleResolver::new(self.match_threshold, mode))
    }

    /// Provider settings, or `None` when no API key is configured
    pub fn metadata(&self) -> Option<MetadataConfig> {
        let key = self.omdb_api_key.as_deref()?.trim();
        if key.is_empty() {
            return None;
        }
        Some(
            MetadataConfig::new(key)
                .with_base_url(self.omdb_api_url.clone())
                .with_timeout(Duration::from_secs(self.omdb_timeout_secs))
                .with_retries(self.omdb_retries),
        )
    }
}

/// Global flags that override environment configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Path to the delimited dataset file
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Name of the title column
    #[arg(long, global = true)]
    pub title_column: Option<String>,

    /// Comma-separated columns used as feature text
    #[arg(long, global = true, value_delimiter = ',')]
    pub feature_columns: Option<Vec<String>>,

    /// Field delimiter (single character or `tab`)
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    /// Fuzzy match threshold, 0-100
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub threshold: Option<u8>,

    /// How the match score is compared with the threshold
    #[arg(long, global = true)]
    pub threshold_mode: Option<ThresholdMode>,

    /// Skip metadata enrichment
    #[arg(long, global = true)]
    pub no_metadata: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert_eq!(config.title_column, "Movie_Title");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.match_threshold, 60);
        assert!(config.feature_fields().is_empty());
        assert!(config.metadata().is_none());
        assert_eq!(config.resolver().unwrap().mode(), ThresholdMode::AtLeast);
    }

    #[test]
    fn test_prefixed_variables() {
        let config = Config::from_vars(vars(&[
            ("MOVIE_RECS_DATASET_PATH", "/tmp/movies.tsv"),
            ("MOVIE_RECS_FEATURE_COLUMNS", "genres,keywords,director"),
            ("MOVIE_RECS_DELIMITER", "tab"),
            ("MOVIE_RECS_MATCH_THRESHOLD", "75"),
            ("MOVIE_RECS_THRESHOLD_MODE", "greater_than"),
            ("MOVIE_RECS_OMDB_API_KEY", "abc123"),
            ("MOVIE_RECS_OMDB_RETRIES", "3"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.dataset_path, PathBuf::from("/tmp/movies.tsv"));
        assert_eq!(config.feature_fields(), vec!["genres", "keywords", "director"]);
        assert_eq!(config.schema().unwrap().delimiter, b'\t');

        let resolver = config.resolver().unwrap();
        assert_eq!(resolver.threshold(), 75);
        assert_eq!(resolver.mode(), ThresholdMode::GreaterThan);

        let metadata = config.metadata().unwrap();
        assert_eq!(metadata.api_key, "abc123");
        assert_eq!(metadata.retries, 3);
        assert_eq!(metadata.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides_win() {
        let mut config =
            Config::from_vars(vars(&[("MOVIE_RECS_OMDB_API_KEY", "abc123"), ("MOVIE_RECS_DELIMITER", ";")])).unwrap();

        config.apply(ConfigOverrides {
            delimiter: Some(",".to_string()),
            threshold: Some(80),
            threshold_mode: Some(ThresholdMode::GreaterThan),
            no_metadata: true,
            ..Default::default()
        });

        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.match_threshold, 80);
        assert_eq!(config.threshold_mode, "greater_than");
        assert!(config.metadata().is_none());
    }

    #[test]
    fn test_invalid_values() {
        let config = Config::from_vars(vars(&[
            ("MOVIE_RECS_DELIMITER", "::"),
            ("MOVIE_RECS_THRESHOLD_MODE", "sometimes"),
        ]))
        .unwrap();

        assert!(config.schema().is_err());
        assert!(config.resolver().is_err());
        assert!(Config::from_vars(vars(&[("MOVIE_RECS_TOP_N", "many")])).is_err());
    }

    #[test]
    fn test_blank_api_key_disables_metadata() {
        let config = Config::from_vars(vars(&[("MOVIE_RECS_OMDB_API_KEY", "  ")])).unwrap();
        assert!(config.metadata().is_none());
    }
}
