use crate::error::{MetadataError, Result};
use crate::types::{DisplayMetadata, MovieMetadata, SearchResponse, TitleResponse};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRIES: u32 = 1;

/// Pause between attempts of the same request
const RETRY_PAUSE: Duration = Duration::from_millis(200);

/// Connection settings for the metadata provider.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound for a single request, connect included
    pub timeout: Duration,
    /// Extra attempts after a transport failure
    pub retries: u32,
    /// Fall back to a search when the exact title is unknown
    pub search_fallback: bool,
}

impl MetadataConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            search_fallback: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_search_fallback(mut self, enabled: bool) -> Self {
        self.search_fallback = enabled;
        self
    }
}

/// Client for an OMDb-compatible metadata API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: HttpClient,
    config: MetadataConfig,
}

impl MetadataClient {
    pub fn new(config: MetadataConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        info!(
            "Metadata client ready for {} (timeout {:?}, retries {})",
            config.base_url, config.timeout, config.retries
        );
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Look up metadata for `title`.
    ///
    /// Tries an exact title lookup first. If the provider does not know the
    /// title and search fallback is enabled, searches for it and looks up the
    /// first hit's exact title instead.
    pub async fn fetch(&self, title: &str) -> Result<MovieMetadata> {
        if self.config.api_key.trim().is_empty() {
            return Err(MetadataError::MissingApiKey);
        }

        match self.lookup(title).await {
            Err(MetadataError::NotFound { .. }) if self.config.search_fallback => {
                let found = self.search_first(title).await?;
                debug!("Search for '{}' suggested '{}'", title, found);
                self.lookup(&found).await
            }
            other => other,
        }
    }

    /// Like [`fetch`](Self::fetch), but never fails: any error is logged and
    /// replaced by the placeholder record.
    pub async fn fetch_or_placeholder(&self, title: &str) -> DisplayMetadata {
        match self.fetch(title).await {
            Ok(metadata) => metadata.normalize(),
            Err(e) => {
                warn!("Metadata unavailable for '{}': {}", title, e);
                DisplayMetadata::placeholder()
            }
        }
    }

    async fn lookup(&self, title: &str) -> Result<MovieMetadata> {
        let response: TitleResponse = self.get_json(&[("t", title)]).await?;
        if !response.found() {
            return Err(not_found(title, response.error));
        }
        Ok(response.into())
    }

    async fn search_first(&self, title: &str) -> Result<String> {
        let response: SearchResponse = self.get_json(&[("s", title)]).await?;
        if !response.response.eq_ignore_ascii_case("true") {
            return Err(not_found(title, response.error));
        }
        response
            .search
            .into_iter()
            .next()
            .map(|hit| hit.title)
            .ok_or_else(|| not_found(title, None))
    }

    /// GET `base_url` with `params` plus the API key, retrying transport
    /// failures up to the configured count.
    async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.get_once(params).await {
                Err(e) if e.is_retryable() && attempt < self.config.retries => {
                    attempt += 1;
                    warn!(
                        "Metadata request failed ({}), retry {}/{}",
                        e, attempt, self.config.retries
                    );
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let timeout = self.config.timeout;
        let response = self
            .http
            .get(&self.config.base_url)
            .query(params)
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MetadataError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MetadataError::from_reqwest(e, timeout))
    }
}

fn not_found(title: &str, reason: Option<String>) -> MetadataError {
    MetadataError::NotFound {
        title: title.to_string(),
        reason: reason.unwrap_or_else(|| "no result".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MetadataConfig::new("key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retries, 1);
        assert!(config.search_fallback);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = MetadataClient::new(MetadataConfig::new("  ")).unwrap();

        assert!(matches!(
            client.fetch("Heat").await,
            Err(MetadataError::MissingApiKey)
        ));
        assert!(client.fetch_or_placeholder("Heat").await.is_placeholder());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(MetadataError::Status { status: 503 }.is_retryable());
        assert!(!MetadataError::Status { status: 401 }.is_retryable());
        assert!(MetadataError::Timeout(DEFAULT_TIMEOUT).is_retryable());
        assert!(!not_found("Heat", None).is_retryable());
        assert!(!MetadataError::InvalidResponse("expected value".to_string()).is_retryable());
    }
}
