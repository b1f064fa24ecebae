use std::time::Duration;
use thiserror::Error;

/// Failures talking to the metadata provider.
///
/// Every variant is recoverable: callers that only need something to show
/// use [`crate::MetadataClient::fetch_or_placeholder`] instead.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A success status with a body that is not the expected JSON
    #[error("Invalid response from metadata provider: {0}")]
    InvalidResponse(String),

    #[error("Metadata provider returned status {status}")]
    Status { status: u16 },

    #[error("Metadata request timed out after {0:?}")]
    Timeout(Duration),

    #[error("No metadata for '{title}': {reason}")]
    NotFound { title: String, reason: String },

    #[error("No API key configured for the metadata provider")]
    MissingApiKey,
}

impl MetadataError {
    /// Transport-level failures are worth another attempt. A definite
    /// "not found", an unreadable body or a missing key is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MetadataError::Http(_) | MetadataError::Timeout(_) => true,
            MetadataError::Status { status } => *status >= 500 || *status == 429,
            MetadataError::InvalidResponse(_)
            | MetadataError::NotFound { .. }
            | MetadataError::MissingApiKey => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            MetadataError::Timeout(timeout)
        } else if err.is_decode() {
            MetadataError::InvalidResponse(err.to_string())
        } else {
            MetadataError::Http(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
