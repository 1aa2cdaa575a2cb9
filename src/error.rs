//! Error types for fetching, decoding and extraction.
//!
//! Only fetch and identifier failures ever reach the service boundary.
//! Extraction gaps are resolved with fallbacks inside the extractors, and
//! [`ScrapeError::MalformedStructuredData`] is always recovered where it is
//! raised.

use std::time::Duration;

use thiserror::Error;

/// Scraper errors
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request timed out after {timeout:?}: {url}")]
    FetchTimeout { url: String, timeout: Duration },

    #[error("source returned {status}: {url}")]
    FetchFailed {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed structured data block: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),

    #[error("invalid content identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: &'static str },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ScrapeError {
    pub(crate) fn invalid_id(id: &str, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            id: id.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
