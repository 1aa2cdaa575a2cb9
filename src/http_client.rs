//! Page fetching.
//!
//! [`PageFetcher`] is the seam between the service and the network. The
//! production implementation is [`HttpFetcher`], a `reqwest` client that
//! carries the configured request headers and follows redirects. The
//! service wraps every call in its own timeout, so fetchers do not need to
//! enforce one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::AddonConfig;
use crate::error::{Result, ScrapeError};

/// Source of raw page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the body as text.
    ///
    /// Fails with [`ScrapeError::FetchFailed`] on a non-success status.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher backed by a pooled `reqwest` client.
pub struct HttpFetcher {
    client: Client,
    ceiling: Duration,
}

impl HttpFetcher {
    /// Build a client with the configured headers.
    pub fn new(config: &AddonConfig) -> Result<Self> {
        // Hard ceiling; the service applies the configured timeout on top.
        let ceiling = config.request_timeout + Duration::from_secs(5);
        let client = Client::builder()
            .default_headers(config.headers.to_headers())
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(ceiling)
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, ceiling })
    }

    fn transport(&self, url: &str, source: reqwest::Error) -> ScrapeError {
        if source.is_timeout() {
            return ScrapeError::FetchTimeout {
                url: url.to_string(),
                timeout: self.ceiling,
            };
        }
        ScrapeError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| self.transport(url, source))?;

        let status = response.status();
        info!(
            status = %status,
            version = ?response.version(),
            content_encoding = ?response.headers().get("content-encoding"),
            "Response received"
        );

        if !status.is_success() {
            return Err(ScrapeError::FetchFailed {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| self.transport(url, source))
    }
}
