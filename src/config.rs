//! Addon configuration.
//!
//! Every knob is an environment variable with a default, read once at
//! startup into an immutable [`AddonConfig`] that is handed to the service.
//!
//! | Variable | Default |
//! |---|---|
//! | `HDFILMIZLE_BASE_URL` | `https://www.hdfilmizle.to` |
//! | `REQUEST_TIMEOUT_MS` | `15000` |
//! | `MAX_CATALOG_ITEMS` | `80` |
//! | `HTTP_USER_AGENT` | desktop Chrome |
//! | `HTTP_ACCEPT_LANGUAGE` | Turkish first, English second |
//! | `HTTP_REFERER` | the base URL |
//! | `MERGE_ORDER` | `structured-first` |
//! | `ADDON_ID` / `ADDON_NAME` | `org.hdfilmizle.scraper` / `HDfilmizle Scraper` |
//! | `PORT` / `BASE_ENDPOINT` | `7000` / `http://127.0.0.1:<PORT>` |

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://www.hdfilmizle.to";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_CATALOG_ITEMS: usize = 80;
pub const DEFAULT_PORT: u16 = 7000;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7";

/// Which extractor's records win when both describe the same source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeOrder {
    /// JSON-LD records are taken first, listing cards fill the gaps.
    #[default]
    StructuredDataFirst,
    /// Listing cards are taken first, JSON-LD fills the gaps.
    CardsFirst,
}

impl FromStr for MergeOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured-first" | "structured" => Ok(Self::StructuredDataFirst),
            "cards-first" | "cards" => Ok(Self::CardsFirst),
            other => Err(format!("unknown merge order: {other}")),
        }
    }
}

/// Headers sent with every outbound page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,
}

impl RequestHeaders {
    fn defaults_for(base_url: &str) -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            referer: base_url.to_string(),
        }
    }

    /// Render as a header map. Values that are not valid header text are
    /// dropped with a warning instead of failing client construction.
    #[must_use]
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs: [(HeaderName, &str); 4] = [
            (USER_AGENT, self.user_agent.as_str()),
            (ACCEPT, self.accept.as_str()),
            (ACCEPT_LANGUAGE, self.accept_language.as_str()),
            (REFERER, self.referer.as_str()),
        ];

        for (name, value) in pairs {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => warn!(header = %name, "Skipping invalid header value"),
            }
        }

        headers
    }
}

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct AddonConfig {
    /// Site root without trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub max_catalog_items: usize,
    pub headers: RequestHeaders,
    pub merge_order: MergeOrder,
    pub addon_id: String,
    pub addon_name: String,
    pub port: u16,
    /// Public address announced in the startup log.
    pub base_endpoint: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AddonConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = get("HDFILMIZLE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_ms = parse_or(
            get("REQUEST_TIMEOUT_MS"),
            "REQUEST_TIMEOUT_MS",
            DEFAULT_TIMEOUT_MS,
        );
        let max_catalog_items = parse_or(
            get("MAX_CATALOG_ITEMS"),
            "MAX_CATALOG_ITEMS",
            DEFAULT_MAX_CATALOG_ITEMS,
        );
        let merge_order = parse_or(get("MERGE_ORDER"), "MERGE_ORDER", MergeOrder::default());
        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT);

        let mut headers = RequestHeaders::defaults_for(&base_url);
        if let Some(ua) = get("HTTP_USER_AGENT") {
            headers.user_agent = ua;
        }
        if let Some(lang) = get("HTTP_ACCEPT_LANGUAGE") {
            headers.accept_language = lang;
        }
        if let Some(referer) = get("HTTP_REFERER") {
            headers.referer = referer;
        }

        Self {
            base_url,
            request_timeout: Duration::from_millis(timeout_ms),
            max_catalog_items,
            headers,
            merge_order,
            addon_id: get("ADDON_ID").unwrap_or_else(|| "org.hdfilmizle.scraper".to_string()),
            addon_name: get("ADDON_NAME").unwrap_or_else(|| "HDfilmizle Scraper".to_string()),
            port,
            base_endpoint: get("BASE_ENDPOINT").unwrap_or_else(|| local_endpoint(port)),
        }
    }

    /// Override the listen port. A derived endpoint follows the new port; an
    /// explicit `BASE_ENDPOINT` is kept.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        if self.base_endpoint == local_endpoint(self.port) {
            self.base_endpoint = local_endpoint(port);
        }
        self.port = port;
        self
    }
}

fn local_endpoint(port: u16) -> String {
    format!("http://127.0.0.1:{port}")
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(key, value = %value, "Ignoring unparseable setting, using default");
            default
        }),
    }
}
