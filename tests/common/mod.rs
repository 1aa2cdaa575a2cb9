//! Shared helpers for integration tests: fixtures and in-memory fetchers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hdfilmizle::{AddonConfig, CatalogService, PageFetcher, Result, ScrapeError};

pub const BASE: &str = "https://www.hdfilmizle.to";

pub const LISTING_MOVIES: &str = include_str!("../fixtures/listing_movies.html");
pub const LISTING_SERIES: &str = include_str!("../fixtures/listing_series.html");
pub const DETAIL_MOVIE: &str = include_str!("../fixtures/detail_movie.html");
pub const DETAIL_BARE: &str = include_str!("../fixtures/detail_bare.html");

/// Serves canned pages by exact URL and records every request.
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::FetchFailed {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// Never answers.
pub struct PendingFetcher;

#[async_trait]
impl PageFetcher for PendingFetcher {
    async fn fetch_page(&self, _url: &str) -> Result<String> {
        std::future::pending().await
    }
}

pub fn service_with(fetcher: Arc<dyn PageFetcher>, config: AddonConfig) -> CatalogService {
    CatalogService::new(config, fetcher)
}

pub fn short_timeout_config() -> AddonConfig {
    AddonConfig {
        request_timeout: Duration::from_millis(50),
        ..AddonConfig::default()
    }
}

/// A listing page with `count` movie cards titled `Film 0`, `Film 1`, ...
pub fn numbered_listing(count: usize) -> String {
    let cards: String = (0..count)
        .map(|i| {
            format!(r#"<div class="movie-card"><a href="/film/film-{i}/">Film {i}</a></div>"#)
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}
