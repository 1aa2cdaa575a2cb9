//! Catalog, meta and stream operations.
//!
//! [`CatalogService`] ties a [`PageFetcher`] to the extractors. Each operation
//! issues at most one fetch, bounded by the configured request timeout. The
//! `list_*`/`get_*` operations return errors; the handler contracts
//! ([`CatalogService::catalog`], [`CatalogService::meta`],
//! [`CatalogService::streams`]) never fail and degrade to empty results.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::AddonConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_detail, extract_listing, extract_stream_links};
use crate::http_client::PageFetcher;
use crate::ident::parse_content_id;
use crate::model::{ContentCard, ContentKind, ContentRef, StreamLink};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogResponse {
    pub items: Vec<ContentCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaResponse {
    pub item: Option<ContentCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreamsResponse {
    pub items: Vec<StreamLink>,
}

/// Scraping service over one source site.
#[derive(Clone)]
pub struct CatalogService {
    config: Arc<AddonConfig>,
    fetcher: Arc<dyn PageFetcher>,
}

impl CatalogService {
    pub fn new(config: AddonConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AddonConfig {
        &self.config
    }

    /// Listing URL for a kind, or the site search when a term is given.
    #[must_use]
    pub fn catalog_url(&self, kind: ContentKind, search: Option<&str>) -> String {
        let base = &self.config.base_url;
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => format!("{base}/?s={}", urlencoding::encode(term)),
            None => match kind {
                ContentKind::Movie => base.clone(),
                ContentKind::Series => format!("{base}/dizi"),
            },
        }
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let limit = self.config.request_timeout;
        tokio::time::timeout(limit, self.fetcher.fetch_page(url))
            .await
            .unwrap_or_else(|_| {
                Err(ScrapeError::FetchTimeout {
                    url: url.to_string(),
                    timeout: limit,
                })
            })
    }

    /// Cards of `kind` from the listing (or search) page, title-filtered by
    /// `search` and capped at `max_catalog_items`.
    #[instrument(skip(self))]
    pub async fn list_catalog(
        &self,
        kind: ContentKind,
        search: Option<&str>,
    ) -> Result<Vec<ContentCard>> {
        let url = self.catalog_url(kind, search);
        let html = self.fetch(&url).await?;

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let cards: Vec<ContentCard> =
            extract_listing(&html, kind, &self.config.base_url, self.config.merge_order)
                .into_iter()
                .filter(|card| card.kind == kind)
                .filter(|card| {
                    needle
                        .as_deref()
                        .map_or(true, |n| card.title.to_lowercase().contains(n))
                })
                .take(self.config.max_catalog_items)
                .collect();

        info!(count = cards.len(), "Catalog listed");
        Ok(cards)
    }

    /// Full record for one identifier.
    #[instrument(skip(self))]
    pub async fn get_detail(&self, kind: ContentKind, id: &str) -> Result<ContentCard> {
        let target = resolve(kind, id)?;
        let html = self.fetch(&target.source_url).await?;
        Ok(extract_detail(
            &html,
            kind,
            &target.source_url,
            &self.config.base_url,
        ))
    }

    /// Candidate stream links for one identifier.
    #[instrument(skip(self))]
    pub async fn list_streams(&self, kind: ContentKind, id: &str) -> Result<Vec<StreamLink>> {
        let target = resolve(kind, id)?;
        let html = self.fetch(&target.source_url).await?;
        let links = extract_stream_links(&html, &self.config.base_url);
        info!(count = links.len(), "Streams listed");
        Ok(links)
    }

    pub async fn catalog(&self, kind: ContentKind, search: Option<&str>) -> CatalogResponse {
        match self.list_catalog(kind, search).await {
            Ok(items) => CatalogResponse { items },
            Err(err) => {
                warn!(%kind, error = %err, "Catalog request failed");
                CatalogResponse::default()
            }
        }
    }

    pub async fn meta(&self, kind: ContentKind, id: &str) -> MetaResponse {
        match self.get_detail(kind, id).await {
            Ok(item) => MetaResponse { item: Some(item) },
            Err(err) => {
                warn!(%kind, id, error = %err, "Meta request failed");
                MetaResponse::default()
            }
        }
    }

    pub async fn streams(&self, kind: ContentKind, id: &str) -> StreamsResponse {
        match self.list_streams(kind, id).await {
            Ok(items) => StreamsResponse { items },
            Err(err) => {
                warn!(%kind, id, error = %err, "Stream request failed");
                StreamsResponse::default()
            }
        }
    }
}

/// Decode `id` and check it names content of the requested kind.
fn resolve(kind: ContentKind, id: &str) -> Result<ContentRef> {
    let target = parse_content_id(id)?;
    if target.kind != kind {
        return Err(ScrapeError::invalid_id(id, "kind does not match request"));
    }
    Ok(target)
}
