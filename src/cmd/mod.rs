pub mod query;
pub mod serve;

use std::sync::Arc;

use anyhow::Result;

use hdfilmizle::{AddonConfig, CatalogService, HttpFetcher};

/// Service wired to the live site using environment configuration.
pub fn live_service() -> Result<CatalogService> {
    service_for(AddonConfig::from_env())
}

pub fn service_for(config: AddonConfig) -> Result<CatalogService> {
    let fetcher = HttpFetcher::new(&config)?;
    Ok(CatalogService::new(config, Arc::new(fetcher)))
}
