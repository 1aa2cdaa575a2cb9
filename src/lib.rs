//! `hdfilmizle` - catalog, meta and stream addon over hdfilmizle.to
//!
//! # Features
//!
//! - **Listing extraction**: JSON-LD blocks merged with listing card markup
//! - **Detail pages**: structured data first, markup fallbacks, placeholders
//! - **Stream discovery**: iframes, `<video>` sources, player links, script URLs
//! - **Reversible identifiers**: source URLs travel inside the content id
//! - **Addon surface**: manifest and resource routes over `axum`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hdfilmizle::{AddonConfig, CatalogService, ContentKind, HttpFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AddonConfig::from_env();
//!     let fetcher = HttpFetcher::new(&config)?;
//!     let service = CatalogService::new(config, Arc::new(fetcher));
//!     let catalog = service.catalog(ContentKind::Movie, Some("matrix")).await;
//!     println!("Found {} items", catalog.items.len());
//!     Ok(())
//! }
//! ```

pub mod addon;
pub mod config;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod ident;
pub mod model;
pub mod service;

pub use config::{AddonConfig, MergeOrder, RequestHeaders};
pub use error::{Result, ScrapeError};
pub use http_client::{HttpFetcher, PageFetcher};
pub use ident::{build_content_id, parse_content_id};
pub use model::{ContentCard, ContentKind, ContentRef, StreamLink};
pub use service::{CatalogResponse, CatalogService, MetaResponse, StreamsResponse};

/// Version of hdfilmizle
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
