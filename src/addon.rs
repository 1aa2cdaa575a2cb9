//! Addon HTTP surface: manifest, wire objects and routes.
//!
//! Routes follow the addon protocol's resource layout:
//!
//! - `GET /manifest.json`
//! - `GET /catalog/{type}/{catalogId}.json`
//! - `GET /catalog/{type}/{catalogId}/{extra}.json`
//! - `GET /meta/{type}/{id}.json`
//! - `GET /stream/{type}/{id}.json`
//!
//! Every resource answers `200` with an empty payload on bad input or
//! upstream failure.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{OriginalUri, Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ident::ID_NAMESPACE;
use crate::model::{ContentCard, ContentKind, StreamLink};
use crate::service::CatalogService;

pub const MOVIE_CATALOG_ID: &str = "hdfilmizle-movies";
pub const SERIES_CATALOG_ID: &str = "hdfilmizle-series";

const DESCRIPTION: &str =
    "hdfilmizle.to üzerinden film ve dizi katalogu + stream sağlayan community eklentisi.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: &'static str,
    pub name: String,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<CatalogEntry>,
    pub behavior_hints: ManifestHints,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: &'static str,
    pub name: &'static str,
    pub extra: Vec<ExtraField>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraField {
    pub name: &'static str,
    pub is_required: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

impl Manifest {
    #[must_use]
    pub fn new(addon_id: &str, addon_name: &str) -> Self {
        let catalog = |kind, id, name| CatalogEntry {
            kind,
            id,
            name,
            extra: vec![ExtraField {
                name: "search",
                is_required: false,
            }],
        };

        Self {
            id: addon_id.to_string(),
            version: crate::VERSION,
            name: addon_name.to_string(),
            description: DESCRIPTION,
            resources: vec!["catalog", "meta", "stream"],
            types: vec!["movie", "series"],
            id_prefixes: vec![id_prefix(ContentKind::Movie), id_prefix(ContentKind::Series)],
            catalogs: vec![
                catalog(ContentKind::Movie, MOVIE_CATALOG_ID, "HDfilmizle Filmler"),
                catalog(ContentKind::Series, SERIES_CATALOG_ID, "HDfilmizle Diziler"),
            ],
            behavior_hints: ManifestHints {
                configurable: false,
                configuration_required: false,
            },
        }
    }
}

/// Identifier prefix owned by this addon for a kind.
#[must_use]
pub fn id_prefix(kind: ContentKind) -> String {
    format!("{ID_NAMESPACE}:{kind}:")
}

/// Meta object as the addon protocol expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub name: String,
    pub poster: Option<String>,
    pub background: Option<String>,
    pub description: Option<String>,
    pub release_info: Option<String>,
    pub imdb_rating: Option<String>,
    pub genres: Vec<String>,
    pub behavior_hints: MetaHints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaHints {
    pub default_video_id: String,
    pub has_scheduled_videos: bool,
}

impl From<ContentCard> for MetaObject {
    fn from(card: ContentCard) -> Self {
        Self {
            id: card.identifier,
            kind: card.kind,
            name: card.title,
            poster: card.poster_url,
            background: card.background_url,
            description: card.synopsis,
            release_info: card.year.map(|y| y.to_string()),
            imdb_rating: card.rating,
            genres: card.genres,
            behavior_hints: MetaHints {
                default_video_id: card.source_url,
                has_scheduled_videos: false,
            },
        }
    }
}

/// Stream object as the addon protocol expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamObject {
    pub title: String,
    pub url: String,
    pub behavior_hints: StreamHints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamHints {
    pub not_web_ready: bool,
}

impl From<StreamLink> for StreamObject {
    fn from(link: StreamLink) -> Self {
        Self {
            title: format!("HDfilmizle • {}", link.label),
            url: link.url,
            behavior_hints: StreamHints {
                not_web_ready: false,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetasBody {
    pub metas: Vec<MetaObject>,
}

#[derive(Debug, Serialize)]
pub struct MetaBody {
    pub meta: Option<MetaObject>,
}

#[derive(Debug, Serialize)]
pub struct StreamsBody {
    pub streams: Vec<StreamObject>,
}

#[derive(Clone)]
struct AddonState {
    service: Arc<CatalogService>,
    manifest: Arc<Manifest>,
}

/// Build the addon router around a shared service.
pub fn router(service: Arc<CatalogService>) -> Router {
    let config = service.config();
    let manifest = Manifest::new(&config.addon_id, &config.addon_name);
    let state = AddonState {
        service,
        manifest: Arc::new(manifest),
    };

    Router::new()
        .route("/manifest.json", get(manifest_handler))
        .route("/catalog/:kind/:catalog", get(catalog_handler))
        .route("/catalog/:kind/:catalog/:extra", get(catalog_extra_handler))
        .route("/meta/:kind/:id", get(meta_handler))
        .route("/stream/:kind/:id", get(stream_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `port` on all interfaces and serve until the process exits.
pub async fn serve(service: Arc<CatalogService>, port: u16) -> anyhow::Result<()> {
    let endpoint = service.config().base_endpoint.clone();
    let source = service.config().base_url.clone();
    let name = service.config().addon_name.clone();
    let app = router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "{name} listening: {endpoint}/manifest.json");
    info!(source = %source, "Scraping source");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn manifest_handler(State(state): State<AddonState>) -> Json<Manifest> {
    Json(state.manifest.as_ref().clone())
}

async fn catalog_handler(
    State(state): State<AddonState>,
    Path((kind, catalog)): Path<(String, String)>,
) -> Json<MetasBody> {
    catalog_response(&state, &kind, strip_json(&catalog), None).await
}

async fn catalog_extra_handler(
    State(state): State<AddonState>,
    Path((kind, catalog, _)): Path<(String, String, String)>,
    OriginalUri(uri): OriginalUri,
) -> Json<MetasBody> {
    // `Path` has already percent-decoded the extra; form-decode the raw segment once instead.
    let search = uri
        .path()
        .rsplit('/')
        .next()
        .and_then(|extra| search_term(strip_json(extra)));
    catalog_response(&state, &kind, &catalog, search.as_deref()).await
}

async fn catalog_response(
    state: &AddonState,
    kind: &str,
    catalog: &str,
    search: Option<&str>,
) -> Json<MetasBody> {
    let known_catalog = matches!(catalog, MOVIE_CATALOG_ID | SERIES_CATALOG_ID);
    let metas = match kind.parse::<ContentKind>() {
        Ok(kind) if known_catalog => state
            .service
            .catalog(kind, search)
            .await
            .items
            .into_iter()
            .map(MetaObject::from)
            .collect(),
        _ => Vec::new(),
    };
    Json(MetasBody { metas })
}

async fn meta_handler(
    State(state): State<AddonState>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<MetaBody> {
    let meta = match owned_id(&kind, strip_json(&id)) {
        Some((kind, id)) => state.service.meta(kind, id).await.item.map(MetaObject::from),
        None => None,
    };
    Json(MetaBody { meta })
}

async fn stream_handler(
    State(state): State<AddonState>,
    Path((kind, id)): Path<(String, String)>,
) -> Json<StreamsBody> {
    let streams = match owned_id(&kind, strip_json(&id)) {
        Some((kind, id)) => state
            .service
            .streams(kind, id)
            .await
            .items
            .into_iter()
            .map(StreamObject::from)
            .collect(),
        None => Vec::new(),
    };
    Json(StreamsBody { streams })
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Parsed kind when `id` carries this addon's prefix for that kind.
fn owned_id<'a>(kind: &str, id: &'a str) -> Option<(ContentKind, &'a str)> {
    let kind: ContentKind = kind.parse().ok()?;
    id.starts_with(&id_prefix(kind)).then_some((kind, id))
}

/// `search` value from a form-encoded extra segment such as `search=matrix&skip=0`.
fn search_term(extra: &str) -> Option<String> {
    url::form_urlencoded::parse(extra.as_bytes())
        .find(|(key, _)| key == "search")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}
