//! Integration tests for the catalog service against fixture pages.

mod common;

use std::sync::Arc;

use common::*;
use hdfilmizle::{build_content_id, AddonConfig, ContentKind, ScrapeError};

fn movie_site() -> Arc<MapFetcher> {
    Arc::new(
        MapFetcher::new()
            .page(BASE, LISTING_MOVIES)
            .page(&format!("{BASE}/?s=Matrix"), LISTING_MOVIES)
            .page(&format!("{BASE}/dizi"), LISTING_SERIES)
            .page(&format!("{BASE}/film/inception-izle/"), DETAIL_MOVIE)
            .page(&format!("{BASE}/dizi/dark/"), DETAIL_BARE),
    )
}

#[tokio::test]
async fn movie_catalog_merges_and_filters_by_kind() {
    let service = service_with(movie_site(), AddonConfig::default());
    let items = service.list_catalog(ContentKind::Movie, None).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["The Matrix", "Inception"]);

    let matrix = &items[0];
    assert_eq!(matrix.rating.as_deref(), Some("8.7"));
    assert_eq!(
        matrix.poster_url.as_deref(),
        Some("https://www.hdfilmizle.to/uploads/matrix.jpg")
    );
    assert_eq!(items[1].year, Some(2010));
}

#[tokio::test]
async fn series_catalog_uses_series_listing() {
    let fetcher = movie_site();
    let service = service_with(fetcher.clone(), AddonConfig::default());
    let items = service.list_catalog(ContentKind::Series, None).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Dark", "Breaking Bad"]);
    assert_eq!(items[0].year, Some(2017));
    assert!(items.iter().all(|c| c.kind == ContentKind::Series));
    assert_eq!(fetcher.requests(), vec![format!("{BASE}/dizi")]);
}

#[tokio::test]
async fn search_filters_titles_case_insensitively() {
    let fetcher = movie_site();
    let service = service_with(fetcher.clone(), AddonConfig::default());

    let items = service
        .list_catalog(ContentKind::Movie, Some(" Matrix "))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "The Matrix");
    assert_eq!(fetcher.requests(), vec![format!("{BASE}/?s=Matrix")]);
}

#[tokio::test]
async fn catalog_is_truncated_in_order() {
    let fetcher = Arc::new(MapFetcher::new().page(BASE, &numbered_listing(10)));
    let config = AddonConfig {
        max_catalog_items: 3,
        ..AddonConfig::default()
    };
    let items = service_with(fetcher, config)
        .list_catalog(ContentKind::Movie, None)
        .await
        .unwrap();

    let titles: Vec<&str> = items.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Film 0", "Film 1", "Film 2"]);
}

#[tokio::test]
async fn detail_prefers_structured_data() {
    let service = service_with(movie_site(), AddonConfig::default());
    let url = format!("{BASE}/film/inception-izle/");
    let id = build_content_id(ContentKind::Movie, &url, "Inception");

    let card = service.get_detail(ContentKind::Movie, &id).await.unwrap();
    assert_eq!(card.title, "Inception");
    assert_eq!(card.year, Some(2010));
    assert_eq!(card.rating.as_deref(), Some("8.8"));
    assert_eq!(card.genres, vec!["Bilim Kurgu"]);
    assert_eq!(
        card.poster_url.as_deref(),
        Some("https://www.hdfilmizle.to/uploads/inception-og.jpg")
    );
    assert_eq!(card.source_url, url);
}

#[tokio::test]
async fn bare_detail_page_degrades_to_placeholders() {
    let service = service_with(movie_site(), AddonConfig::default());
    let id = build_content_id(ContentKind::Series, &format!("{BASE}/dizi/dark/"), "Dark");

    let card = service.meta(ContentKind::Series, &id).await.item.unwrap();
    assert_eq!(card.title, "Dark");
    assert_eq!(card.year, Some(2017));
    assert_eq!(card.synopsis.as_deref(), Some("Açıklama bulunamadı."));
    assert!(card.poster_url.is_none());
}

#[tokio::test]
async fn streams_are_ordered_and_deduplicated() {
    let service = service_with(movie_site(), AddonConfig::default());
    let id = build_content_id(
        ContentKind::Movie,
        &format!("{BASE}/film/inception-izle/"),
        "Inception",
    );

    let links = service.list_streams(ContentKind::Movie, &id).await.unwrap();
    let pairs: Vec<(&str, &str)> = links
        .iter()
        .map(|l| (l.label.as_str(), l.url.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Iframe", "https://vidplayer.example.com/embed/inc42"),
            ("1080p", "https://www.hdfilmizle.to/media/inception-1080.mp4"),
            ("720p", "https://www.hdfilmizle.to/media/inception-720.mp4"),
            ("Alternatif 2", "https://www.hdfilmizle.to/film/inception-izle/2"),
            ("Script Kaynağı", "https://cdn.example.com/hls/inception.m3u8"),
        ]
    );
}

#[tokio::test]
async fn kind_mismatch_does_not_fetch() {
    let fetcher = movie_site();
    let service = service_with(fetcher.clone(), AddonConfig::default());
    let id = build_content_id(ContentKind::Series, &format!("{BASE}/dizi/dark/"), "Dark");

    let err = service.get_detail(ContentKind::Movie, &id).await.unwrap_err();
    assert!(matches!(err, ScrapeError::InvalidIdentifier { .. }));
    assert!(service.streams(ContentKind::Movie, &id).await.items.is_empty());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn upstream_error_degrades_handlers() {
    let service = service_with(Arc::new(MapFetcher::new()), AddonConfig::default());
    let id = build_content_id(ContentKind::Movie, &format!("{BASE}/film/gone/"), "Gone");

    let err = service.list_catalog(ContentKind::Movie, None).await.unwrap_err();
    assert!(matches!(err, ScrapeError::FetchFailed { .. }));

    assert!(service.catalog(ContentKind::Movie, None).await.items.is_empty());
    assert!(service.meta(ContentKind::Movie, &id).await.item.is_none());
    assert!(service.streams(ContentKind::Movie, &id).await.items.is_empty());
}

#[tokio::test]
async fn timeout_yields_empty_results() {
    let service = service_with(Arc::new(PendingFetcher), short_timeout_config());
    let id = build_content_id(ContentKind::Movie, &format!("{BASE}/film/slow/"), "Slow");

    let err = service.list_catalog(ContentKind::Movie, None).await.unwrap_err();
    assert!(matches!(err, ScrapeError::FetchTimeout { .. }));

    assert!(service.catalog(ContentKind::Movie, None).await.items.is_empty());
    assert!(service.meta(ContentKind::Movie, &id).await.item.is_none());
    assert!(service.streams(ContentKind::Movie, &id).await.items.is_empty());
}
