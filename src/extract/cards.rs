//! Listing card extraction and the merged listing view.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::structured::structured_cards;
use super::{css, detect_kind, parse_year, FieldPipeline, Probe};
use crate::config::MergeOrder;
use crate::ident::{build_content_id, normalize_url};
use crate::model::{ContentCard, ContentKind};

/// Card containers, most specific first. Matches come back in document order.
pub const CARD_SELECTORS: [&str; 8] = [
    ".movie-card",
    ".movie-item",
    ".film-item",
    ".dizi-item",
    ".post",
    ".post-item",
    ".list-item",
    "article",
];

static CARD: LazyLock<Selector> = LazyLock::new(|| css(&CARD_SELECTORS.join(",")));

static LINK: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![
        Probe::attr("a", "href"),
        Probe::attr(".title a", "href"),
        Probe::attr(".poster a", "href"),
    ])
});

static TITLE: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![
        Probe::text(".title"),
        Probe::text("h2"),
        Probe::text("h3"),
        Probe::attr("a[title]", "title"),
        Probe::text("a"),
    ])
});

static IMAGE: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![
        Probe::attr("img", "data-src"),
        Probe::attr("img", "src"),
        Probe::attr("img", "data-lazy-src"),
    ])
});

static SYNOPSIS: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![Probe::text(".excerpt"), Probe::text(".description")])
});

static YEAR: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![
        Probe::text(".year"),
        Probe::text(".date"),
        Probe::ScopeText,
    ])
});

/// Cards from listing markup, in document order, without deduplication.
#[must_use]
pub fn listing_cards(document: &Html, fallback: ContentKind, base_url: &str) -> Vec<ContentCard> {
    document
        .select(&CARD)
        .filter_map(|card| read_card(card, fallback, base_url))
        .collect()
}

fn read_card(card: ElementRef<'_>, fallback: ContentKind, base_url: &str) -> Option<ContentCard> {
    let Some(source_url) = LINK.find_map(card, |href| normalize_url(href, base_url)) else {
        debug!("Dropping card without a usable link");
        return None;
    };
    let Some(title) = TITLE.first(card) else {
        debug!(url = %source_url, "Dropping card without a title");
        return None;
    };

    let kind = detect_kind(&source_url).unwrap_or(fallback);
    let image = IMAGE.first(card).and_then(|src| normalize_url(&src, base_url));

    Some(ContentCard {
        identifier: build_content_id(kind, &source_url, &title),
        kind,
        source_url,
        title,
        poster_url: image.clone(),
        background_url: image,
        synopsis: SYNOPSIS.first(card),
        year: YEAR.find_map(card, parse_year),
        rating: None,
        genres: Vec::new(),
    })
}

/// Accumulates cards, keeping the first record seen for each source URL.
#[derive(Debug, Default)]
pub struct CardSet {
    seen: HashSet<String>,
    cards: Vec<ContentCard>,
}

impl CardSet {
    /// Add a card unless its source URL is already present.
    pub fn insert(&mut self, card: ContentCard) -> bool {
        if !self.seen.insert(card.source_url.clone()) {
            return false;
        }
        self.cards.push(card);
        true
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = ContentCard>) {
        for card in cards {
            self.insert(card);
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ContentCard> {
        self.cards
    }
}

/// Merged JSON-LD and card records for a listing page, one per source URL.
#[must_use]
pub fn extract_listing(
    html: &str,
    fallback: ContentKind,
    base_url: &str,
    order: MergeOrder,
) -> Vec<ContentCard> {
    let document = Html::parse_document(html);
    let structured = structured_cards(&document, fallback, base_url);
    let listed = listing_cards(&document, fallback, base_url);
    debug!(
        structured = structured.len(),
        listed = listed.len(),
        "Extracted listing candidates"
    );

    let mut set = CardSet::default();
    match order {
        MergeOrder::StructuredDataFirst => {
            set.extend(structured);
            set.extend(listed);
        }
        MergeOrder::CardsFirst => {
            set.extend(listed);
            set.extend(structured);
        }
    }
    set.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.hdfilmizle.to";

    fn cards(body: &str, fallback: ContentKind) -> Vec<ContentCard> {
        let document = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        listing_cards(&document, fallback, BASE)
    }

    #[test]
    fn reads_all_card_fields() {
        let found = cards(
            r#"<div class="movie-item">
                <a href="/film/inception-izle/"><img data-src="/uploads/inception.jpg" src="/lazy.gif"></a>
                <h2 class="title"> Inception </h2>
                <p class="excerpt">Rüya içinde rüya.</p>
                <span class="year">2010</span>
            </div>"#,
            ContentKind::Series,
        );
        assert_eq!(found.len(), 1);
        let card = &found[0];
        assert_eq!(card.title, "Inception");
        assert_eq!(card.kind, ContentKind::Movie);
        assert_eq!(card.source_url, "https://www.hdfilmizle.to/film/inception-izle/");
        assert_eq!(
            card.poster_url.as_deref(),
            Some("https://www.hdfilmizle.to/uploads/inception.jpg")
        );
        assert_eq!(card.synopsis.as_deref(), Some("Rüya içinde rüya."));
        assert_eq!(card.year, Some(2010));
        assert!(card.identifier.starts_with("hdfilmizle:movie:inception:"));
    }

    #[test]
    fn title_falls_back_to_link_attributes() {
        let found = cards(
            r#"<article><a href="/x-izle/" title="Yeşil Yol"></a></article>
               <article><a href="/y-izle/">Esaretin Bedeli</a></article>"#,
            ContentKind::Movie,
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].title, "Yeşil Yol");
        assert_eq!(found[1].title, "Esaretin Bedeli");
    }

    #[test]
    fn cards_missing_link_or_title_are_dropped() {
        let found = cards(
            r#"<div class="post"><h2>Başlıksız bağlantı yok</h2></div>
               <div class="post"><a href="/z-izle/"><img src="/z.jpg"></a></div>
               <div class="post"><a href="/ok-izle/">Tamam</a></div>"#,
            ContentKind::Movie,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Tamam");
    }

    #[test]
    fn unusable_first_link_falls_through_to_title_link() {
        let found = cards(
            r##"<div class="movie-card">
                <a href="#" class="fav">♥</a>
                <div class="title"><a href="/film/yesil-yol-izle/">Yeşil Yol</a></div>
            </div>
            <div class="movie-card">
                <a href="javascript:void(0)">Ekle</a>
                <div class="poster"><a href="/film/ucuz-roman-izle/"></a></div>
                <h2>Ucuz Roman</h2>
            </div>"##,
            ContentKind::Movie,
        );
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].source_url, "https://www.hdfilmizle.to/film/yesil-yol-izle/");
        assert_eq!(found[0].title, "Yeşil Yol");
        assert_eq!(found[1].source_url, "https://www.hdfilmizle.to/film/ucuz-roman-izle/");
    }

    #[test]
    fn year_falls_back_to_card_text() {
        let found = cards(
            r#"<div class="film-item"><a href="/a-izle/">A</a><p>IMDb 7.1 · 2008 · 1080p</p></div>"#,
            ContentKind::Movie,
        );
        assert_eq!(found[0].year, Some(2008));
    }

    #[test]
    fn fallback_kind_applies_to_unmarked_urls() {
        let found = cards(
            r#"<div class="list-item"><a href="/gizemli-izle/">Gizemli</a></div>
               <div class="dizi-item"><a href="/dizi/dark/">Dark</a></div>"#,
            ContentKind::Movie,
        );
        assert_eq!(found[0].kind, ContentKind::Movie);
        assert_eq!(found[1].kind, ContentKind::Series);
    }

    #[test]
    fn structured_record_wins_duplicate_url() {
        let html = r#"<html><head><script type="application/ld+json">
                {"@type":"Movie","name":"The Matrix","url":"https://www.hdfilmizle.to/film/matrix/","aggregateRating":{"ratingValue":"8.7"}}
            </script></head><body>
                <div class="movie-card"><a href="/film/matrix/">Matrix (kart)</a></div>
                <div class="movie-card"><a href="/film/inception/">Inception</a></div>
            </body></html>"#;

        let merged = extract_listing(html, ContentKind::Movie, BASE, MergeOrder::StructuredDataFirst);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "The Matrix");
        assert_eq!(merged[0].rating.as_deref(), Some("8.7"));
        assert_eq!(merged[1].title, "Inception");

        let merged = extract_listing(html, ContentKind::Movie, BASE, MergeOrder::CardsFirst);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "Matrix (kart)");
    }

    #[test]
    fn nested_card_containers_are_deduplicated() {
        let html = r#"<html><body>
            <article><div class="post"><a href="/film/a/">A</a></div></article>
        </body></html>"#;
        let merged = extract_listing(html, ContentKind::Movie, BASE, MergeOrder::default());
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn card_set_keeps_first() {
        let mut set = CardSet::default();
        let card = |title: &str| ContentCard {
            identifier: String::new(),
            kind: ContentKind::Movie,
            source_url: "https://x/a".into(),
            title: title.into(),
            poster_url: None,
            background_url: None,
            synopsis: None,
            year: None,
            rating: None,
            genres: Vec::new(),
        };
        assert!(set.insert(card("first")));
        assert!(!set.insert(card("second")));
        let cards = set.into_vec();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "first");
    }
}
