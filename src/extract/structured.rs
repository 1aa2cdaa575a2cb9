//! JSON-LD (`application/ld+json`) extraction.
//!
//! Blocks are read in document order. A block that is not valid JSON is
//! skipped and the scan continues; top-level arrays and `@graph` containers
//! are flattened into individual entries.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::{css, detect_kind, parse_year};
use crate::error::ScrapeError;
use crate::ident::{build_content_id, normalize_url};
use crate::model::{ContentCard, ContentKind};

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| css(r#"script[type="application/ld+json"]"#));

const SERIES_TYPES: [&str; 4] = ["TVSeries", "TVSeason", "Episode", "TVEpisode"];
const MOVIE_TYPES: [&str; 1] = ["Movie"];

/// One schema.org entry with the fields the addon cares about.
///
/// Fields of an unexpected JSON type are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredEntry {
    /// `@type`, one or many.
    pub type_tags: Vec<String>,
    pub name: Option<String>,
    /// Raw `url`, not yet normalized.
    pub url: Option<String>,
    /// Raw image chosen by the image policy, not yet normalized.
    pub image: Option<String>,
    pub description: Option<String>,
    pub date_published: Option<String>,
    /// `aggregateRating.ratingValue` rendered as text.
    pub rating: Option<String>,
    /// An `aggregateRating` block is present, even without a usable value.
    pub has_rating_block: bool,
    pub genres: Vec<String>,
}

impl StructuredEntry {
    /// Read an entry out of a JSON object. Non-objects yield `None`.
    #[must_use]
    pub fn from_value(item: &Value) -> Option<Self> {
        if !item.is_object() {
            return None;
        }

        Some(Self {
            type_tags: string_list(item.get("@type")),
            name: non_empty_str(item.get("name")),
            url: non_empty_str(item.get("url")),
            image: pick_image(item),
            description: non_empty_str(item.get("description")),
            date_published: non_empty_str(item.get("datePublished")),
            rating: item
                .pointer("/aggregateRating/ratingValue")
                .and_then(scalar_text),
            has_rating_block: item.get("aggregateRating").is_some_and(|v| !v.is_null()),
            genres: string_list(item.get("genre")),
        })
    }

    /// Kind from `@type`, if the tag is one we recognize.
    #[must_use]
    pub fn tagged_kind(&self) -> Option<ContentKind> {
        let tagged = |known: &[&str]| self.type_tags.iter().any(|t| known.contains(&t.as_str()));
        if tagged(&SERIES_TYPES[..]) {
            Some(ContentKind::Series)
        } else if tagged(&MOVIE_TYPES[..]) {
            Some(ContentKind::Movie)
        } else {
            None
        }
    }

    /// Year from the publish date.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.date_published.as_deref().and_then(parse_year)
    }
}

/// Parse every JSON-LD block in the document, flattening arrays and graphs.
#[must_use]
pub fn parse_blocks(document: &Html) -> Vec<StructuredEntry> {
    let mut values = Vec::new();

    for (index, script) in document.select(&LD_JSON).enumerate() {
        let raw = script.text().collect::<String>();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        match parse_block(raw) {
            Ok(value) => flatten(value, &mut values),
            Err(err) => debug!(block = index, %err, "Skipping structured data block"),
        }
    }

    values.iter().filter_map(StructuredEntry::from_value).collect()
}

fn parse_block(raw: &str) -> Result<Value, ScrapeError> {
    Ok(serde_json::from_str(raw)?)
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(mut map) => match map.remove("@graph") {
            Some(graph) => flatten(graph, out),
            None => out.push(Value::Object(map)),
        },
        _ => {}
    }
}

/// Candidate cards from JSON-LD, in document order.
///
/// Entries without a resolvable `url` or a non-empty `name` are dropped.
#[must_use]
pub fn structured_cards(
    document: &Html,
    fallback: ContentKind,
    base_url: &str,
) -> Vec<ContentCard> {
    parse_blocks(document)
        .into_iter()
        .filter_map(|entry| entry_to_card(entry, fallback, base_url))
        .collect()
}

fn entry_to_card(
    entry: StructuredEntry,
    fallback: ContentKind,
    base_url: &str,
) -> Option<ContentCard> {
    let source_url = entry.url.as_deref().and_then(|u| normalize_url(u, base_url))?;
    let title = entry.name.clone()?;

    let kind = entry
        .tagged_kind()
        .or_else(|| detect_kind(&source_url))
        .unwrap_or(fallback);
    let image = entry.image.as_deref().and_then(|u| normalize_url(u, base_url));

    Some(ContentCard {
        identifier: build_content_id(kind, &source_url, &title),
        kind,
        source_url,
        title,
        poster_url: image.clone(),
        background_url: image,
        year: entry.year(),
        synopsis: entry.description,
        rating: entry.rating,
        genres: entry.genres,
    })
}

/// Image policy: first element of an `image` array, else a scalar `image`,
/// else `thumbnailUrl`.
fn pick_image(item: &Value) -> Option<String> {
    let from_image = match item.get("image") {
        Some(Value::Array(items)) => items.first().and_then(image_url),
        Some(other) => image_url(other),
        None => None,
    };
    from_image.or_else(|| non_empty_str(item.get("thumbnailUrl")))
}

/// A plain URL string or an `ImageObject`.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => non_empty_str(Some(value)),
        Value::Object(_) => non_empty_str(value.get("url"))
            .or_else(|| non_empty_str(value.get("contentUrl"))),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Strings and numbers as text; everything else is absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A string or an array of scalars, trimmed, empties removed.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}
