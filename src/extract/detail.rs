//! Detail page extraction.

use std::sync::LazyLock;

use scraper::Html;

use super::structured::{parse_blocks, StructuredEntry};
use super::{parse_year, FieldPipeline, Probe};
use crate::ident::{build_content_id, normalize_url};
use crate::model::{ContentCard, ContentKind};

pub const TITLE_PLACEHOLDER: &str = "İçerik";
pub const SYNOPSIS_PLACEHOLDER: &str = "Açıklama bulunamadı.";

static TITLE: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![
        Probe::text("h1"),
        Probe::text(".title"),
        Probe::text("title"),
    ])
});

static YEAR: LazyLock<FieldPipeline> =
    LazyLock::new(|| FieldPipeline::new(vec![Probe::text(".year"), Probe::ScopeText]));

static SYNOPSIS: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![Probe::text(".summary"), Probe::text(".description")])
});

static OG_IMAGE: LazyLock<FieldPipeline> = LazyLock::new(|| {
    FieldPipeline::new(vec![Probe::attr(r#"meta[property="og:image"]"#, "content")])
});

/// Build the full record for one detail page.
///
/// The kind and source URL are already known from the identifier; the page
/// supplies everything else. Missing title and synopsis become placeholders.
#[must_use]
pub fn extract_detail(
    html: &str,
    kind: ContentKind,
    source_url: &str,
    base_url: &str,
) -> ContentCard {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let preferred = preferred_entry(parse_blocks(&document));

    let year = preferred
        .year()
        .or_else(|| YEAR.find_map(root, parse_year));

    let title = preferred
        .name
        .or_else(|| TITLE.first(root))
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

    let synopsis = preferred
        .description
        .or_else(|| SYNOPSIS.first(root))
        .unwrap_or_else(|| SYNOPSIS_PLACEHOLDER.to_string());

    let image = preferred
        .image
        .or_else(|| OG_IMAGE.first(root))
        .and_then(|src| normalize_url(&src, base_url));

    ContentCard {
        identifier: build_content_id(kind, source_url, &title),
        kind,
        source_url: source_url.to_string(),
        title,
        poster_url: image.clone(),
        background_url: image,
        synopsis: Some(synopsis),
        year,
        rating: preferred.rating,
        genres: preferred.genres,
    }
}

/// First entry with a name and either a description or a rating block. An empty
/// entry stands in when none qualifies, so every field falls through to markup.
fn preferred_entry(entries: Vec<StructuredEntry>) -> StructuredEntry {
    entries
        .into_iter()
        .find(|e| e.name.is_some() && (e.description.is_some() || e.has_rating_block))
        .unwrap_or_default()
}
