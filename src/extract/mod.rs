//! HTML-to-content extraction.
//!
//! Every extractor is best-effort: missing fields fall back to the next
//! strategy, then to a placeholder or to omission. Nothing in this module
//! returns an error.
//!
//! # Architecture
//!
//! - [`structured`]: JSON-LD blocks → candidate records
//! - [`cards`]: listing card markup → candidate records, merged with JSON-LD
//! - [`detail`]: one detail page → one full record
//! - [`streams`]: detail page → player/video links
//!
//! Field lookups are expressed as a [`FieldPipeline`]: an ordered list of
//! [`Probe`]s tried in sequence until one yields a non-empty value.

pub mod cards;
pub mod detail;
pub mod streams;
pub mod structured;

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::model::ContentKind;

pub use cards::{extract_listing, listing_cards};
pub use detail::extract_detail;
pub use streams::extract_stream_links;
pub use structured::{structured_cards, StructuredEntry};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:19|20)\d{2}").expect("year pattern is valid"));

/// Compile a selector literal. Only used for fixed selectors held in statics.
pub(crate) fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid selector {selector:?}: {e:?}"))
}

/// One way of reading a field out of a scope element.
pub(crate) enum Probe {
    /// Whitespace-collapsed text of the first match.
    Text(Selector),
    /// Trimmed attribute of the first match.
    Attr(Selector, &'static str),
    /// Whitespace-collapsed text of the whole scope.
    ScopeText,
}

impl Probe {
    pub(crate) fn text(selector: &str) -> Self {
        Self::Text(css(selector))
    }

    pub(crate) fn attr(selector: &str, name: &'static str) -> Self {
        Self::Attr(css(selector), name)
    }

    fn read(&self, scope: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Self::Text(selector) => scope.select(selector).next().map(collapsed_text)?,
            Self::Attr(selector, name) => scope
                .select(selector)
                .next()
                .and_then(|el| el.value().attr(name))?
                .trim()
                .to_string(),
            Self::ScopeText => collapsed_text(scope),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Ordered strategies for a single field.
pub(crate) struct FieldPipeline {
    probes: Vec<Probe>,
}

impl FieldPipeline {
    pub(crate) fn new(probes: Vec<Probe>) -> Self {
        Self { probes }
    }

    /// First non-empty value.
    pub(crate) fn first(&self, scope: ElementRef<'_>) -> Option<String> {
        self.probes.iter().find_map(|probe| probe.read(scope))
    }

    /// First non-empty value that `parse` accepts.
    pub(crate) fn find_map<T>(
        &self,
        scope: ElementRef<'_>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        self.probes
            .iter()
            .find_map(|probe| probe.read(scope).and_then(|v| parse(&v)))
    }
}

/// Concatenated text of an element with whitespace runs collapsed.
pub(crate) fn collapsed_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First plausible 19xx/20xx year in `text`, capped at next year.
#[must_use]
pub fn parse_year(text: &str) -> Option<i32> {
    let latest = chrono::Utc::now().year() + 1;
    YEAR_PATTERN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|year| (1900..=latest).contains(year))
}

/// Classify a detail URL by its path markers.
///
/// Returns `None` when the URL carries no marker, so callers can apply
/// their own fallback.
#[must_use]
pub fn detect_kind(url: &str) -> Option<ContentKind> {
    const SERIES_MARKERS: [&str; 6] = ["/dizi", "/seri", "episode", "season", "bolum", "tvseries"];
    const MOVIE_MARKERS: [&str; 2] = ["/film", "/movie"];

    let lower = url.to_lowercase();
    if SERIES_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(ContentKind::Series)
    } else if MOVIE_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(ContentKind::Movie)
    } else {
        None
    }
}
