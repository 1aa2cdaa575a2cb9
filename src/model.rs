//! Normalized content model shared by the extractors and the service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Movie or series classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Lowercase wire name (`"movie"` / `"series"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names neither kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content kind: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for ContentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// One piece of content scraped from a listing or detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCard {
    /// Opaque identifier, see [`crate::ident::build_content_id`].
    pub identifier: String,
    pub kind: ContentKind,
    /// Absolute URL of the detail page. The identifier is derived from it.
    pub source_url: String,
    pub title: String,
    pub poster_url: Option<String>,
    pub background_url: Option<String>,
    pub synopsis: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub genres: Vec<String>,
}

/// A playable or embeddable reference found on a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    pub label: String,
    pub url: String,
}

/// Decoded form of a content identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub source_url: String,
}
