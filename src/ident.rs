//! URL normalization, slugs and content identifiers.
//!
//! A content identifier looks like
//! `hdfilmizle:<kind>:<slug>:<base64url(source url)>`. The slug is cosmetic;
//! only the kind and the encoded URL are read back by [`parse_content_id`].

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::error::{Result, ScrapeError};
use crate::model::{ContentKind, ContentRef};

/// First field of every content identifier.
pub const ID_NAMESPACE: &str = "hdfilmizle";

/// Slug used when a title has no ASCII-representable characters.
pub const SLUG_FALLBACK: &str = "icerik";

const ID_DELIMITER: char = ':';

/// URL-safe alphabet, no padding written, padding tolerated on read.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Resolve a raw `href`/`src` value against the site base URL.
///
/// Returns `None` for empty input, fragment-only links and non-http schemes.
#[must_use]
pub fn normalize_url(raw: &str, base_url: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.starts_with('#') {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(value.to_string());
    }
    if let Some(rest) = value.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if has_foreign_scheme(&lower) {
        return None;
    }

    let base = base_url.trim_end_matches('/');
    Some(format!("{base}/{}", value.trim_start_matches('/')))
}

fn has_foreign_scheme(lower: &str) -> bool {
    const OPAQUE: [&str; 5] = ["javascript:", "mailto:", "data:", "tel:", "about:"];
    if OPAQUE.iter().any(|scheme| lower.starts_with(scheme)) {
        return true;
    }
    // Any other `scheme://` is not something we can fetch.
    lower.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Lowercase ASCII slug with Turkish letters transliterated.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(transliterate) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn transliterate(c: char) -> std::char::ToLowercase {
    let folded = match c {
        'ı' | 'İ' | 'î' | 'Î' => 'i',
        'ğ' | 'Ğ' => 'g',
        'ü' | 'Ü' | 'û' | 'Û' => 'u',
        'ş' | 'Ş' => 's',
        'ö' | 'Ö' => 'o',
        'ç' | 'Ç' => 'c',
        'â' | 'Â' => 'a',
        other => other,
    };
    folded.to_lowercase()
}

/// Encode a source URL into the identifier payload.
#[must_use]
pub fn encode_source(url: &str) -> String {
    PAYLOAD_ENGINE.encode(url.as_bytes())
}

/// Decode an identifier payload back into the source URL.
pub fn decode_source(payload: &str) -> Result<String> {
    let bytes = PAYLOAD_ENGINE
        .decode(payload.as_bytes())
        .map_err(|_| ScrapeError::invalid_id(payload, "payload is not base64url"))?;
    String::from_utf8(bytes).map_err(|_| ScrapeError::invalid_id(payload, "payload is not UTF-8"))
}

/// Build the identifier for a piece of content.
#[must_use]
pub fn build_content_id(kind: ContentKind, source_url: &str, title: &str) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() { SLUG_FALLBACK } else { &slug };
    format!(
        "{ID_NAMESPACE}{ID_DELIMITER}{kind}{ID_DELIMITER}{slug}{ID_DELIMITER}{}",
        encode_source(source_url)
    )
}

/// Recover kind and source URL from an identifier.
pub fn parse_content_id(id: &str) -> Result<ContentRef> {
    let parts: Vec<&str> = id.split(ID_DELIMITER).collect();
    if parts.len() < 4 {
        return Err(ScrapeError::invalid_id(id, "fewer than four fields"));
    }
    if parts[0] != ID_NAMESPACE {
        return Err(ScrapeError::invalid_id(id, "wrong namespace"));
    }

    let kind: ContentKind = parts[1]
        .parse()
        .map_err(|_| ScrapeError::invalid_id(id, "unknown content kind"))?;

    let payload = parts[3..].join(":");
    let source_url = decode_source(&payload)
        .map_err(|_| ScrapeError::invalid_id(id, "undecodable source payload"))?;

    let is_http = url::Url::parse(&source_url)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host());
    if !is_http {
        return Err(ScrapeError::invalid_id(id, "payload is not an http(s) URL"));
    }

    Ok(ContentRef { kind, source_url })
}
