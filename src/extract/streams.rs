//! Player and video link discovery on detail pages.
//!
//! Sources are scanned in a fixed order (iframes, `<video>` sources, anchors,
//! inline scripts) and deduplicated by absolute URL, so an embed that is
//! also linked keeps its iframe label.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::{collapsed_text, css};
use crate::ident::normalize_url;
use crate::model::StreamLink;

pub const IFRAME_LABEL: &str = "Iframe";
pub const VIDEO_LABEL: &str = "Direct Video";
pub const LINK_LABEL: &str = "Bağlantı";
pub const SCRIPT_LABEL: &str = "Script Kaynağı";

static IFRAME: LazyLock<Selector> = LazyLock::new(|| css("iframe"));
static VIDEO_SOURCE: LazyLock<Selector> = LazyLock::new(|| css("video source"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));
static SCRIPT: LazyLock<Selector> = LazyLock::new(|| css("script"));

static PLAYER_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)m3u8|mp4|stream|player|izle|watch|embed").expect("player href pattern is valid")
});

static SCRIPT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^"'\s]+(?:m3u8|mp4|embed[^"'\s]*)"#)
        .expect("script url pattern is valid")
});

/// Ordered, URL-deduplicated link collector.
struct LinkSet<'a> {
    base_url: &'a str,
    seen: HashSet<String>,
    links: Vec<StreamLink>,
}

impl<'a> LinkSet<'a> {
    fn new(base_url: &'a str) -> Self {
        Self {
            base_url,
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    fn push(&mut self, raw: &str, label: impl Into<String>) {
        let Some(url) = normalize_url(raw, self.base_url) else {
            return;
        };
        if self.seen.insert(url.clone()) {
            self.links.push(StreamLink {
                label: label.into(),
                url,
            });
        }
    }
}

/// Every candidate player or video link on a detail page.
#[must_use]
pub fn extract_stream_links(html: &str, base_url: &str) -> Vec<StreamLink> {
    let document = Html::parse_document(html);
    let mut found = LinkSet::new(base_url);

    for frame in document.select(&IFRAME) {
        let el = frame.value();
        let src = el
            .attr("src")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| el.attr("data-src"));
        if let Some(src) = src {
            found.push(src, IFRAME_LABEL);
        }
    }

    for source in document.select(&VIDEO_SOURCE) {
        let el = source.value();
        let Some(src) = el.attr("src") else { continue };
        let label = [el.attr("label"), el.attr("res")]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or(VIDEO_LABEL);
        found.push(src, label);
    }

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else { continue };
        if !PLAYER_HREF.is_match(href) {
            continue;
        }
        let text = collapsed_text(anchor);
        let label = if text.is_empty() { LINK_LABEL.to_string() } else { text };
        found.push(href, label);
    }

    for script in document.select(&SCRIPT) {
        let body = script.text().collect::<String>().replace("\\/", "/");
        for hit in SCRIPT_URL.find_iter(&body) {
            found.push(hit.as_str(), SCRIPT_LABEL);
        }
    }

    debug!(count = found.links.len(), "Collected stream links");
    found.links
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.hdfilmizle.to";

    fn links(body: &str) -> Vec<StreamLink> {
        extract_stream_links(&format!("<html><body>{body}</body></html>"), BASE)
    }

    #[test]
    fn iframe_wins_over_duplicate_link() {
        let found = links(
            r#"<iframe src="https://player.example.com/embed/abc"></iframe>
               <a href="https://player.example.com/embed/abc">Oynat</a>"#,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, IFRAME_LABEL);
        assert_eq!(found[0].url, "https://player.example.com/embed/abc");
    }

    #[test]
    fn sources_are_scanned_in_order() {
        let found = links(
            r#"<a href="/film/x-izle/fragman">Fragman</a>
               <video><source src="/media/x-720.mp4" res="720p"><source src="/media/x.mp4"></video>
               <iframe data-src="//cdn.example.com/player/9"></iframe>
               <script>var cfg = {"file":"https:\/\/cdn.example.com\/hls\/x.m3u8"};</script>"#,
        );
        let labels: Vec<&str> = found.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec![IFRAME_LABEL, "720p", VIDEO_LABEL, "Fragman", SCRIPT_LABEL]);
        assert_eq!(found[0].url, "https://cdn.example.com/player/9");
        assert_eq!(found[1].url, "https://www.hdfilmizle.to/media/x-720.mp4");
        assert_eq!(found[4].url, "https://cdn.example.com/hls/x.m3u8");
    }

    #[test]
    fn video_label_prefers_label_attribute() {
        let found = links(r#"<video><source src="/a.mp4" label="1080p" res="1080"></video>"#);
        assert_eq!(found[0].label, "1080p");
    }

    #[test]
    fn unrelated_links_are_ignored() {
        let found = links(
            r##"<a href="/iletisim">İletişim</a>
               <a href="#">Yukarı</a>
               <a href="javascript:void(0)">player</a>
               <a href="/player/5"></a>"##,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, LINK_LABEL);
        assert_eq!(found[0].url, "https://www.hdfilmizle.to/player/5");
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(links("<p>Yok</p>").is_empty());
    }
}
