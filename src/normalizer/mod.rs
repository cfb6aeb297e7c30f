pub mod date;
pub mod rest;
pub mod text;

use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;
use url::Url;

use crate::app::{Result, RhinoError};

pub use date::normalize_date;

/// Entry as extracted from a source, before dates, recency and images are
/// settled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    /// Identifier supplied by the source itself (feed guid, API id)
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// Timestamp already parsed by the feed parser
    pub published: Option<DateTime<Utc>>,
    /// Date text still to be normalized
    pub raw_date: Option<String>,
    pub image_hint: Option<String>,
    pub summary: Option<String>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS, Atom or JSON Feed document into raw entries.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<RawEntry>> {
        // Feed timestamps go through the same absolute formats as every other
        // source, so "January 10, 2025" in a pubDate is not lost.
        let feed = parser::Builder::new()
            .timestamp_parser(date::parse_absolute)
            .build()
            .parse(body)
            .map_err(|e| RhinoError::FeedParse(e.to_string()))?;

        Ok(feed.entries.into_iter().map(raw_entry).collect())
    }
}

fn raw_entry(entry: Entry) -> RawEntry {
    let content_html = entry.content.as_ref().and_then(|c| c.body.clone());
    let summary_html = entry.summary.as_ref().map(|s| s.content.clone());

    let link = entry
        .links
        .first()
        .map(|l| l.href.trim().to_string())
        .filter(|l| !l.is_empty());

    let image_hint = media_image(&entry).or_else(|| {
        content_html
            .as_deref()
            .and_then(text::first_image_src)
            .or_else(|| summary_html.as_deref().and_then(text::first_image_src))
            .and_then(|src| absolute_image(&src, link.as_deref()))
    });

    let summary = summary_html
        .as_deref()
        .map(text::plain_text)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            content_html
                .as_deref()
                .map(text::plain_text)
                .filter(|s| !s.is_empty())
                .map(|s| text::truncate_with_ellipsis(&s, text::SUMMARY_MAX_CHARS))
        });

    RawEntry {
        id: Some(entry.id.trim().to_string()).filter(|id| !id.is_empty()),
        title: entry
            .title
            .map(|t| text::collapse_whitespace(&decode_html_entities(&t.content)))
            .filter(|t| !t.is_empty()),
        link,
        published: entry.published.or(entry.updated),
        raw_date: None,
        image_hint,
        summary,
    }
}

/// Inline `<img>` sources are often site-relative; resolve them against the
/// entry link. Relative sources without a usable link are dropped.
fn absolute_image(src: &str, link: Option<&str>) -> Option<String> {
    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }

    link.and_then(|link| Url::parse(link).ok())
        .and_then(|base| base.join(src).ok())
        .map(String::from)
}

/// Enclosures and `media:content` come first, then `media:thumbnail`.
fn media_image(entry: &Entry) -> Option<String> {
    let content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| {
            c.content_type
                .as_ref()
                .map_or(true, |mime| mime.ty() == "image")
        })
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

    content.or_else(|| {
        entry
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|t| t.image.uri.clone())
            .find(|uri| !uri.is_empty())
    })
}
