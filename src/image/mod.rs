//! Representative-image lookup through Open Graph and Twitter-card tags.

use std::sync::Arc;

use scraper::{Html, Selector};
use url::Url;

use crate::fetcher::Fetcher;

/// Meta keys consulted in priority order.
pub const IMAGE_META_KEYS: [&str; 4] = [
    "og:image",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn Fetcher>,
}

impl ImageResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `page_url` and return its preview image, if it declares one.
    ///
    /// Failures are logged and reported as `None`; callers apply their own
    /// placeholder.
    pub async fn resolve(&self, page_url: &str) -> Option<String> {
        let body = match self.fetcher.fetch(page_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Image lookup failed for {}: {}", page_url, e);
                return None;
            }
        };

        let html = String::from_utf8_lossy(&body);
        let image = extract_meta_image(&html, page_url);
        if image.is_none() {
            tracing::debug!("No preview image declared by {}", page_url);
        }
        image
    }
}

/// Read the preview image from a page's meta tags.
///
/// Root-relative values are made absolute against the page's origin.
pub fn extract_meta_image(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let content = IMAGE_META_KEYS.iter().find_map(|key| {
        let selector =
            Selector::parse(&format!(r#"meta[property="{key}"], meta[name="{key}"]"#)).ok()?;
        document
            .select(&selector)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(String::from)
    })?;

    if content.starts_with('/') {
        if let Some(absolute) = Url::parse(page_url)
            .ok()
            .and_then(|page| page.join(&content).ok())
        {
            return Some(absolute.into());
        }
    }

    Some(content)
}
