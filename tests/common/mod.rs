//! Test helpers for aggregation tests.
//!
//! Provides a canned `Fetcher` and builders for feed documents.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use data_rhino::app::{Result, RhinoError};
use data_rhino::fetcher::Fetcher;

/// Reference "now" shared by the aggregation tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
}

enum Reply {
    Body(String),
    Status(u16),
}

/// Serves registered bodies and answers 404 for everything else.
#[derive(Default)]
pub struct MockFetcher {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<String>) -> Self {
        self.replies.insert(url.to_string(), Reply::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.replies.insert(url.to_string(), Reply::Status(status));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests().iter().any(|u| u == url)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.replies.get(url) {
            Some(Reply::Body(body)) => Ok(body.clone().into_bytes()),
            Some(Reply::Status(status)) => Err(RhinoError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(RhinoError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// One `<item>` of an RSS 2.0 document.
pub struct RssItem<'a> {
    pub guid: &'a str,
    pub title: &'a str,
    pub link: &'a str,
    pub pub_date: &'a str,
    pub extra: &'a str,
}

impl<'a> RssItem<'a> {
    pub fn new(guid: &'a str, title: &'a str, link: &'a str, pub_date: &'a str) -> Self {
        Self {
            guid,
            title,
            link,
            pub_date,
            extra: "",
        }
    }

    pub fn with_extra(mut self, extra: &'a str) -> Self {
        self.extra = extra;
        self
    }
}

pub fn rss(items: &[RssItem<'_>]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com/</link>
    <description>Test</description>
"#,
    );

    for item in items {
        body.push_str("    <item>\n");
        if !item.title.is_empty() {
            body.push_str(&format!("      <title>{}</title>\n", item.title));
        }
        body.push_str(&format!("      <link>{}</link>\n", item.link));
        body.push_str(&format!("      <guid>{}</guid>\n", item.guid));
        body.push_str(&format!("      <pubDate>{}</pubDate>\n", item.pub_date));
        body.push_str(item.extra);
        body.push_str("\n    </item>\n");
    }

    body.push_str("  </channel>\n</rss>\n");
    body
}

/// An article page declaring `image` as its Open Graph image.
pub fn page_with_og(image: &str) -> String {
    format!(
        r#"<html><head><meta property="og:image" content="{}"></head><body></body></html>"#,
        image
    )
}

pub fn page_without_og() -> String {
    "<html><head><title>No preview</title></head><body></body></html>".to_string()
}
