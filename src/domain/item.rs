use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link used when a source omits one.
pub const MISSING_LINK: &str = "#";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub image: String,
    pub source_name: String,
    pub source_logo: String,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            link: MISSING_LINK.to_string(),
            published_at: None,
            summary: String::new(),
            image: String::new(),
            source_name: source_name.into(),
            source_logo: String::new(),
        }
    }

    /// Identifier for entries that carry no id of their own.
    pub fn synthesize_id(source_name: &str, index: usize) -> String {
        format!("{}-{}", source_name, index)
    }

    /// Whether every field the rendering layer relies on is populated.
    pub fn is_renderable(&self) -> bool {
        !self.title.is_empty()
            && !self.link.is_empty()
            && !self.image.is_empty()
            && !self.source_name.is_empty()
    }
}
