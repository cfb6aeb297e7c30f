//! JSON API sources (e.g. the reviews endpoint).
//!
//! Field locations are JSON pointers: `items` points at the array inside the
//! response document, every other pointer is relative to one array element.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::app::{Result, RhinoError};
use crate::normalizer::text;
use crate::normalizer::RawEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestRules {
    pub items: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Environment variable holding an API key, if the endpoint needs one
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_api_key_param")]
    pub api_key_param: String,
}

fn default_api_key_param() -> String {
    "api_key".to_string()
}

impl RestRules {
    pub fn new(items: impl Into<String>) -> Self {
        Self {
            items: items.into(),
            id: None,
            title: None,
            link: None,
            date: None,
            summary: None,
            image: None,
            api_key_env: None,
            api_key_param: default_api_key_param(),
        }
    }

    /// Source URL with the API key appended when one is configured and set.
    pub fn request_url(&self, url: &str) -> Result<String> {
        let mut url = Url::parse(url)?;

        if let Some(var) = &self.api_key_env {
            match std::env::var(var) {
                Ok(key) if !key.is_empty() => {
                    url.query_pairs_mut().append_pair(&self.api_key_param, &key);
                }
                _ => tracing::warn!("API key variable {} is not set", var),
            }
        }

        Ok(url.into())
    }

    pub fn extract(&self, body: &[u8]) -> Result<Vec<RawEntry>> {
        let document: Value = serde_json::from_slice(body)?;

        let items = document
            .pointer(&self.items)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RhinoError::FeedParse(format!("no array at JSON pointer {}", self.items))
            })?;

        Ok(items.iter().map(|item| self.raw_entry(item)).collect())
    }

    fn raw_entry(&self, item: &Value) -> RawEntry {
        let field = |pointer: &Option<String>| {
            pointer
                .as_deref()
                .and_then(|p| item.pointer(p))
                .and_then(scalar_text)
        };

        RawEntry {
            id: field(&self.id),
            title: field(&self.title).map(|t| text::collapse_whitespace(&t)),
            link: field(&self.link),
            published: None,
            raw_date: field(&self.date),
            image_hint: field(&self.image),
            summary: field(&self.summary).map(|s| text::plain_text(&s)),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}
