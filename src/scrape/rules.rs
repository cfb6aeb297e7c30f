use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::app::{Result, RhinoError};

pub const DEFAULT_MAX_ITEMS: usize = 6;

/// Where the date text of a scraped entry lives, relative to the item node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateScope {
    /// Text of the `date` selector inside the item, or the item's own text
    #[default]
    Selector,
    /// Whole text of the item node
    Item,
    /// Whole text of the item's parent element
    Parent,
    /// Text of the first sibling matching `date`
    Sibling,
}

/// Per-provider scraping rules, supplied as configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRules {
    /// Selector for each item container
    pub item: String,
    /// Title element inside the item; the item's own text when absent
    #[serde(default)]
    pub title: Option<String>,
    /// Anchor inside the item; the item itself when absent
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub date_scope: DateScope,
    /// Regex applied to the date text; the first match is kept
    #[serde(default)]
    pub date_pattern: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_image_attr")]
    pub image_attr: String,
    /// Base for relative links and images; the page URL when absent
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_link_attr() -> String {
    "href".to_string()
}

fn default_image_attr() -> String {
    "src".to_string()
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

pub(crate) struct CompiledRules {
    pub item: Selector,
    pub title: Option<Selector>,
    pub link: Option<Selector>,
    pub date: Option<Selector>,
    pub image: Option<Selector>,
    pub date_pattern: Option<Regex>,
}

impl ScrapeRules {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            title: None,
            link: None,
            link_attr: default_link_attr(),
            date: None,
            date_scope: DateScope::default(),
            date_pattern: None,
            image: None,
            image_attr: default_image_attr(),
            base_url: None,
            max_items: default_max_items(),
        }
    }

    pub(crate) fn compile(&self) -> Result<CompiledRules> {
        if self.date_scope == DateScope::Sibling && self.date.is_none() {
            return Err(RhinoError::Config(format!(
                "sibling date scope needs a date selector (item `{}`)",
                self.item
            )));
        }

        let date_pattern = self
            .date_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| RhinoError::Config(format!("invalid date pattern: {}", e)))?;

        Ok(CompiledRules {
            item: parse_selector(&self.item)?,
            title: self.title.as_deref().map(parse_selector).transpose()?,
            link: self.link.as_deref().map(parse_selector).transpose()?,
            date: self.date.as_deref().map(parse_selector).transpose()?,
            image: self.image.as_deref().map(parse_selector).transpose()?,
            date_pattern,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| RhinoError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let rules: ScrapeRules = toml::from_str(r#"item = ".card""#).unwrap();

        assert_eq!(rules.link_attr, "href");
        assert_eq!(rules.image_attr, "src");
        assert_eq!(rules.max_items, DEFAULT_MAX_ITEMS);
        assert_eq!(rules.date_scope, DateScope::Selector);
    }

    #[test]
    fn test_compile_valid_rules() {
        let rules = ScrapeRules {
            title: Some(".card-title".into()),
            date: Some(".card-date".into()),
            date_pattern: Some(r"\d{4}-\d{2}-\d{2}".into()),
            ..ScrapeRules::new(".card")
        };
        let compiled = rules.compile().unwrap();
        assert!(compiled.title.is_some());
        assert!(compiled.link.is_none());
        assert!(compiled.date_pattern.is_some());
    }

    #[test]
    fn test_invalid_selector() {
        let result = ScrapeRules::new("div[").compile();
        assert!(matches!(result, Err(RhinoError::Selector { .. })));
    }

    #[test]
    fn test_invalid_date_pattern() {
        let rules = ScrapeRules {
            date_pattern: Some("(".into()),
            ..ScrapeRules::new("li")
        };
        assert!(matches!(rules.compile(), Err(RhinoError::Config(_))));
    }

    #[test]
    fn test_sibling_scope_needs_selector() {
        let rules = ScrapeRules {
            date_scope: DateScope::Sibling,
            ..ScrapeRules::new(".blog-post-title")
        };
        assert!(matches!(rules.compile(), Err(RhinoError::Config(_))));
    }
}
