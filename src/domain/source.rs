use serde::{Deserialize, Serialize};

use crate::app::{Result, RhinoError};
use crate::normalizer::rest::RestRules;
use crate::recency::RecencyWindow;
use crate::scrape::ScrapeRules;

pub const DEFAULT_PLACEHOLDER: &str = "/logos/news-placeholder.png";
pub const DEFAULT_FALLBACK_TITLE: &str = "Untitled";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Feed,
    Scrape,
    Rest,
}

/// One content source as declared in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default)]
    pub scrape: Option<ScrapeRules>,
    #[serde(default)]
    pub rest: Option<RestRules>,
    #[serde(default)]
    pub recency: RecencyWindow,
    /// Image used when neither the entry nor its page yields one
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Cap applied after the recency filter
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,
    #[serde(default)]
    pub fallback_summary: String,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_fallback_title() -> String {
    DEFAULT_FALLBACK_TITLE.to_string()
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            logo: String::new(),
            kind,
            scrape: None,
            rest: None,
            recency: RecencyWindow::default(),
            placeholder: default_placeholder(),
            max_items: None,
            fallback_title: default_fallback_title(),
            fallback_summary: String::new(),
        }
    }

    pub fn feed(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, url, SourceKind::Feed)
    }

    pub fn scrape(name: impl Into<String>, url: impl Into<String>, rules: ScrapeRules) -> Self {
        Self {
            scrape: Some(rules),
            ..Self::new(name, url, SourceKind::Scrape)
        }
    }

    pub fn rest(name: impl Into<String>, url: impl Into<String>, rules: RestRules) -> Self {
        Self {
            rest: Some(rules),
            ..Self::new(name, url, SourceKind::Rest)
        }
    }

    pub fn with_recency(mut self, recency: RecencyWindow) -> Self {
        self.recency = recency;
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = logo.into();
        self
    }

    /// Check that the kind-specific rule table is present and usable.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RhinoError::Config(format!(
                "source with url {} has no name",
                self.url
            )));
        }
        if self.placeholder.is_empty() {
            return Err(RhinoError::Config(format!(
                "source {} has an empty placeholder image",
                self.name
            )));
        }
        if self.fallback_title.is_empty() {
            return Err(RhinoError::Config(format!(
                "source {} has an empty fallback title",
                self.name
            )));
        }

        url::Url::parse(&self.url)?;

        match self.kind {
            SourceKind::Feed => Ok(()),
            SourceKind::Scrape => match &self.scrape {
                Some(rules) => rules.compile().map(|_| ()),
                None => Err(RhinoError::Config(format!(
                    "scrape source {} is missing its [scrape] rules",
                    self.name
                ))),
            },
            SourceKind::Rest => match &self.rest {
                Some(_) => Ok(()),
                None => Err(RhinoError::Config(format!(
                    "rest source {} is missing its [rest] rules",
                    self.name
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// News: most recent first
    #[default]
    NewestFirst,
    /// Events: nearest upcoming first
    SoonestFirst,
}

/// A named group of sources rendered as one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}
