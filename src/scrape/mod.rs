//! Selector-driven scraping of HTML listing pages.
//!
//! Every provider is described by a [`ScrapeRules`] table; one routine walks
//! the page with those rules and produces raw entries:
//!
//! ```text
//! page HTML → item nodes (≤ max_items) → title / link / date / image → RawEntry
//! ```
//!
//! Parsing is synchronous and never held across an await, since
//! `scraper::Html` is not `Send`.

mod rules;

pub use rules::{DateScope, ScrapeRules, DEFAULT_MAX_ITEMS};

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::Result;
use crate::normalizer::text::collapse_whitespace;
use crate::normalizer::RawEntry;

use rules::CompiledRules;

pub struct HtmlScraper {
    rules: ScrapeRules,
    compiled: CompiledRules,
    base: Url,
}

impl HtmlScraper {
    /// Build a scraper for one page. Fails on invalid selectors or URLs.
    pub fn new(rules: &ScrapeRules, page_url: &str) -> Result<Self> {
        let base = Url::parse(rules.base_url.as_deref().unwrap_or(page_url))?;
        let compiled = rules.compile()?;

        Ok(Self {
            rules: rules.clone(),
            compiled,
            base,
        })
    }

    /// Extract entries in document order. Nodes without a title or link are
    /// skipped but still count towards `max_items`.
    pub fn extract(&self, html: &str) -> Vec<RawEntry> {
        let document = Html::parse_document(html);

        document
            .select(&self.compiled.item)
            .take(self.rules.max_items)
            .filter_map(|node| self.entry(node))
            .collect()
    }

    fn entry(&self, node: ElementRef<'_>) -> Option<RawEntry> {
        let title = match &self.compiled.title {
            Some(selector) => first_match(node, selector).map(element_text),
            None => Some(element_text(node)),
        }
        .filter(|t| !t.is_empty())?;

        let link_node = match &self.compiled.link {
            Some(selector) => first_match(node, selector)?,
            None => node,
        };
        let link = link_node
            .value()
            .attr(&self.rules.link_attr)
            .and_then(|href| self.resolve(href))?;

        let image_hint = self
            .compiled
            .image
            .as_ref()
            .and_then(|selector| first_match(node, selector))
            .and_then(|img| img.value().attr(&self.rules.image_attr))
            .and_then(|src| self.resolve(src));

        Some(RawEntry {
            id: None,
            title: Some(title),
            link: Some(link),
            published: None,
            raw_date: self.date_text(node),
            image_hint,
            summary: None,
        })
    }

    fn date_text(&self, node: ElementRef<'_>) -> Option<String> {
        let text = match self.rules.date_scope {
            DateScope::Selector => match &self.compiled.date {
                Some(selector) => first_match(node, selector).map(element_text),
                None => Some(element_text(node)),
            },
            DateScope::Item => Some(element_text(node)),
            DateScope::Parent => node
                .parent()
                .and_then(ElementRef::wrap)
                .map(element_text),
            DateScope::Sibling => self
                .compiled
                .date
                .as_ref()
                .and_then(|selector| matching_sibling(node, selector))
                .map(element_text),
        }?;

        match &self.compiled.date_pattern {
            Some(pattern) => pattern.find(&text).map(|m| m.as_str().to_string()),
            None => Some(text).filter(|t| !t.is_empty()),
        }
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.base.join(reference).ok().map(String::from)
    }
}

fn first_match<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

fn matching_sibling<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.next_siblings()
        .chain(node.prev_siblings())
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
