use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

use crate::app::{Result, RhinoError};
use crate::domain::{ContentItem, SortOrder, SourceKind, SourceSpec, MISSING_LINK};
use crate::fetcher::Fetcher;
use crate::image::ImageResolver;
use crate::normalizer::{normalize_date, Normalizer, RawEntry};
use crate::recency::is_recent;
use crate::scrape::{HtmlScraper, ScrapeRules};

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_IMAGE_CONCURRENCY: usize = 8;

/// Runs every source of a listing concurrently and merges the results.
///
/// A failing source contributes no items; the aggregation itself never
/// fails.
#[derive(Clone)]
pub struct Aggregator {
    fetcher: Arc<dyn Fetcher>,
    images: ImageResolver,
    normalizer: Normalizer,
    semaphore: Arc<Semaphore>,
    image_concurrency: usize,
}

struct Candidate {
    key: String,
    item: ContentItem,
    image_hint: Option<String>,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_limits(fetcher, DEFAULT_WORKERS, DEFAULT_IMAGE_CONCURRENCY)
    }

    pub fn with_limits(fetcher: Arc<dyn Fetcher>, workers: usize, image_concurrency: usize) -> Self {
        Self {
            images: ImageResolver::new(fetcher.clone()),
            fetcher,
            normalizer: Normalizer::new(),
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            image_concurrency: image_concurrency.max(1),
        }
    }

    pub fn images(&self) -> &ImageResolver {
        &self.images
    }

    pub async fn aggregate(&self, sources: &[SourceSpec], order: SortOrder) -> Vec<ContentItem> {
        self.aggregate_at(sources, order, Utc::now()).await
    }

    /// Aggregate against a fixed "now", which drives every recency cutoff.
    pub async fn aggregate_at(
        &self,
        sources: &[SourceSpec],
        order: SortOrder,
        now: DateTime<Utc>,
    ) -> Vec<ContentItem> {
        let mut handles = Vec::new();

        for source in sources {
            let this = self.clone();
            let source = source.clone();

            let handle = tokio::spawn(async move {
                let _permit = this.semaphore.acquire().await.ok();

                let result = this.collect_source(&source, now).await;
                (source.name, result)
            });

            handles.push(handle);
        }

        let mut keyed = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((_, Ok(items))) => keyed.extend(items),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
                Ok((name, Err(e))) => {
                    tracing::warn!("Source {} failed: {}", name, e);
                }
            }
        }

        let mut items = dedup_by_key(keyed);
        sort_items(&mut items, order);

        tracing::info!("Aggregated {} items from {} sources", items.len(), sources.len());
        items
    }

    /// Fetch and parse one source into raw entries, without any filtering.
    pub async fn fetch_entries(&self, source: &SourceSpec) -> Result<Vec<RawEntry>> {
        match source.kind {
            SourceKind::Feed => {
                let body = self.fetcher.fetch(&source.url).await?;
                self.normalizer.normalize(&body)
            }
            SourceKind::Scrape => {
                let rules = source.scrape.as_ref().ok_or_else(|| missing_rules(source))?;
                let body = self.fetcher.fetch(&source.url).await?;
                scrape_entries(rules, &source.url, &body)
            }
            SourceKind::Rest => {
                let rules = source.rest.as_ref().ok_or_else(|| missing_rules(source))?;
                let url = rules.request_url(&source.url)?;
                let body = self.fetcher.fetch(&url).await?;
                rules.extract(&body)
            }
        }
    }

    async fn collect_source(
        &self,
        source: &SourceSpec,
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, ContentItem)>> {
        let entries = self.fetch_entries(source).await?;
        let fetched = entries.len();
        let cutoff = source.recency.cutoff(now);

        let candidates: Vec<Candidate> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| candidate(source, index, entry, now))
            .filter(|c| is_recent(c.item.published_at, cutoff))
            .take(source.max_items.unwrap_or(usize::MAX))
            .collect();

        tracing::debug!(
            "{}: {} entries fetched, {} within {}",
            source.name,
            fetched,
            candidates.len(),
            source.recency
        );

        let items: Vec<(String, ContentItem)> = stream::iter(candidates)
            .map(|c| async move {
                let image = match c.image_hint {
                    Some(hint) => Some(hint),
                    None if c.item.link != MISSING_LINK => self.images.resolve(&c.item.link).await,
                    None => None,
                };

                let mut item = c.item;
                item.image = image.unwrap_or_else(|| source.placeholder.clone());
                (c.key, item)
            })
            .buffered(self.image_concurrency)
            .collect()
            .await;

        Ok(items)
    }
}

fn candidate(
    source: &SourceSpec,
    index: usize,
    entry: RawEntry,
    now: DateTime<Utc>,
) -> Candidate {
    let published_at = entry.published.or_else(|| {
        entry
            .raw_date
            .as_deref()
            .and_then(|raw| normalize_date(raw, now))
    });

    let id = entry
        .id
        .clone()
        .unwrap_or_else(|| ContentItem::synthesize_id(&source.name, index));
    let key = entry.id.or_else(|| entry.link.clone()).unwrap_or_else(|| id.clone());

    let item = ContentItem {
        id,
        title: entry.title.unwrap_or_else(|| source.fallback_title.clone()),
        link: entry.link.unwrap_or_else(|| MISSING_LINK.to_string()),
        published_at,
        summary: entry.summary.unwrap_or_else(|| source.fallback_summary.clone()),
        image: String::new(),
        source_name: source.name.clone(),
        source_logo: source.logo.clone(),
    };

    Candidate {
        key,
        item,
        image_hint: entry.image_hint,
    }
}

fn scrape_entries(rules: &ScrapeRules, page_url: &str, body: &[u8]) -> Result<Vec<RawEntry>> {
    let scraper = HtmlScraper::new(rules, page_url)?;
    Ok(scraper.extract(&String::from_utf8_lossy(body)))
}

fn missing_rules(source: &SourceSpec) -> RhinoError {
    RhinoError::Config(format!(
        "{:?} source {} has no rules",
        source.kind, source.name
    ))
}

/// Keep the first item for every key.
pub(crate) fn dedup_by_key(keyed: Vec<(String, ContentItem)>) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    keyed
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .map(|(_, item)| item)
        .collect()
}

pub(crate) fn sort_items(items: &mut [ContentItem], order: SortOrder) {
    match order {
        SortOrder::NewestFirst => items.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortOrder::SoonestFirst => items.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
    }
}
