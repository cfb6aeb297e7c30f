use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::app::error::{Result, RhinoError};
use crate::config::Config;
use crate::domain::{ContentItem, Listing};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher>,
    pub aggregator: Aggregator,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let workers = config.aggregator.workers;
        Self::with_workers(config, workers)
    }

    pub fn with_workers(config: Config, workers: usize) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.http)?);
        Ok(Self::with_fetcher(config, fetcher, workers))
    }

    /// Build a context around any fetcher, e.g. a canned one in tests.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>, workers: usize) -> Self {
        let aggregator =
            Aggregator::with_limits(fetcher.clone(), workers, config.aggregator.image_concurrency);

        Self {
            config,
            fetcher,
            aggregator,
        }
    }

    pub fn listing(&self, name: &str) -> Result<&Listing> {
        self.config
            .listing(name)
            .ok_or_else(|| RhinoError::UnknownListing(name.to_string()))
    }

    /// Aggregate every source of the named listing.
    pub async fn aggregate_listing(&self, name: &str) -> Result<Vec<ContentItem>> {
        let listing = self.listing(name)?;
        Ok(self
            .aggregator
            .aggregate(&listing.sources, listing.order)
            .await)
    }
}
