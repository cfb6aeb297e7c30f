pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Byte transport used by every source kind and by the image resolver.
///
/// Implementations must be cheap to share across tasks; the aggregator holds
/// one behind an `Arc` for the lifetime of a run.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
