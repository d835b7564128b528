//! PageFetcher trait for pluggable page retrieval.
//!
//! The crawl loop treats page fetching as a black box: given a page number
//! it gets back candidate records and the site's end-of-results signal.
//! `HttpPageFetcher` is the production implementation; tests script one
//! with `testing::MockPageFetcher`.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::{config::CrawlConfig, page::FetchedPage};

/// Fetches one listing page and extracts its candidate records.
///
/// Implementations must guarantee every record in the returned page has all
/// of `config.required_fields` populated; the crawl loop trusts this and
/// performs no field validation of its own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the given page of the listing described by `config`.
    async fn fetch_page(&self, page_number: u32, config: &CrawlConfig) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
