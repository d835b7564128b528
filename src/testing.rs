//! Testing utilities including mock implementations.
//!
//! These are useful for exercising the crawl loop without real network
//! or LLM calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{FetchError, FetchResult};
use crate::pipeline::pacing::Pacer;
use crate::traits::{extractor::RecordExtractor, fetcher::PageFetcher};
use crate::types::{config::CrawlConfig, page::FetchedPage, record::VenueRecord};

/// Build a fully-populated record with the given name.
pub fn venue(name: &str) -> VenueRecord {
    VenueRecord {
        name: name.to_string(),
        price: "$$".to_string(),
        location: "Atlanta, GA".to_string(),
        capacity: "Up to 200".to_string(),
        rating: 4.5,
        reviews: 12,
        description: format!("Test venue {}", name),
    }
}

/// What a scripted page should do when fetched.
#[derive(Debug, Clone)]
enum ScriptedPage {
    Records(Vec<VenueRecord>),
    NoResults,
    Fail,
}

/// A mock page fetcher scripted per page number.
///
/// Unscripted pages come back empty, which terminates the loop the same
/// way an exhausted listing would. Fetched page numbers are recorded for
/// assertions.
#[derive(Debug, Default)]
pub struct MockPageFetcher {
    pages: RwLock<HashMap<u32, ScriptedPage>>,
    calls: RwLock<Vec<u32>>,
}

impl MockPageFetcher {
    /// Create a fetcher with no scripted pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a page to return records.
    pub fn with_page(self, page_number: u32, records: Vec<VenueRecord>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(page_number, ScriptedPage::Records(records));
        self
    }

    /// Script a page to carry the site's no-results signal.
    pub fn with_no_results(self, page_number: u32) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(page_number, ScriptedPage::NoResults);
        self
    }

    /// Script a page to fail with an HTTP error.
    pub fn with_failure(self, page_number: u32) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(page_number, ScriptedPage::Fail);
        self
    }

    /// Page numbers fetched, in order.
    pub fn calls(&self) -> Vec<u32> {
        self.calls.read().unwrap().clone()
    }

    /// How many fetches were issued.
    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, page_number: u32, _config: &CrawlConfig) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(page_number);

        let script = self.pages.read().unwrap().get(&page_number).cloned();
        match script {
            Some(ScriptedPage::Records(records)) => Ok(FetchedPage::new(page_number, records)),
            Some(ScriptedPage::NoResults) => Ok(FetchedPage::no_results(page_number)),
            Some(ScriptedPage::Fail) => Err(FetchError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Mock connection refused",
            )))),
            None => Ok(FetchedPage::empty(page_number)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A mock extractor returning a fixed candidate list.
#[derive(Debug, Default)]
pub struct MockExtractor {
    candidates: Vec<serde_json::Value>,
    calls: AtomicUsize,
}

impl MockExtractor {
    /// Create an extractor that returns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidates returned by every call.
    pub fn with_candidates(mut self, candidates: Vec<serde_json::Value>) -> Self {
        self.candidates = candidates;
        self
    }

    /// How many extraction calls were made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordExtractor for MockExtractor {
    async fn extract(&self, _content: &str) -> FetchResult<Vec<serde_json::Value>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.candidates.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A pacer that never waits but counts its pauses.
#[derive(Debug, Default)]
pub struct CountingPacer {
    pauses: AtomicUsize,
}

impl CountingPacer {
    /// Create a pacer with a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many pauses the loop requested.
    pub fn pause_count(&self) -> usize {
        self.pauses.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
    }
}
