//! The outcome of fetching one listing page.

use chrono::{DateTime, Utc};

use crate::types::record::VenueRecord;

/// Everything the crawl loop learns from one page fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Which page of the listing this came from (1-based)
    pub page_number: u32,

    /// Candidate records extracted from the page, in page order
    pub records: Vec<VenueRecord>,

    /// The site explicitly signaled the end of results
    pub no_results_found: bool,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// A page fetch that yielded records.
    pub fn new(page_number: u32, records: Vec<VenueRecord>) -> Self {
        Self {
            page_number,
            records,
            no_results_found: false,
            fetched_at: Utc::now(),
        }
    }

    /// A page carrying the site's end-of-results signal.
    pub fn no_results(page_number: u32) -> Self {
        Self {
            page_number,
            records: Vec::new(),
            no_results_found: true,
            fetched_at: Utc::now(),
        }
    }

    /// A fetch that yielded nothing, without an explicit signal.
    pub fn empty(page_number: u32) -> Self {
        Self::new(page_number, Vec::new())
    }

    /// True when no records were extracted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of candidate records on the page.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
