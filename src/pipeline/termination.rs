//! Adaptive termination policy for the pagination loop.
//!
//! Four signals are evaluated in a fixed precedence order after each page:
//! the site's end-of-results marker, an empty extraction, an exhausted
//! duplicate streak, and the hard page cap. Every reason leads to the same
//! terminal state; they differ only in what gets logged and reported.

use std::fmt;

use crate::types::{config::CrawlConfig, page::FetchedPage};

/// Why a crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The site signaled the end of its results
    NoResultsSignal,

    /// A fetch returned no records without an explicit signal
    EmptyPage,

    /// Too many consecutive pages contained only duplicates
    DuplicateStreak,

    /// The configured page cap was reached
    PageCapReached,

    /// A page fetch failed; the crawl keeps its partial accumulation
    FetchFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::NoResultsSignal => "end-of-results signal from source",
            StopReason::EmptyPage => "empty page",
            StopReason::DuplicateStreak => "duplicate streak exhausted",
            StopReason::PageCapReached => "page cap reached",
            StopReason::FetchFailed => "page fetch failed",
        };
        f.write_str(text)
    }
}

/// Pure policy evaluator over the per-page signals.
#[derive(Debug, Clone)]
pub struct TerminationPolicy {
    max_pages: u32,
    max_duplicate_streak: usize,
}

impl TerminationPolicy {
    /// Create a policy from explicit thresholds.
    pub fn new(max_pages: u32, max_duplicate_streak: usize) -> Self {
        Self {
            max_pages,
            max_duplicate_streak,
        }
    }

    /// Create a policy from a crawl config.
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.max_pages, config.max_duplicate_streak)
    }

    /// Evaluate the signals available immediately after a fetch.
    ///
    /// The explicit no-results signal outranks plain emptiness.
    pub fn check_fetch(&self, page: &FetchedPage) -> Option<StopReason> {
        if page.no_results_found {
            return Some(StopReason::NoResultsSignal);
        }
        if page.is_empty() {
            return Some(StopReason::EmptyPage);
        }
        None
    }

    /// Evaluate the duplicate streak after classification.
    pub fn check_duplicate_streak(&self, streak: usize) -> Option<StopReason> {
        if streak >= self.max_duplicate_streak {
            Some(StopReason::DuplicateStreak)
        } else {
            None
        }
    }

    /// Evaluate the page cap against the already-advanced page counter.
    pub fn check_page_cap(&self, next_page_number: u32) -> Option<StopReason> {
        if next_page_number > self.max_pages {
            Some(StopReason::PageCapReached)
        } else {
            None
        }
    }
}
