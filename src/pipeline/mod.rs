//! The crawl pipeline: pacing, fetch, deduplication, termination.

pub mod crawl;
pub mod dedup;
pub mod pacing;
pub mod termination;

pub use crawl::{crawl, CrawlReport, CrawlState};
pub use dedup::{DedupTracker, PageClassification};
pub use pacing::{NoopPacer, Pacer, UniformDelayPacer};
pub use termination::{StopReason, TerminationPolicy};
