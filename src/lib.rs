//! Paginated venue-listing crawler with LLM-backed record extraction.
//!
//! The crate walks a paginated listing site one page at a time, hands each
//! page to an extraction backend that returns candidate venue records,
//! deduplicates records across pages by venue name, and writes the final
//! set to a flat file. The interesting part is the loop itself: when a
//! record counts as new, and when the crawl decides it is done — an
//! explicit end-of-results signal, an empty page, too many consecutive
//! all-duplicate pages, or the hard page cap.
//!
//! # Usage
//!
//! ```rust,ignore
//! use venue_crawler::{crawl, CrawlConfig, CsvSink, HttpPageFetcher, OpenAiExtractor, UniformDelayPacer};
//!
//! let config = CrawlConfig::from_env()?;
//! let fetcher = HttpPageFetcher::new(OpenAiExtractor::from_env()?);
//! let pacer = UniformDelayPacer::from_config(&config);
//! let sink = CsvSink::from_config(&config);
//!
//! let report = crawl(&config, &fetcher, &pacer, &sink).await?;
//! println!("kept {} records ({})", report.records_kept, report.stop_reason);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (PageFetcher, RecordExtractor, RecordSink)
//! - [`types`] - Records, page fetch results, configuration
//! - [`pipeline`] - The crawl loop, deduplication, termination, pacing
//! - [`fetchers`] - HTTP fetcher implementation
//! - [`extractors`] - OpenAI-compatible extraction backend
//! - [`sinks`] - CSV and in-memory sinks
//! - [`testing`] - Mock implementations for tests

pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod pipeline;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, CrawlError, FetchError, SinkError};
pub use pipeline::{
    crawl, CrawlReport, CrawlState, DedupTracker, NoopPacer, PageClassification, Pacer,
    StopReason, TerminationPolicy, UniformDelayPacer,
};
pub use traits::{ExtractorUsage, PageFetcher, RecordExtractor, RecordSink};
pub use types::{CrawlConfig, FetchedPage, VenueRecord};

// Re-export implementations
pub use extractors::OpenAiExtractor;
pub use fetchers::HttpPageFetcher;
pub use sinks::{CsvSink, MemorySink};
