//! Core trait abstractions (PageFetcher, RecordExtractor, RecordSink).

pub mod extractor;
pub mod fetcher;
pub mod sink;

pub use extractor::{ExtractorUsage, RecordExtractor};
pub use fetcher::PageFetcher;
pub use sink::RecordSink;
