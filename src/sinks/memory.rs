//! In-memory sink for testing and development.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::traits::sink::RecordSink;
use crate::types::record::VenueRecord;

/// Captures written records in memory.
///
/// Useful for tests asserting on the final accumulated output and on how
/// often the crawl loop touched the sink.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RwLock<Vec<VenueRecord>>,
    resets: AtomicUsize,
    writes: AtomicUsize,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The records from the most recent write.
    pub fn records(&self) -> Vec<VenueRecord> {
        self.records.read().unwrap().clone()
    }

    /// How many times `reset` was called.
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }

    /// How many times `write` was called.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn reset(&self) -> SinkResult<()> {
        self.resets.fetch_add(1, Ordering::Relaxed);
        self.records.write().unwrap().clear();
        Ok(())
    }

    async fn write(&self, records: &[VenueRecord]) -> SinkResult<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        *self.records.write().unwrap() = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::venue;

    #[tokio::test]
    async fn write_replaces_contents() {
        let sink = MemorySink::new();
        sink.write(&[venue("A")]).await.unwrap();
        sink.write(&[venue("B"), venue("C")]).await.unwrap();

        let names: Vec<_> = sink
            .records()
            .iter()
            .map(|r| r.identity().to_string())
            .collect();
        assert_eq!(names, ["B", "C"]);
        assert_eq!(sink.write_count(), 2);
    }

    #[tokio::test]
    async fn reset_clears_and_counts() {
        let sink = MemorySink::new();
        sink.write(&[venue("A")]).await.unwrap();
        sink.reset().await.unwrap();

        assert!(sink.records().is_empty());
        assert_eq!(sink.reset_count(), 1);
    }
}
