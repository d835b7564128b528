//! RecordSink trait for persisting the accumulated record set.

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::types::record::VenueRecord;

/// Persists the final record set.
///
/// The crawl loop calls `reset` exactly once before the first fetch so one
/// run produces exactly one self-consistent output, and `write` at most
/// once after termination (never when zero records were accumulated).
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Remove any output left over from a previous run.
    async fn reset(&self) -> SinkResult<()>;

    /// Persist the accumulated records, replacing prior output.
    async fn write(&self, records: &[VenueRecord]) -> SinkResult<()>;
}
