//! Inter-request pacing.
//!
//! Pacing is a fixed policy, not feedback-driven: the loop pauses once
//! before the first fetch and once after every iteration that does not
//! terminate. It lives behind a trait so tests can substitute a no-op and
//! avoid real delays.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use crate::types::config::CrawlConfig;

/// A suspension point between page fetches.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Pause for one pacing interval.
    async fn pause(&self);
}

/// Sleeps for a duration drawn uniformly from a configured range.
///
/// The default 60-90 second range exists to let the extraction backend's
/// per-minute token quota reset between pages.
#[derive(Debug, Clone)]
pub struct UniformDelayPacer {
    min_secs: u64,
    max_secs: u64,
}

impl UniformDelayPacer {
    /// Create a pacer with explicit bounds, in seconds.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Create a pacer from a crawl config.
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.delay_min_secs, config.delay_max_secs)
    }

    /// Draw one delay from the configured range.
    fn sample(&self) -> Duration {
        let secs = if self.min_secs >= self.max_secs {
            self.min_secs as f64
        } else {
            rand::thread_rng().gen_range(self.min_secs as f64..=self.max_secs as f64)
        };
        Duration::from_secs_f64(secs)
    }
}

#[async_trait]
impl Pacer for UniformDelayPacer {
    async fn pause(&self) {
        let delay = self.sample();
        debug!(delay_secs = delay.as_secs_f64(), "pacing before next fetch");
        tokio::time::sleep(delay).await;
    }
}

/// A pacer that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}
