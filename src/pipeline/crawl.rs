//! The pagination loop: fetch, classify, decide, accumulate.

use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::dedup::DedupTracker;
use crate::pipeline::pacing::Pacer;
use crate::pipeline::termination::{StopReason, TerminationPolicy};
use crate::traits::{fetcher::PageFetcher, sink::RecordSink};
use crate::types::{config::CrawlConfig, record::VenueRecord};

/// Mutable loop state, created at crawl start and finalized on termination.
///
/// Owned exclusively by the loop; the tracker and policy only ever see
/// values passed to them.
#[derive(Debug)]
pub struct CrawlState {
    /// The page about to be (or just) fetched, 1-based
    pub page_number: u32,

    /// Accumulated records, append-only
    pub records: Vec<VenueRecord>,

    /// Consecutive pages that contained only duplicates
    pub duplicate_streak: usize,
}

impl CrawlState {
    fn new() -> Self {
        Self {
            page_number: 1,
            records: Vec::new(),
            duplicate_streak: 0,
        }
    }
}

/// Completion statistics surfaced to the caller.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Pages actually fetched
    pub pages_fetched: u32,

    /// Records in the final accumulated output
    pub records_kept: usize,

    /// Records dropped as cross-page duplicates
    pub duplicates_skipped: usize,

    /// Why the loop stopped
    pub stop_reason: StopReason,

    /// Whether the sink received a write (false when zero records)
    pub wrote_output: bool,
}

/// Run one crawl: drive the fetcher page by page, deduplicate across
/// pages, stop per the termination policy, and hand the accumulated
/// records to the sink.
///
/// The loop resets the sink before the first fetch so a run always
/// produces exactly one self-consistent output. Pacing applies before the
/// first fetch and after every iteration that does not terminate.
///
/// A fetch error ends the crawl without retry; the partial accumulation is
/// still written and the failure surfaces as [`StopReason::FetchFailed`]
/// in the report rather than as an `Err`.
pub async fn crawl<F, P, S>(
    config: &CrawlConfig,
    fetcher: &F,
    pacer: &P,
    sink: &S,
) -> Result<CrawlReport>
where
    F: PageFetcher,
    P: Pacer,
    S: RecordSink,
{
    sink.reset().await?;

    let policy = TerminationPolicy::from_config(config);
    let mut dedup = DedupTracker::new();
    let mut state = CrawlState::new();
    let mut pages_fetched = 0u32;
    let mut duplicates_skipped = 0usize;

    info!(
        base_url = %config.base_url,
        session_id = %config.session_id,
        fetcher = fetcher.name(),
        "starting crawl"
    );

    pacer.pause().await;

    let stop_reason = loop {
        let page = match fetcher.fetch_page(state.page_number, config).await {
            Ok(page) => page,
            Err(error) => {
                warn!(page = state.page_number, %error, "page fetch failed, ending crawl");
                break StopReason::FetchFailed;
            }
        };
        pages_fetched += 1;

        if let Some(reason) = policy.check_fetch(&page) {
            info!(page = page.page_number, %reason, "terminating");
            break reason;
        }

        // Page 1 is exempt from classification: everything it returned is
        // kept, even colliding identities within the page.
        let kept = if state.page_number > 1 {
            let classification = dedup.classify(&page.records);
            duplicates_skipped += classification.duplicate_count;

            if classification.has_new_records() {
                state.duplicate_streak = 0;
                info!(
                    page = page.page_number,
                    new = classification.new_records.len(),
                    duplicates = classification.duplicate_count,
                    "page classified"
                );
            } else {
                state.duplicate_streak += 1;
                info!(
                    page = page.page_number,
                    streak = state.duplicate_streak,
                    "page contained only duplicates"
                );
                if let Some(reason) = policy.check_duplicate_streak(state.duplicate_streak) {
                    // Break before the extend step: the triggering page
                    // contributes nothing to the accumulated output.
                    info!(page = page.page_number, %reason, "terminating");
                    break reason;
                }
            }

            classification.new_records
        } else {
            page.records
        };

        dedup.mark_seen(kept.iter());
        state.records.extend(kept);

        state.page_number += 1;
        if let Some(reason) = policy.check_page_cap(state.page_number) {
            info!(%reason, "terminating");
            break reason;
        }

        pacer.pause().await;
    };

    info!(
        %stop_reason,
        pages_fetched,
        records = state.records.len(),
        duplicates_skipped,
        "crawl finished"
    );

    let wrote_output = if state.records.is_empty() {
        info!("no records collected, skipping output write");
        false
    } else {
        sink.write(&state.records).await?;
        true
    };

    Ok(CrawlReport {
        pages_fetched,
        records_kept: state.records.len(),
        duplicates_skipped,
        stop_reason,
        wrote_output,
    })
}
