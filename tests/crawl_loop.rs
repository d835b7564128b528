//! End-to-end tests of the pagination loop against scripted fetchers.

use proptest::prelude::*;
use std::collections::BTreeSet;

use venue_crawler::testing::{venue, CountingPacer, MockPageFetcher};
use venue_crawler::{crawl, CrawlConfig, MemorySink, NoopPacer, StopReason};

fn config() -> CrawlConfig {
    CrawlConfig::new("https://example.test/venues").with_session_id("test-session")
}

fn names(sink: &MemorySink) -> Vec<String> {
    sink.records()
        .iter()
        .map(|r| r.identity().to_string())
        .collect()
}

#[tokio::test]
async fn accumulates_new_records_until_the_listing_runs_dry() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A"), venue("B")])
        .with_page(2, vec![venue("C")]);
    let sink = MemorySink::new();

    let report = crawl(&config(), &fetcher, &NoopPacer, &sink)
        .await
        .unwrap();

    assert_eq!(names(&sink), ["A", "B", "C"]);
    assert_eq!(report.stop_reason, StopReason::EmptyPage);
    assert_eq!(report.pages_fetched, 3);
    assert_eq!(report.records_kept, 3);
    assert!(report.wrote_output);
}

#[tokio::test]
async fn page_one_keeps_intra_page_identity_collisions() {
    // No dedup runs on page 1, even against itself.
    let fetcher = MockPageFetcher::new().with_page(1, vec![venue("A"), venue("A")]);
    let sink = MemorySink::new();

    crawl(&config(), &fetcher, &NoopPacer, &sink).await.unwrap();

    assert_eq!(names(&sink), ["A", "A"]);
}

#[tokio::test]
async fn classification_reads_the_seen_set_as_of_page_start() {
    // Two copies of a new identity on the same later page both classify
    // as new; the seen set is only written after the page is classified.
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_page(2, vec![venue("B"), venue("B")]);
    let sink = MemorySink::new();

    crawl(&config(), &fetcher, &NoopPacer, &sink).await.unwrap();

    assert_eq!(names(&sink), ["A", "B", "B"]);
}

#[tokio::test]
async fn no_results_signal_ends_the_crawl_with_prior_pages_intact() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_page(2, vec![venue("B")])
        .with_page(3, vec![venue("C")])
        .with_no_results(4);
    let sink = MemorySink::new();

    let report = crawl(&config(), &fetcher, &NoopPacer, &sink)
        .await
        .unwrap();

    assert_eq!(names(&sink), ["A", "B", "C"]);
    assert_eq!(report.stop_reason, StopReason::NoResultsSignal);
    assert_eq!(fetcher.calls(), [1, 2, 3, 4]);
}

#[tokio::test]
async fn duplicate_streak_terminates_the_crawl() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A"), venue("B")])
        .with_page(2, vec![venue("A")])
        .with_page(3, vec![venue("B")]);
    let sink = MemorySink::new();

    let report = crawl(
        &config().with_max_duplicate_streak(2),
        &fetcher,
        &NoopPacer,
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::DuplicateStreak);
    assert_eq!(names(&sink), ["A", "B"]);
    assert_eq!(report.duplicates_skipped, 2);
    assert_eq!(fetcher.fetch_count(), 3);
}

#[tokio::test]
async fn duplicate_streak_page_contributes_nothing() {
    // The loop breaks before the extend step, so the page that exhausts
    // the streak adds no records. The break-before-extend ordering is part
    // of the output contract; do not "fix" it without changing this test.
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_page(2, vec![venue("A")]);
    let sink = MemorySink::new();

    let report = crawl(
        &config().with_max_duplicate_streak(1),
        &fetcher,
        &NoopPacer,
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(report.stop_reason, StopReason::DuplicateStreak);
    assert_eq!(names(&sink), ["A"]);
    assert_eq!(report.records_kept, 1);
}

#[tokio::test]
async fn a_new_record_resets_the_duplicate_streak() {
    // Page cap 3, streak limit 2. Page 2 is a mixed page (one duplicate,
    // one new) so the streak resets; page 3 is all duplicates, streak 1,
    // and the cap fires after the counter advances past 3.
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A"), venue("B")])
        .with_page(2, vec![venue("A"), venue("C")])
        .with_page(3, vec![venue("A"), venue("B")]);
    let sink = MemorySink::new();

    let report = crawl(
        &config().with_max_pages(3).with_max_duplicate_streak(2),
        &fetcher,
        &NoopPacer,
        &sink,
    )
    .await
    .unwrap();

    assert_eq!(names(&sink), ["A", "B", "C"]);
    assert_eq!(report.stop_reason, StopReason::PageCapReached);
    assert_eq!(fetcher.calls(), [1, 2, 3]);
}

#[tokio::test]
async fn page_cap_stops_the_crawl_without_further_fetches() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_page(2, vec![venue("B")])
        .with_page(3, vec![venue("C")]);
    let sink = MemorySink::new();

    let report = crawl(&config().with_max_pages(2), &fetcher, &NoopPacer, &sink)
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), [1, 2]);
    assert_eq!(report.stop_reason, StopReason::PageCapReached);
    assert_eq!(names(&sink), ["A", "B"]);
}

#[tokio::test]
async fn a_fetch_failure_ends_the_crawl_but_keeps_partial_output() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_failure(2);
    let sink = MemorySink::new();

    let report = crawl(&config(), &fetcher, &NoopPacer, &sink)
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::FetchFailed);
    assert_eq!(names(&sink), ["A"]);
    // No retry: the failing page was attempted exactly once.
    assert_eq!(fetcher.calls(), [1, 2]);
    assert!(report.wrote_output);
}

#[tokio::test]
async fn zero_records_skips_the_sink_write() {
    let fetcher = MockPageFetcher::new();
    let sink = MemorySink::new();

    let report = crawl(&config(), &fetcher, &NoopPacer, &sink)
        .await
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::EmptyPage);
    assert_eq!(report.records_kept, 0);
    assert!(!report.wrote_output);
    assert_eq!(sink.write_count(), 0);
    assert_eq!(sink.reset_count(), 1);
}

#[tokio::test]
async fn paces_before_the_first_fetch_and_between_pages() {
    let fetcher = MockPageFetcher::new()
        .with_page(1, vec![venue("A")])
        .with_page(2, vec![venue("B")]);
    let sink = MemorySink::new();
    let pacer = CountingPacer::new();

    crawl(&config(), &fetcher, &pacer, &sink).await.unwrap();

    // One initial pause, one after each of pages 1 and 2; page 3
    // terminates, so no pause follows it.
    assert_eq!(fetcher.fetch_count(), 3);
    assert_eq!(pacer.pause_count(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Whatever the page mix, the final output never repeats an identity
    // and never invents one (pages themselves carry no repeats here).
    #[test]
    fn output_identities_are_unique_and_come_from_the_pages(
        pages in prop::collection::vec(
            prop::collection::btree_set("[a-d]", 0..4usize),
            1..5usize,
        )
    ) {
        let mut fetcher = MockPageFetcher::new();
        let mut all_names = BTreeSet::new();
        for (i, page) in pages.iter().enumerate() {
            let records = page.iter().map(|n| venue(n)).collect();
            fetcher = fetcher.with_page(i as u32 + 1, records);
            all_names.extend(page.iter().cloned());
        }
        let sink = MemorySink::new();

        let report = tokio_test::block_on(crawl(&config(), &fetcher, &NoopPacer, &sink)).unwrap();

        let output = names(&sink);
        let distinct: BTreeSet<_> = output.iter().cloned().collect();
        prop_assert_eq!(distinct.len(), output.len());
        prop_assert!(distinct.is_subset(&all_names));
        prop_assert_eq!(report.records_kept, output.len());
    }
}
