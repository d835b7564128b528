use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use venue_crawler::{
    crawl, CrawlConfig, CsvSink, HttpPageFetcher, OpenAiExtractor, RecordExtractor,
    UniformDelayPacer,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = CrawlConfig::from_env().context("loading crawl configuration")?;
    let extractor = OpenAiExtractor::from_env().context("configuring extraction backend")?;
    let fetcher = HttpPageFetcher::new(extractor);
    let pacer = UniformDelayPacer::from_config(&config);
    let sink = CsvSink::from_config(&config);

    let report = crawl(&config, &fetcher, &pacer, &sink)
        .await
        .context("running crawl")?;

    info!(
        pages_fetched = report.pages_fetched,
        records_kept = report.records_kept,
        duplicates_skipped = report.duplicates_skipped,
        stop_reason = %report.stop_reason,
        wrote_output = report.wrote_output,
        "crawl complete"
    );

    let usage = fetcher.extractor().usage();
    info!(
        requests = usage.requests,
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens(),
        "extraction usage"
    );

    Ok(())
}
