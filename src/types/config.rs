//! Crawl configuration.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigError, ConfigResult};
use crate::types::record::VenueRecord;

/// Configuration for one crawl run.
///
/// Supplied at startup and immutable for the run. Defaults mirror the
/// production crawl: a 50-page safety cap, a 5-page duplicate streak limit,
/// and a 60-90 second pause between requests to stay inside the extraction
/// backend's rate limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Listing URL for page 1; later pages add a `page` query parameter
    pub base_url: String,

    /// CSS selector narrowing each page to the listing content.
    /// Empty means the whole page body is handed to extraction.
    pub css_selector: String,

    /// Session label attached to the run, mostly for log correlation
    pub session_id: String,

    /// Fields a candidate record must populate to be kept
    pub required_fields: Vec<String>,

    /// Hard page cap preventing infinite pagination
    pub max_pages: u32,

    /// Consecutive all-duplicate pages tolerated before stopping
    pub max_duplicate_streak: usize,

    /// Lower bound of the inter-request pause, in seconds
    pub delay_min_secs: u64,

    /// Upper bound of the inter-request pause, in seconds
    pub delay_max_secs: u64,

    /// Marker text whose presence means the site ran out of results
    pub no_results_marker: String,

    /// Where the accumulated records are written
    pub output_path: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            css_selector: String::new(),
            session_id: format!("venue-crawl-{}", Uuid::new_v4()),
            required_fields: VenueRecord::REQUIRED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            max_pages: 50,
            max_duplicate_streak: 5,
            delay_min_secs: 60,
            delay_max_secs: 90,
            no_results_marker: "No Results Found".to_string(),
            output_path: PathBuf::from("complete_venues.csv"),
        }
    }
}

impl CrawlConfig {
    /// Create a config for a listing URL, defaults elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the CSS selector.
    pub fn with_css_selector(mut self, selector: impl Into<String>) -> Self {
        self.css_selector = selector.into();
        self
    }

    /// Set the session label.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the duplicate streak limit.
    pub fn with_max_duplicate_streak(mut self, streak: usize) -> Self {
        self.max_duplicate_streak = streak;
        self
    }

    /// Set the inter-request pause bounds, in seconds.
    pub fn with_delay_secs(mut self, min: u64, max: u64) -> Self {
        self.delay_min_secs = min;
        self.delay_max_secs = max;
        self
    }

    /// Set the output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the no-results marker text.
    pub fn with_no_results_marker(mut self, marker: impl Into<String>) -> Self {
        self.no_results_marker = marker.into();
        self
    }

    /// Build a config from the environment.
    ///
    /// `VENUE_BASE_URL` is required. Recognized overrides:
    /// `VENUE_CSS_SELECTOR`, `VENUE_OUTPUT_PATH`, `VENUE_NO_RESULTS_MARKER`,
    /// `VENUE_MAX_PAGES`, `VENUE_MAX_DUPLICATE_STREAK`,
    /// `VENUE_DELAY_MIN_SECS`, `VENUE_DELAY_MAX_SECS`.
    pub fn from_env() -> ConfigResult<Self> {
        let base_url = env::var("VENUE_BASE_URL").map_err(|_| ConfigError::Missing {
            name: "VENUE_BASE_URL".to_string(),
        })?;

        let mut config = Self::new(base_url);

        if let Ok(selector) = env::var("VENUE_CSS_SELECTOR") {
            config.css_selector = selector;
        }
        if let Ok(path) = env::var("VENUE_OUTPUT_PATH") {
            config.output_path = PathBuf::from(path);
        }
        if let Ok(marker) = env::var("VENUE_NO_RESULTS_MARKER") {
            config.no_results_marker = marker;
        }
        if let Some(max_pages) = parse_var("VENUE_MAX_PAGES")? {
            config.max_pages = max_pages;
        }
        if let Some(streak) = parse_var("VENUE_MAX_DUPLICATE_STREAK")? {
            config.max_duplicate_streak = streak;
        }
        if let Some(min) = parse_var("VENUE_DELAY_MIN_SECS")? {
            config.delay_min_secs = min;
        }
        if let Some(max) = parse_var("VENUE_DELAY_MAX_SECS")? {
            config.delay_max_secs = max;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject bounds that cannot drive a crawl.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.delay_min_secs > self.delay_max_secs {
            return Err(ConfigError::InvalidValue {
                name: "VENUE_DELAY_MIN_SECS".to_string(),
                value: format!(
                    "{} (greater than max {})",
                    self.delay_min_secs, self.delay_max_secs
                ),
            });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                name: "VENUE_MAX_PAGES".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> ConfigResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
