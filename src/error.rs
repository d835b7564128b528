//! Typed errors for the crawler.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. The binary entry point is
//! the only place `anyhow` appears.

use thiserror::Error;

/// Errors that can occur during a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Page fetch or extraction failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Output persistence failed
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while fetching and extracting a listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success HTTP status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Page URL could not be built from the configured base URL
    #[error("invalid page URL: {url}")]
    InvalidUrl { url: String },

    /// Configured CSS selector failed to parse
    #[error("invalid CSS selector: {selector}")]
    Selector { selector: String },

    /// Extraction backend rejected the API key
    #[error("extraction backend authentication failed")]
    AuthFailed,

    /// Extraction backend rate limit exceeded
    #[error("extraction backend rate limit exceeded")]
    RateLimited,

    /// Extraction response did not have the expected shape
    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while persisting the accumulated records.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while assembling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required setting absent from the environment
    #[error("missing required setting: {name}")]
    Missing { name: String },

    /// Setting present but unusable
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
