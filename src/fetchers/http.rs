//! HTTP page fetcher: GET, narrow, extract, validate.
//!
//! Composes an HTTP GET of the listing page, an optional CSS-selector
//! narrowing pass, the LLM-backed extraction call, and required-field
//! validation into one [`PageFetcher`].

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::{extractor::RecordExtractor, fetcher::PageFetcher};
use crate::types::{config::CrawlConfig, page::FetchedPage, record::VenueRecord};

const DEFAULT_USER_AGENT: &str = "venue-crawler/0.1";

/// Production page fetcher over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use venue_crawler::{HttpPageFetcher, OpenAiExtractor};
///
/// let fetcher = HttpPageFetcher::new(OpenAiExtractor::from_env()?);
/// let page = fetcher.fetch_page(1, &config).await?;
/// ```
pub struct HttpPageFetcher<E> {
    client: reqwest::Client,
    extractor: E,
    user_agent: String,
}

impl<E: RecordExtractor> HttpPageFetcher<E> {
    /// Create a fetcher around an extraction backend.
    pub fn new(extractor: E) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            extractor,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Access the wrapped extractor (for usage reporting).
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Build the URL for a page: page 1 is the bare base URL, later pages
    /// add a `page` query parameter.
    fn page_url(base_url: &str, page_number: u32) -> FetchResult<Url> {
        let mut url = Url::parse(base_url).map_err(|_| FetchError::InvalidUrl {
            url: base_url.to_string(),
        })?;
        if page_number > 1 {
            url.query_pairs_mut()
                .append_pair("page", &page_number.to_string());
        }
        Ok(url)
    }

    /// Reduce the page body to the parts matching the configured selector.
    ///
    /// An empty selector passes the whole body through.
    fn narrow_content(body: &str, selector: &str) -> FetchResult<String> {
        if selector.trim().is_empty() {
            return Ok(body.to_string());
        }

        let parsed = Selector::parse(selector).map_err(|_| FetchError::Selector {
            selector: selector.to_string(),
        })?;

        let document = Html::parse_document(body);
        let fragments: Vec<String> = document.select(&parsed).map(|el| el.html()).collect();
        Ok(fragments.join("\n"))
    }

    /// A candidate survives only when every required field is present,
    /// non-null, and (for strings) non-empty.
    fn candidate_is_complete(candidate: &serde_json::Value, required_fields: &[String]) -> bool {
        let Some(object) = candidate.as_object() else {
            return false;
        };
        required_fields.iter().all(|field| match object.get(field) {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        })
    }
}

#[async_trait]
impl<E: RecordExtractor> PageFetcher for HttpPageFetcher<E> {
    async fn fetch_page(&self, page_number: u32, config: &CrawlConfig) -> FetchResult<FetchedPage> {
        let url = Self::page_url(&config.base_url, page_number)?;
        debug!(%url, page_number, "fetching listing page");

        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        if body.contains(&config.no_results_marker) {
            info!(page_number, "page carries the no-results marker");
            return Ok(FetchedPage::no_results(page_number));
        }

        let content = Self::narrow_content(&body, &config.css_selector)?;
        if content.trim().is_empty() {
            debug!(page_number, "selector matched nothing");
            return Ok(FetchedPage::empty(page_number));
        }

        let candidates = self.extractor.extract(&content).await?;

        let mut records = Vec::new();
        for candidate in candidates {
            if !Self::candidate_is_complete(&candidate, &config.required_fields) {
                warn!(page_number, "dropping incomplete candidate record");
                continue;
            }
            match serde_json::from_value::<VenueRecord>(candidate) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(page_number, %error, "dropping undeserializable candidate");
                }
            }
        }

        info!(page_number, records = records.len(), "page extracted");
        Ok(FetchedPage::new(page_number, records))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;

    type Fetcher = HttpPageFetcher<MockExtractor>;

    #[test]
    fn page_one_uses_the_bare_base_url() {
        let url = Fetcher::page_url("https://example.test/venues?region=atl", 1).unwrap();
        assert_eq!(url.as_str(), "https://example.test/venues?region=atl");
    }

    #[test]
    fn later_pages_append_a_page_parameter() {
        let url = Fetcher::page_url("https://example.test/venues?region=atl", 3).unwrap();
        assert!(url.query().unwrap().contains("page=3"));
        assert!(url.query().unwrap().contains("region=atl"));
    }

    #[test]
    fn unparseable_base_url_is_rejected() {
        let result = Fetcher::page_url("not a url", 1);
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn narrowing_keeps_only_selector_matches() {
        let body = r#"<html><body>
            <div class="listing"><h2>The Grand Hall</h2></div>
            <footer>ignore me</footer>
        </body></html>"#;
        let content = Fetcher::narrow_content(body, ".listing").unwrap();
        assert!(content.contains("The Grand Hall"));
        assert!(!content.contains("ignore me"));
    }

    #[test]
    fn empty_selector_passes_the_body_through() {
        let body = "<html><body>everything</body></html>";
        let content = Fetcher::narrow_content(body, "  ").unwrap();
        assert_eq!(content, body);
    }

    #[test]
    fn bad_selector_is_a_config_level_error() {
        let result = Fetcher::narrow_content("<html></html>", "[[[");
        assert!(matches!(result, Err(FetchError::Selector { .. })));
    }

    #[test]
    fn complete_candidates_pass_validation() {
        let required: Vec<String> = VenueRecord::REQUIRED_FIELDS
            .iter()
            .map(|f| f.to_string())
            .collect();
        let candidate = serde_json::json!({
            "name": "A", "price": "$", "location": "L", "capacity": "10",
            "rating": 4.0, "reviews": 3, "description": "D"
        });
        assert!(Fetcher::candidate_is_complete(&candidate, &required));
    }

    #[test]
    fn missing_null_or_blank_fields_fail_validation() {
        let required = vec!["name".to_string(), "price".to_string()];
        let missing = serde_json::json!({ "name": "A" });
        let null = serde_json::json!({ "name": "A", "price": null });
        let blank = serde_json::json!({ "name": "A", "price": "  " });
        let not_an_object = serde_json::json!("just a string");

        assert!(!Fetcher::candidate_is_complete(&missing, &required));
        assert!(!Fetcher::candidate_is_complete(&null, &required));
        assert!(!Fetcher::candidate_is_complete(&blank, &required));
        assert!(!Fetcher::candidate_is_complete(&not_an_object, &required));
    }
}
