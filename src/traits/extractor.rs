//! RecordExtractor trait abstracting the LLM-backed extraction call.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Cumulative usage accounting for an extraction backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorUsage {
    /// Number of extraction requests issued
    pub requests: u64,

    /// Prompt tokens consumed, as reported by the backend
    pub prompt_tokens: u64,

    /// Completion tokens consumed, as reported by the backend
    pub completion_tokens: u64,
}

impl ExtractorUsage {
    /// Total tokens consumed across all requests.
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Maps raw page content to candidate record objects.
///
/// Candidates come back as raw JSON objects rather than typed records so
/// the fetcher can apply required-field validation before deserializing;
/// an LLM is free to omit or null fields and those candidates get dropped,
/// not propagated as errors.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    /// Extract candidate record objects from page content.
    async fn extract(&self, content: &str) -> FetchResult<Vec<serde_json::Value>>;

    /// Cumulative usage across the run.
    fn usage(&self) -> ExtractorUsage {
        ExtractorUsage::default()
    }

    /// Get the extractor name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tokens_sums_both_sides() {
        let usage = ExtractorUsage {
            requests: 2,
            prompt_tokens: 1200,
            completion_tokens: 300,
        };
        assert_eq!(usage.total_tokens(), 1500);
    }
}
