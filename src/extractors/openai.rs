//! Extraction backend speaking the OpenAI chat-completions protocol.
//!
//! Works against any OpenAI-compatible endpoint; the production crawl
//! points it at Groq. Prompting is deliberately plain: one system message
//! describing the record shape, the page content as the user message, and
//! temperature zero.

use std::env;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, FetchError, FetchResult};
use crate::traits::extractor::{ExtractorUsage, RecordExtractor};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const SYSTEM_PROMPT: &str = "You extract venue listings from web page content. \
Respond with a JSON array of objects, one object per venue, each with exactly \
these fields: name (string), price (string), location (string), capacity \
(string), rating (number), reviews (integer), description (string). Include \
every venue present in the content and nothing else. Respond with the JSON \
array only.";

/// LLM-backed record extractor over an OpenAI-compatible API.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    api_base: String,
    api_key: SecretString,
    model: String,
    max_content_chars: usize,
    requests: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
}

impl OpenAiExtractor {
    /// Create an extractor with an explicit key and model, pointed at the
    /// OpenAI API base.
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to create HTTP client"),
            api_base: OPENAI_API_BASE.to_string(),
            api_key,
            model: model.into(),
            max_content_chars: 24_000,
            requests: AtomicU64::new(0),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        }
    }

    /// Build an extractor from the environment.
    ///
    /// `GROQ_API_KEY` takes precedence (pointing at the Groq endpoint with
    /// a Llama model); `OPENAI_API_KEY` is the fallback. The model can be
    /// overridden with `VENUE_EXTRACTION_MODEL`.
    pub fn from_env() -> ConfigResult<Self> {
        let (key, api_base, default_model) = if let Ok(key) = env::var("GROQ_API_KEY") {
            (key, GROQ_API_BASE, "llama-3.1-8b-instant")
        } else if let Ok(key) = env::var("OPENAI_API_KEY") {
            (key, OPENAI_API_BASE, "gpt-4o-mini")
        } else {
            return Err(ConfigError::Missing {
                name: "GROQ_API_KEY or OPENAI_API_KEY".to_string(),
            });
        };

        let model = env::var("VENUE_EXTRACTION_MODEL").unwrap_or_else(|_| default_model.to_string());

        Ok(Self::new(SecretString::from(key), model).with_api_base(api_base))
    }

    /// Point at a different OpenAI-compatible base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap how much page content is sent per request.
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    fn request_body(&self, content: &str) -> Value {
        json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": self.truncated(content) },
            ],
        })
    }

    fn truncated(&self, content: &str) -> String {
        if content.chars().count() <= self.max_content_chars {
            content.to_string()
        } else {
            content.chars().take(self.max_content_chars).collect()
        }
    }

    fn record_usage(&self, response: &Value) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if let Some(tokens) = response.pointer("/usage/prompt_tokens").and_then(Value::as_u64) {
            self.prompt_tokens.fetch_add(tokens, Ordering::Relaxed);
        }
        if let Some(tokens) = response
            .pointer("/usage/completion_tokens")
            .and_then(Value::as_u64)
        {
            self.completion_tokens.fetch_add(tokens, Ordering::Relaxed);
        }
    }

    /// Parse the model's reply into candidate objects.
    ///
    /// Tolerates a fenced code block and a `{"venues": [...]}` style
    /// wrapper around the array.
    fn parse_candidates(reply: &str) -> FetchResult<Vec<Value>> {
        let stripped = strip_code_fence(reply);
        let parsed: Value = serde_json::from_str(stripped.trim())?;

        match parsed {
            Value::Array(items) => Ok(items),
            Value::Object(map) => map
                .into_iter()
                .find_map(|(_, value)| match value {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| {
                    FetchError::MalformedResponse("object reply contains no array".to_string())
                }),
            other => Err(FetchError::MalformedResponse(format!(
                "expected a JSON array, got {}",
                kind_of(&other)
            ))),
        }
    }
}

#[async_trait]
impl RecordExtractor for OpenAiExtractor {
    async fn extract(&self, content: &str) -> FetchResult<Vec<Value>> {
        let body = self.request_body(content);
        debug!(model = %self.model, content_chars = content.len(), "requesting extraction");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => return Err(FetchError::AuthFailed),
            429 => return Err(FetchError::RateLimited),
            _ if !status.is_success() => {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: format!("{}/chat/completions", self.api_base),
                })
            }
            _ => {}
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        self.record_usage(&response_json);

        let reply = response_json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                FetchError::MalformedResponse("no content in chat completion".to_string())
            })?;

        Self::parse_candidates(reply)
    }

    fn usage(&self) -> ExtractorUsage {
        ExtractorUsage {
            requests: self.requests.load(Ordering::Relaxed),
            prompt_tokens: self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
        }
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}

/// Drop a surrounding Markdown code fence, if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
