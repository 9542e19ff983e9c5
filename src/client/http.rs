//! HTTP Client
//!
//! Async upstream client with a bounded timeout. Classifies every outcome of
//! a completion call into the gateway error taxonomy.

use crate::api::CompletionResponse;
use crate::error::{GatewayError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Longest upstream error body echoed back to callers
const MAX_DETAIL_LEN: usize = 500;

/// HTTP client for the upstream completion API
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// POST a completion request, authorized with `api_key` as a bearer token
    pub async fn post_completion<T>(
        &self,
        url: &str,
        body: &T,
        api_key: &str,
    ) -> Result<CompletionResponse>
    where
        T: Serialize,
    {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| GatewayError::Internal("API key is not a valid header value".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                GatewayError::MalformedUpstreamResponse(format!(
                    "Failed to parse response: {}. Body: {}",
                    e,
                    truncate(&redact(&text, api_key), MAX_DETAIL_LEN)
                ))
            });
        }

        Err(GatewayError::UpstreamError {
            status: status.as_u16(),
            detail: scrubbed_detail(&text, api_key),
        })
    }
}

/// Pull a human-readable message out of an upstream error body
pub fn error_detail(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return truncate(body.trim(), MAX_DETAIL_LEN);
    };

    let message = match json.get("error") {
        Some(Value::Object(error)) => error.get("message").and_then(Value::as_str),
        Some(Value::String(error)) => Some(error.as_str()),
        _ => None,
    }
    .or_else(|| json.get("message").and_then(Value::as_str));

    match message {
        Some(message) => message.to_string(),
        None => truncate(&json.to_string(), MAX_DETAIL_LEN),
    }
}

/// Error detail with `api_key` removed from both the raw body and the
/// extracted message (JSON escaping can hide it from the first pass)
pub fn scrubbed_detail(body: &str, api_key: &str) -> String {
    redact(&error_detail(&redact(body, api_key)), api_key)
}

/// Replace every occurrence of `secret` in `text`
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "[REDACTED]")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
