//! Gateway Error Types
//!
//! Every failure the forwarder can produce, plus the mapping from each one to
//! an HTTP status and a JSON error envelope.

use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Main error type for gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Startup configuration is unusable (no keys, bad port, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model or prompt absent from the request
    #[error("Both 'model' and 'prompt' parameters are required.")]
    MissingField,

    /// Alias not present in the registry
    #[error("Invalid model name: '{}'. Available models: {}", .alias, .available.join(", "))]
    UnknownModel {
        alias: String,
        available: Vec<String>,
    },

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {status}: {detail}")]
    UpstreamError { status: u16, detail: String },

    /// No response from upstream (connect failure, timeout)
    #[error("Upstream API unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upstream succeeded but carried no usable completion text
    #[error("Upstream returned no usable completion: {0}")]
    MalformedUpstreamResponse(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingField | GatewayError::UnknownModel { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::UpstreamUnreachable(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Config(_)
            | GatewayError::MalformedUpstreamResponse(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error envelope, stamped with the gateway author
    pub fn to_body(&self, author: &str) -> Value {
        match self {
            GatewayError::UpstreamError { detail, .. } => json!({
                "author": author,
                "error": "Error calling upstream API",
                "details": detail,
            }),
            GatewayError::MalformedUpstreamResponse(detail) => json!({
                "author": author,
                "error": "Upstream returned an empty or malformed completion",
                "details": detail,
            }),
            GatewayError::Internal(detail) | GatewayError::Config(detail) => json!({
                "author": author,
                "error": "Internal server error",
                "details": detail,
            }),
            other => json!({
                "author": author,
                "error": other.to_string(),
            }),
        }
    }

    /// Whether the caller is at fault (never forwarded upstream)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingField | GatewayError::UnknownModel { .. }
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest errors carry the URL but never the request headers
        if err.is_timeout() {
            GatewayError::UpstreamUnreachable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            GatewayError::UpstreamUnreachable(format!("connection failed: {}", err))
        } else if err.is_request() || err.is_body() {
            GatewayError::UpstreamUnreachable(err.to_string())
        } else if err.is_decode() {
            GatewayError::MalformedUpstreamResponse(format!("failed to decode response: {}", err))
        } else {
            GatewayError::Internal(err.to_string())
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
