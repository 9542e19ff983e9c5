//! Gateway Configuration
//!
//! The validated settings the server starts from.

use crate::error::{GatewayError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_AUTHOR: &str = "ehsan fazli";

/// Gateway configuration
#[derive(Clone)]
pub struct GatewayConfig {
    /// Host address to listen on
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Upstream API keys, in rotation order
    pub api_keys: Vec<String>,

    /// Upstream API base URL (without `/chat/completions`)
    pub base_url: String,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,

    /// Value of the `author` field in every response
    pub author: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Check the configuration can serve traffic
    pub fn validate(&self) -> Result<()> {
        if self.api_keys.is_empty() {
            return Err(GatewayError::Config(
                "No API keys configured. Set KEY1..KEY6 or API_KEYS".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::Config(
                "Upstream timeout must be at least 1 second".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(GatewayError::Config("Upstream base URL is empty".to_string()));
        }
        Ok(())
    }

    /// Upstream request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the upstream chat completion endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("author", &self.author)
            .finish()
    }
}
