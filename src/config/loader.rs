//! Configuration Loader
//!
//! Builds a [`GatewayConfig`] from environment variables or a dotenv file.
//!
//! Recognized variables:
//!
//! | Variable                | Effect                                   |
//! |-------------------------|------------------------------------------|
//! | `HOST`                  | listen address                           |
//! | `PORT`                  | listen port                              |
//! | `KEY1`..`KEY6`          | API keys, in rotation order              |
//! | `API_KEYS`              | extra comma-separated keys, appended     |
//! | `UPSTREAM_BASE_URL`     | upstream API base URL                    |
//! | `UPSTREAM_TIMEOUT_SECS` | upstream request timeout                 |
//! | `GATEWAY_AUTHOR`        | `author` field of every response         |

use crate::config::gateway::GatewayConfig;
use crate::error::{GatewayError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Individually numbered key variables, in rotation order
pub const KEY_VARS: [&str; 6] = ["KEY1", "KEY2", "KEY3", "KEY4", "KEY5", "KEY6"];

/// Comma-separated list of additional keys
pub const KEY_LIST_VAR: &str = "API_KEYS";

/// Configuration loader over a variable lookup
#[derive(Debug)]
pub struct ConfigLoader {
    config: GatewayConfig,
}

impl ConfigLoader {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from a dotenv-style file without touching the process environment
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut vars = HashMap::new();
        for item in iter {
            let (name, value) = item.map_err(|e| {
                GatewayError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?;
            vars.insert(name, value);
        }

        Self::from_lookup(|name| vars.get(name).cloned())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = GatewayConfig::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }

        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|_| GatewayError::Config(format!("Invalid PORT '{}'", port)))?;
        }

        if let Some(url) = get("UPSTREAM_BASE_URL") {
            config.base_url = url;
        }

        if let Some(timeout) = get("UPSTREAM_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                GatewayError::Config(format!("Invalid UPSTREAM_TIMEOUT_SECS '{}'", timeout))
            })?;
        }

        if let Some(author) = get("GATEWAY_AUTHOR") {
            config.author = author;
        }

        let numbered = KEY_VARS.iter().filter_map(|name| get(*name));
        let listed = get(KEY_LIST_VAR)
            .map(|list| {
                list.split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        for key in numbered.chain(listed) {
            if !config.api_keys.contains(&key) {
                config.api_keys.push(key);
            }
        }

        Ok(Self { config })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Take ownership of the configuration
    pub fn into_config(self) -> GatewayConfig {
        self.config
    }
}
