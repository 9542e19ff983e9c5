//! chatgate - Lightweight Chat Completion Gateway
//!
//! Forwards single-prompt chat requests to an OpenAI-compatible upstream,
//! translating short model aliases to upstream model ids and rotating
//! through a pool of API keys round-robin.

use tracing::{debug, error, info, warn};

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod router;
pub mod server;

use api::{strip_reasoning, CompletionRequest};
use client::HttpClient;
use config::GatewayConfig;
use error::{GatewayError, Result};
use router::{AliasRegistry, KeyPool};
use serde::Deserialize;

/// An inbound chat request, from either the query string or a JSON body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Model alias, e.g. `gemma`
    #[serde(default)]
    pub model: Option<String>,

    /// User prompt
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            prompt: Some(prompt.into()),
        }
    }
}

/// The chat forwarder
#[derive(Debug)]
pub struct ChatGateway {
    /// Alias to upstream model id table
    registry: AliasRegistry,

    /// Upstream API keys
    key_pool: KeyPool,

    /// HTTP client
    http_client: HttpClient,

    /// Upstream `/chat/completions` URL
    completions_url: String,
}

impl ChatGateway {
    /// Create a gateway from its parts
    pub fn new(
        registry: AliasRegistry,
        key_pool: KeyPool,
        http_client: HttpClient,
        completions_url: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            key_pool,
            http_client,
            completions_url: completions_url.into(),
        }
    }

    /// Create a gateway with the built-in alias table from a config
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::new(
            AliasRegistry::builtin(),
            KeyPool::new(config.api_keys.clone())?,
            HttpClient::new(config.timeout())?,
            config.completions_url(),
        ))
    }

    /// The alias table
    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    /// The API key pool
    pub fn key_pool(&self) -> &KeyPool {
        &self.key_pool
    }

    /// Known model aliases, in registry order
    pub fn models(&self) -> Vec<&str> {
        self.registry.aliases()
    }

    /// Forward a chat request upstream and return the cleaned completion text
    pub async fn handle(&self, request: ChatRequest) -> Result<String> {
        let (alias, prompt) = match (non_empty(request.model), non_empty(request.prompt)) {
            (Some(alias), Some(prompt)) => (alias, prompt),
            _ => return Err(GatewayError::MissingField),
        };

        let upstream_model = self.registry.resolve(&alias).ok_or_else(|| {
            GatewayError::UnknownModel {
                alias: alias.clone(),
                available: self.models().into_iter().map(String::from).collect(),
            }
        })?;

        let key = self.key_pool.next_key();
        info!(
            "Forwarding '{}' -> {} using {}",
            alias,
            upstream_model,
            key.label()
        );

        let body = CompletionRequest::single_turn(upstream_model, prompt);
        let result = self
            .http_client
            .post_completion(&self.completions_url, &body, key.value())
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    GatewayError::UpstreamError { status, detail } => {
                        warn!("Upstream returned {} for {}: {}", status, key.label(), detail)
                    }
                    other => error!("Upstream call with {} failed: {}", key.label(), other),
                }
                return Err(e);
            }
        };

        if let Some(usage) = &response.usage {
            debug!(
                "Usage for '{}': {} prompt + {} completion tokens",
                alias, usage.prompt_tokens, usage.completion_tokens
            );
        }

        let text = response
            .content()
            .map(|content| strip_reasoning(&content))
            .unwrap_or_default();

        if text.is_empty() {
            warn!("Upstream returned no usable content for '{}'", alias);
            return Err(GatewayError::MalformedUpstreamResponse(
                "completion content is empty".to_string(),
            ));
        }

        Ok(text)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
