use serde::{Deserialize, Serialize};
use std::fmt;

use crate::retry::RetryConfig;

/// Environment variable overriding [`SemanticConfig::api_url`].
pub const API_URL_ENV: &str = "SCHEMARAG_EMBEDDING_API_URL";
/// Environment variable holding the bearer token for the embedding API.
pub const API_TOKEN_ENV: &str = "SCHEMARAG_EMBEDDING_API_TOKEN";

/// Runtime configuration describing which encoder to build and how to post-process vectors.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction".into()),
///     api_provider: Some("hf".into()),
///     ..Default::default()
/// };
/// assert_eq!(cfg.dimension, 384);
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Encoder selector: `"hashed"` (local, deterministic) or `"api"` (remote HTTP).
    pub mode: String,
    /// Friendly model label; also sent as the `model` field to OpenAI-style endpoints.
    pub model_name: String,
    /// Vector dimension. Fixed for the process lifetime and checked against every API response.
    pub dimension: usize,
    /// Feature-extraction endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Bearer token for the API. Only ever read from the environment.
    #[serde(skip)]
    pub api_token: Option<String>,
    /// Normalize vectors to unit length.
    pub normalize: bool,
    /// Retry policy for API calls. `None` uses [`RetryConfig::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "hashed".into(),
            model_name: "all-MiniLM-L6-v2".into(),
            dimension: 384,
            api_url: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            api_token: None,
            normalize: true,
            retry_config: None,
        }
    }
}

impl SemanticConfig {
    /// Apply `SCHEMARAG_EMBEDDING_API_URL` / `SCHEMARAG_EMBEDDING_API_TOKEN` when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env(API_URL_ENV) {
            self.api_url = Some(url);
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
        self
    }
}

impl fmt::Debug for SemanticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticConfig")
            .field("mode", &self.mode)
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("api_url", &self.api_url)
            .field("api_provider", &self.api_provider)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("normalize", &self.normalize)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
