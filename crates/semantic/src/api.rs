use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use crate::normalize::l2_normalize_in_place;
use crate::retry::{execute_with_retry_async, RetryConfig};
use crate::{Encoder, SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

/// Encoder backed by a remote feature-extraction endpoint.
///
/// Supports Hugging Face inference (`{"inputs": ...}`), OpenAI-compatible
/// embedding endpoints (`{"input": ..., "model": ...}`) and a plain custom
/// shape (`{"texts": [...]}`). Every returned vector is checked against the
/// configured dimension.
pub struct ApiEncoder {
    url: String,
    provider: ApiProviderKind,
    model_name: String,
    dimension: usize,
    auth_header: Option<String>,
    normalize: bool,
    retry: RetryConfig,
    client: reqwest::Client,
}

impl ApiEncoder {
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                SemanticError::InvalidConfig("api_url is required for api mode".into())
            })?;
        if cfg.dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "embedding dimension must be greater than zero".into(),
            ));
        }

        let timeout = Duration::from_secs(cfg.api_timeout_secs.unwrap_or(30));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            url,
            provider: api_provider_kind(cfg.api_provider.as_deref()),
            model_name: cfg.model_name.clone(),
            dimension: cfg.dimension,
            auth_header: cfg.api_token.as_ref().map(|t| format!("Bearer {t}")),
            normalize: cfg.normalize,
            retry: cfg.retry_config.unwrap_or_default(),
            client,
        })
    }

    async fn send(&self, payload: &Value) -> Result<Value, SemanticError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SemanticError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Http {
                status: status.as_u16(),
                body: truncate(&body, 256),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::Inference(format!("invalid JSON response: {e}")))
    }

    fn finish(&self, vectors: Vec<Vec<f32>>, expected: usize) -> Result<Vec<Vec<f32>>, SemanticError> {
        if vectors.len() != expected {
            return Err(SemanticError::Inference(format!(
                "API returned {} embeddings for {} inputs",
                vectors.len(),
                expected
            )));
        }

        let mut out = Vec::with_capacity(vectors.len());
        for mut vector in vectors {
            if vector.len() != self.dimension {
                return Err(SemanticError::DimensionMismatch {
                    expected: self.dimension,
                    got: vector.len(),
                });
            }
            if self.normalize {
                l2_normalize_in_place(&mut vector);
            }
            out.push(vector);
        }
        Ok(out)
    }
}

#[async_trait]
impl Encoder for ApiEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let mut vectors = self.encode_batch(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| SemanticError::Inference("API response did not contain embeddings".into()))
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = build_api_payload(self.provider, texts, &self.model_name);
        let outcome = execute_with_retry_async(&self.retry, SemanticError::is_transient, |attempt| {
            let payload = &payload;
            async move {
                if attempt > 0 {
                    tracing::warn!(attempt, model = %self.model_name, "retrying embedding request");
                }
                self.send(payload).await
            }
        })
        .await;

        let attempts = outcome.attempts;
        let response = outcome.into_result().inspect_err(|err| {
            tracing::error!(attempts, error = %err, "embedding request failed");
        })?;

        let vectors = parse_embeddings_from_value(response)?;
        self.finish(vectors, texts.len())
    }
}

fn api_provider_kind(provider: Option<&str>) -> ApiProviderKind {
    match provider.unwrap_or("custom").to_ascii_lowercase().as_str() {
        "hf" | "huggingface" => ApiProviderKind::HuggingFace,
        "openai" | "gpt" => ApiProviderKind::OpenAI,
        _ => ApiProviderKind::Custom,
    }
}

fn build_api_payload(provider: ApiProviderKind, texts: &[&str], model_name: &str) -> Value {
    match provider {
        ApiProviderKind::HuggingFace => json!({ "inputs": texts }),
        ApiProviderKind::OpenAI => json!({ "input": texts, "model": model_name }),
        ApiProviderKind::Custom => json!({ "texts": texts }),
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut vectors = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(mut obj) => match obj.remove("embedding") {
                            Some(embedding) => vectors.push(parse_embedding_vector(embedding)?),
                            None => {
                                return Err(SemanticError::Inference(
                                    "missing `embedding` field in data item".into(),
                                ))
                            }
                        },
                        _ => {
                            return Err(SemanticError::Inference(
                                "unexpected entry inside `data` array".into(),
                            ))
                        }
                    }
                }
                return Ok(vectors);
            }

            Err(SemanticError::Inference("unsupported API response shape".into()))
        }
        other => parse_embedding_collection(other),
    }
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                item.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::Inference("embedding contains a non-numeric value".into())
                })
            })
            .collect(),
        _ => Err(SemanticError::Inference("embedding is not an array".into())),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
