//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, warn};

use semantic::retry::{execute_with_retry_async, RetryConfig};

use crate::{GenerationConfig, GenerationError, SqlGenerator};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY: usize = 256;

pub struct GeminiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    retry: RetryConfig,
}

impl GeminiGenerator {
    /// Build a generator. Fails when the credential is absent or the config
    /// is invalid.
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint_for(&config.base_url, &config.model),
            model: config.model.clone(),
            api_key,
            retry: config.retry_config(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call_once(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(http_error(status, &text));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        parse_response(&value)
    }
}

#[async_trait]
impl SqlGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let outcome = execute_with_retry_async(
            &self.retry,
            GenerationError::is_transient,
            |attempt| {
                if attempt > 0 {
                    debug!(attempt, model = %self.model, "retrying generation request");
                }
                self.call_once(prompt)
            },
        )
        .await;

        if let Err(err) = &outcome.result {
            warn!(
                attempts = outcome.attempts,
                elapsed_ms = outcome.total_duration.as_millis() as u64,
                error = %err,
                "generation request failed"
            );
        }
        outcome.into_result()
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}

pub(crate) fn endpoint_for(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn parse_response(value: &Value) -> Result<String, GenerationError> {
    if let Some(reason) = value.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
        return Err(GenerationError::MalformedResponse(format!(
            "prompt blocked: {reason}"
        )));
    }

    let parts = value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("missing candidates[0].content.parts".into())
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "candidate contained no text".into(),
        ));
    }
    Ok(text)
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Transport(format!("timed out: {err}"))
    } else {
        GenerationError::Transport(err.to_string())
    }
}

fn http_error(status: StatusCode, body: &str) -> GenerationError {
    GenerationError::Http {
        status: status.as_u16(),
        body: truncate(body, MAX_ERROR_BODY),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
