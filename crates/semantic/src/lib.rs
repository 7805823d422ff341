//! Schema Semantic Encoders
//!
//! Turns table summaries and user questions into fixed-length vectors so the
//! schema index can rank tables by meaning instead of exact names.
//!
//! Two encoders ship today:
//!
//! - **Hashed** (`mode = "hashed"`) - a local feature-hashing encoder. No
//!   model files, no network, bit-for-bit reproducible. The default, and what
//!   every test uses.
//! - **API** (`mode = "api"`) - calls a hosted sentence-embedding model
//!   (Hugging Face inference for `all-MiniLM-L6-v2`, an OpenAI-compatible
//!   endpoint, or a custom service). Transient failures are retried with
//!   exponential backoff.
//!
//! Both implement [`Encoder`]. The dimension is known before anything has been
//! encoded, so an empty catalog can still get an index of the right shape.
//!
//! ## Quick example
//!
//! ```
//! use semantic::{encoder_from_config, SemanticConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let encoder = encoder_from_config(&SemanticConfig::default()).unwrap();
//! let v = encoder.encode("Which customers spent over 250?").await.unwrap();
//! assert_eq!(v.len(), encoder.dimension());
//! # }
//! ```
//!
//! ## Env vars to know
//!
//! - `SCHEMARAG_EMBEDDING_API_URL` - Override the API endpoint
//! - `SCHEMARAG_EMBEDDING_API_TOKEN` - Bearer token for the API

pub mod config;
pub mod error;
pub mod retry;
mod serde_millis;

mod api;
mod hashed;
mod normalize;

pub use crate::api::ApiEncoder;
pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::hashed::HashedEncoder;

use async_trait::async_trait;
use std::sync::Arc;

/// Maps text to fixed-length vectors.
///
/// `encode` must be deterministic for a fixed model. `encode_batch` must be
/// element-wise identical to calling `encode` on each input, in order.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Vector dimension, constant for the lifetime of the encoder.
    fn dimension(&self) -> usize;

    /// Label of the underlying model, surfaced in readiness output.
    fn model_name(&self) -> &str;

    async fn encode(&self, text: &str) -> Result<Vec<f32>, SemanticError>;

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SemanticError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.encode(text).await?);
        }
        Ok(vectors)
    }
}

/// Build the encoder selected by `cfg.mode`.
pub fn encoder_from_config(cfg: &SemanticConfig) -> Result<Arc<dyn Encoder>, SemanticError> {
    match cfg.mode.as_str() {
        "hashed" => Ok(Arc::new(HashedEncoder::from_config(cfg)?)),
        "api" => Ok(Arc::new(ApiEncoder::from_config(cfg)?)),
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown semantic mode `{other}` (expected `hashed` or `api`)"
        ))),
    }
}
