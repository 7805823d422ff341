//! Text-to-SQL generation backends.
//!
//! A [`SqlGenerator`] turns a fully built prompt into raw model text. The
//! text may still be wrapped in a markdown code fence; callers clean it up.

use async_trait::async_trait;

mod config;
mod error;
mod gemini;

pub use config::{api_key_from, GenerationConfig, API_KEY_VARS, DEFAULT_BASE_URL};
pub use error::GenerationError;
pub use gemini::GeminiGenerator;

#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Send `prompt` and return the model's raw text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn name(&self) -> &str;
}
