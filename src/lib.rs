//! Schema-retrieval-augmented text-to-SQL.
//!
//! This crate stitches the workspace together: table metadata from
//! [`catalog`], embeddings from [`semantic`], the flat index from [`index`]
//! and a generation backend from [`generation`]. A [`SchemaIndex`] pairs a
//! metadata snapshot with its vectors; [`retrieve`] shortlists the tables
//! closest to a question and [`generate_sql`] turns that shortlist into a
//! bounded prompt and cleaned SQL.
//!
//! ```
//! use schemarag::{build_prompt, retrieve, MetadataSnapshot, SchemaIndex};
//! use schemarag::{fallback_tables, HashedEncoder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encoder = HashedEncoder::new(384)?;
//! let snapshot = MetadataSnapshot::new(fallback_tables())?;
//! let schema = SchemaIndex::build(snapshot, &encoder).await?;
//!
//! let hits = retrieve(&schema, &encoder, "Which customers spent over 250?", 2).await?;
//! assert_eq!(hits.len(), 2);
//!
//! let prompt = build_prompt(hits.iter().map(|h| &h.descriptor), "Which customers spent over 250?");
//! assert!(prompt.contains("Which customers spent over 250?"));
//! # Ok(())
//! # }
//! ```

mod cleanup;
mod pipeline;
mod prompt;
mod retriever;
mod schema_index;

pub use catalog::{
    fallback_tables, load_snapshot, CatalogConfig, CatalogError, LoadedSnapshot,
    MetadataSnapshot, MetadataSource, PostgresCatalog, SnapshotOrigin, StaticCatalog,
    TableDescriptor,
};
pub use generation::{GeminiGenerator, GenerationConfig, GenerationError, SqlGenerator};
pub use index::{FlatIndex, IndexError, Neighbor};
pub use semantic::{encoder_from_config, Encoder, HashedEncoder, SemanticConfig, SemanticError};

pub use cleanup::strip_code_fence;
pub use pipeline::{generate_sql, GeneratedSql};
pub use prompt::build_prompt;
pub use retriever::{clamp_top_k, retrieve, RetrievalError, RetrievalResult};
pub use schema_index::SchemaIndex;

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from building a schema index or running the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error("sql generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("embedding failed: {0}")]
    Semantic(#[from] SemanticError),
    #[error("index build failed: {0}")]
    Index(#[from] IndexError),
    #[error("index holds {vectors} vectors for {tables} tables")]
    IndexOutOfSync { tables: usize, vectors: usize },
}

/// Observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_retrieval(&self, latency: Duration, result: Result<(), RetrievalError>);
    fn record_generation(&self, latency: Duration, result: Result<(), GenerationError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_retrieval(self, result: Result<(), RetrievalError>) {
        self.recorder.record_retrieval(self.start.elapsed(), result);
    }

    pub(crate) fn record_generation(self, result: Result<(), GenerationError>) {
        self.recorder.record_generation(self.start.elapsed(), result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Default)]
    struct CountingMetrics {
        events: RwLock<Vec<&'static str>>,
    }

    impl CountingMetrics {
        fn snapshot(&self) -> Vec<&'static str> {
            self.events.read().unwrap().clone()
        }
    }

    impl PipelineMetrics for CountingMetrics {
        fn record_retrieval(&self, _latency: Duration, result: Result<(), RetrievalError>) {
            let label = match result {
                Ok(()) => "retrieval_ok",
                Err(RetrievalError::Unavailable) => "retrieval_unavailable",
                Err(_) => "retrieval_err",
            };
            self.events.write().unwrap().push(label);
        }

        fn record_generation(&self, _latency: Duration, result: Result<(), GenerationError>) {
            let label = if result.is_ok() {
                "generation_ok"
            } else {
                "generation_err"
            };
            self.events.write().unwrap().push(label);
        }
    }

    struct Fixed;

    #[async_trait]
    impl SqlGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok("SELECT 1".into())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn metrics_recorder_tracks_pipeline_outcome() {
        let metrics = Arc::new(CountingMetrics::default());
        set_pipeline_metrics(Some(metrics.clone()));

        let encoder = HashedEncoder::new(32).unwrap();
        let snapshot = MetadataSnapshot::new(fallback_tables()).unwrap();
        let schema = SchemaIndex::build(snapshot, &encoder).await.unwrap();
        let result = generate_sql(&schema, &encoder, &Fixed, "count orders", 2).await;
        assert!(result.is_ok());

        set_pipeline_metrics(None);

        let events = metrics.snapshot();
        assert!(events.contains(&"retrieval_ok"));
        assert!(events.contains(&"generation_ok"));
    }

    #[test]
    fn retrieval_errors_pass_through_display() {
        let err = PipelineError::from(RetrievalError::Unavailable);
        assert_eq!(err.to_string(), "no table metadata available");
    }
}
