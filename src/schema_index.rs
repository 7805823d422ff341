use std::time::Instant;
use tracing::{debug, info};

use catalog::MetadataSnapshot;
use index::FlatIndex;
use semantic::Encoder;

use crate::PipelineError;

/// A metadata snapshot and the vectors built from it.
///
/// Row `i` of [`index`](Self::index) is the embedding of
/// `snapshot.get(i)`. The pair is never mutated after [`build`](Self::build);
/// a reload builds a new value.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    snapshot: MetadataSnapshot,
    index: FlatIndex,
    model_name: String,
}

impl SchemaIndex {
    /// Embed every table summary in `snapshot` and index the vectors.
    pub async fn build(
        snapshot: MetadataSnapshot,
        encoder: &dyn Encoder,
    ) -> Result<Self, PipelineError> {
        let start = Instant::now();
        let mut index = FlatIndex::new(encoder.dimension());

        if !snapshot.is_empty() {
            let summaries: Vec<String> = snapshot.iter().map(|t| t.summary()).collect();
            let refs: Vec<&str> = summaries.iter().map(String::as_str).collect();
            let vectors = encoder.encode_batch(&refs).await?;
            index.build(vectors)?;
        }

        if index.len() != snapshot.len() {
            return Err(PipelineError::IndexOutOfSync {
                tables: snapshot.len(),
                vectors: index.len(),
            });
        }

        info!(
            tables = snapshot.len(),
            dimension = index.dimension(),
            model = encoder.model_name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "schema index built"
        );
        debug!(tables = ?snapshot.iter().map(|t| t.qualified_name.as_str()).collect::<Vec<_>>());

        Ok(Self {
            snapshot,
            index,
            model_name: encoder.model_name().to_string(),
        })
    }

    pub fn snapshot(&self) -> &MetadataSnapshot {
        &self.snapshot
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// Encoder the vectors were produced with.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
