use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use catalog::TableDescriptor;
use index::IndexError;
use semantic::{Encoder, SemanticError};

use crate::{MetricsSpan, SchemaIndex};

/// One retrieved table and its squared L2 distance to the question.
///
/// Serializes flat, as `{table, description, columns, score}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    #[serde(flatten)]
    pub descriptor: TableDescriptor,
    #[serde(rename = "score")]
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    /// No tables are loaded, so there is nothing to search.
    #[error("no table metadata available")]
    Unavailable,
    /// The question is blank.
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("failed to encode query: {0}")]
    Encoder(#[from] SemanticError),
    #[error("similarity search failed: {0}")]
    Index(#[from] IndexError),
    /// The index returned a row the snapshot does not have.
    #[error("index position {position} outside snapshot of {tables} tables")]
    OutOfSync { position: usize, tables: usize },
}

impl RetrievalError {
    /// True for caller mistakes, false for service-side conditions.
    pub fn is_bad_input(&self) -> bool {
        matches!(self, RetrievalError::EmptyQuery)
    }
}

/// Clamp a caller-supplied `top_k` into `[1, available]`.
///
/// Zero and negative values become 1. Returns 0 only when `available` is 0.
pub fn clamp_top_k(top_k: i64, available: usize) -> usize {
    if available == 0 {
        return 0;
    }
    let upper = i64::try_from(available).unwrap_or(i64::MAX);
    top_k.clamp(1, upper) as usize
}

/// Rank tables by distance to `query`, best first.
///
/// Returns exactly `clamp_top_k(top_k, n)` results for a non-empty schema.
pub async fn retrieve(
    schema: &SchemaIndex,
    encoder: &dyn Encoder,
    query: &str,
    top_k: i64,
) -> Result<Vec<RetrievalResult>, RetrievalError> {
    let mut span = MetricsSpan::start();
    let result = retrieve_inner(schema, encoder, query, top_k).await;
    if let Some(span) = span.take() {
        span.record_retrieval(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result
}

async fn retrieve_inner(
    schema: &SchemaIndex,
    encoder: &dyn Encoder,
    query: &str,
    top_k: i64,
) -> Result<Vec<RetrievalResult>, RetrievalError> {
    if schema.is_empty() {
        return Err(RetrievalError::Unavailable);
    }
    if query.trim().is_empty() {
        return Err(RetrievalError::EmptyQuery);
    }

    let start = Instant::now();
    let k = clamp_top_k(top_k, schema.len());
    let embedding = encoder.encode(query).await?;
    let neighbors = schema.index().search(&embedding, k)?;

    let snapshot = schema.snapshot();
    let results = neighbors
        .into_iter()
        .map(|hit| {
            snapshot
                .get(hit.position)
                .map(|descriptor| RetrievalResult {
                    descriptor: descriptor.clone(),
                    distance: hit.distance,
                })
                .ok_or(RetrievalError::OutOfSync {
                    position: hit.position,
                    tables: snapshot.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        requested = top_k,
        top_k = k,
        hits = results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "retrieved tables"
    );
    Ok(results)
}
