use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use generation::{GenerationError, SqlGenerator};
use semantic::Encoder;

use crate::{build_prompt, retrieve, strip_code_fence, MetricsSpan, PipelineError};
use crate::{RetrievalResult, SchemaIndex};

/// Output of one question-to-SQL run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSql {
    /// Cleaned SQL, fences removed.
    pub sql: String,
    /// Tables the prompt was grounded on, best match first.
    pub tables: Vec<RetrievalResult>,
    /// Prompt sent to the backend.
    pub prompt: String,
}

/// Retrieve the most relevant tables for `question`, prompt `generator` with
/// only those tables, and clean up its answer.
pub async fn generate_sql(
    schema: &SchemaIndex,
    encoder: &dyn Encoder,
    generator: &dyn SqlGenerator,
    question: &str,
    top_k: i64,
) -> Result<GeneratedSql, PipelineError> {
    let tables = retrieve(schema, encoder, question, top_k).await?;
    let prompt = build_prompt(tables.iter().map(|hit| &hit.descriptor), question);

    let start = Instant::now();
    let mut span = MetricsSpan::start();
    let outcome = generator
        .generate(&prompt)
        .await
        .map(|raw| strip_code_fence(&raw))
        .and_then(|sql| {
            if sql.is_empty() {
                Err(GenerationError::MalformedResponse(
                    "no SQL left after removing code fences".into(),
                ))
            } else {
                Ok(sql)
            }
        });
    if let Some(span) = span.take() {
        span.record_generation(outcome.as_ref().map(|_| ()).map_err(Clone::clone));
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let sql = match outcome {
        Ok(sql) => sql,
        Err(err) => {
            warn!(backend = generator.name(), elapsed_ms, error = %err, "sql generation failed");
            return Err(err.into());
        }
    };

    info!(
        backend = generator.name(),
        tables = tables.len(),
        prompt_chars = prompt.len(),
        elapsed_ms,
        "sql generated"
    );
    Ok(GeneratedSql {
        sql,
        tables,
        prompt,
    })
}
