use super::{json_body, QueryRequest};
use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use schemarag::generate_sql;
use std::sync::Arc;

/// `POST /getSql`: generated SQL as plain text.
///
/// The prompt only describes the tables retrieved for this query.
pub async fn get_sql(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ServerResult<String> {
    let request = json_body(payload)?;
    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    let schema = state.schema();

    let generated = generate_sql(
        &schema,
        state.encoder.as_ref(),
        state.generator.as_ref(),
        &request.query,
        top_k,
    )
    .await?;

    tracing::debug!(
        tables = ?generated
            .tables
            .iter()
            .map(|hit| hit.descriptor.qualified_name.as_str())
            .collect::<Vec<_>>(),
        "grounded prompt"
    );
    Ok(generated.sql)
}
