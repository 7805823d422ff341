use super::{json_body, QueryRequest};
use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use schemarag::{retrieve, RetrievalResult};
use std::sync::Arc;

/// `POST /search`: the tables closest to the query, best first.
pub async fn search_tables(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ServerResult<Json<Vec<RetrievalResult>>> {
    let request = json_body(payload)?;
    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    let schema = state.schema();

    let hits = retrieve(&schema, state.encoder.as_ref(), &request.query, top_k).await?;
    Ok(Json(hits))
}
