use crate::error::ServerResult;
use crate::state::{ReloadSummary, ServerState};
use axum::extract::State;
use axum::Json;
use catalog::TableDescriptor;
use std::sync::Arc;

/// `GET /debug/metadata`: the full snapshot, in index order.
pub async fn metadata(State(state): State<Arc<ServerState>>) -> Json<Vec<TableDescriptor>> {
    let schema = state.schema();
    Json(schema.snapshot().as_slice().to_vec())
}

/// `POST /debug/reload`: reload metadata and swap the schema index.
pub async fn reload(State(state): State<Arc<ServerState>>) -> ServerResult<Json<ReloadSummary>> {
    let summary = state.reload().await?;
    Ok(Json(summary))
}
