use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint (liveness)
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Readiness check endpoint
///
/// Ready once the schema index holds at least one table.
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let loaded = state.loaded();
    if loaded.schema.is_empty() {
        return Err(ServerError::Unavailable(
            "no table metadata loaded".to_string(),
        ));
    }

    Ok(Json(json!({
        "status": "ready",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "tables": loaded.schema.len(),
        "source": loaded.origin,
        "encoder": loaded.schema.model_name(),
        "generator": state.generator.name(),
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match state.metrics_handle() {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => ServerError::NotFound.into_response(),
    }
}
