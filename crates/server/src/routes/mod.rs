//! API route handlers
//!
//! - `health`: liveness, readiness and metrics
//! - `search`: table retrieval
//! - `sql`: retrieval plus SQL generation
//! - `debug`: metadata dump and reload

pub mod debug;
pub mod health;
pub mod search;
pub mod sql;

use crate::error::{ServerError, ServerResult};
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

/// Body shared by `/search` and `/getSql`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Omitted means the configured default; clamped to `[1, tables]`.
    #[serde(default)]
    pub top_k: Option<i64>,
}

/// Unwrap a JSON body, turning extractor rejections into `BAD_REQUEST`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}

/// API version and base info
///
/// Returns server information including version and available endpoints.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "schemarag",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /search",
            "POST /getSql",
            "GET /debug/metadata",
            "POST /debug/reload",
            "GET /health",
            "GET /ready",
            "GET /metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
