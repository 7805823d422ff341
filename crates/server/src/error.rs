use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::CatalogError;
use generation::GenerationError;
use index::IndexError;
use schemarag::{PipelineError, RetrievalError};
use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Request timeout")]
    Timeout,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Embedding error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Generation(_) | ServerError::Semantic(_) => StatusCode::BAD_GATEWAY,
            ServerError::Index(_)
            | ServerError::Catalog(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Unavailable(_) => "NO_METADATA",
            ServerError::Generation(_) => "GENERATION_UNAVAILABLE",
            ServerError::Semantic(_) => "EMBEDDING_UNAVAILABLE",
            ServerError::Index(_) => "INDEX_ERROR",
            ServerError::Catalog(_) => "CATALOG_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    /// Message sent to the client. Upstream backend failures get a fixed
    /// text; their details go to the log only.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::Generation(_) => "SQL generation backend is unavailable".to_string(),
            ServerError::Semantic(_) => "embedding backend is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.public_message(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<RetrievalError> for ServerError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::Unavailable => ServerError::Unavailable(err.to_string()),
            RetrievalError::EmptyQuery => ServerError::BadRequest(err.to_string()),
            RetrievalError::Encoder(inner) => ServerError::Semantic(inner),
            RetrievalError::Index(inner) => ServerError::Index(inner),
            RetrievalError::OutOfSync { .. } => ServerError::Internal(err.to_string()),
        }
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Retrieval(inner) => inner.into(),
            PipelineError::Generation(inner) => ServerError::Generation(inner),
            PipelineError::Semantic(inner) => ServerError::Semantic(inner),
            PipelineError::Index(inner) => ServerError::Index(inner),
            PipelineError::IndexOutOfSync { .. } => ServerError::Internal(err.to_string()),
        }
    }
}
