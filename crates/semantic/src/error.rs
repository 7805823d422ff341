use thiserror::Error;

/// Errors surfaced by the embedding encoders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Configuration is inconsistent (unknown mode, missing API url, zero dimension).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The embedding endpoint could not be reached (connect failure, timeout).
    #[error("embedding request failed: {0}")]
    Transport(String),
    /// The embedding endpoint answered with a non-success status.
    #[error("embedding endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// The model returned something that is not a usable embedding.
    #[error("inference failure: {0}")]
    Inference(String),
    /// The model produced vectors of a different size than configured.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl SemanticError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, throttling (429) and server errors (5xx) are
    /// transient; client errors and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            SemanticError::Transport(_) => true,
            SemanticError::Http { status, .. } => *status == 429 || *status >= 500,
            SemanticError::InvalidConfig(_)
            | SemanticError::Inference(_)
            | SemanticError::DimensionMismatch { .. } => false,
        }
    }
}
