use thiserror::Error;

/// Failures talking to a generation backend.
///
/// Response bodies kept in [`GenerationError::Http`] are for logs only; the
/// HTTP layer never echoes them to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation credential missing: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingCredential,
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
    #[error("generation backend unreachable: {0}")]
    Transport(String),
    #[error("generation backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unexpected generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Timeouts, connection failures, throttling and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Transport(_) => true,
            GenerationError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
