use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("api error: http {status}: {body}")]
    Api { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("credential error: {0}")]
    Credential(String),
}

impl ClientError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(format!("{field}: {message}"))
    }

    /// Reads apply a bounded automatic retry on these; writes never do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
