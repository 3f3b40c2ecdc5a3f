use thiserror::Error;

/// Failures at the payload boundary. Everything past this point degrades
/// to empty or zero results instead of erroring.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to read payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed payload JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload loader went away before delivering a result")]
    Abandoned,
}
