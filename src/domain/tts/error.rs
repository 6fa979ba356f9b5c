use crate::error::AppError;
use crate::infrastructure::repositories::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("text too large: {0}")]
    TooLarge(String),
    #[error("audio storage failed: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Upstream(e) => AppError::from(e),
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            TtsServiceError::Storage(e) => AppError::Internal(format!("audio storage failed: {}", e)),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
