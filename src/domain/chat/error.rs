use crate::error::AppError;
use crate::infrastructure::repositories::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<ChatServiceError> for AppError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Upstream(e) => AppError::from(e),
            ChatServiceError::Invalid(msg) => AppError::BadRequest(msg),
        }
    }
}
