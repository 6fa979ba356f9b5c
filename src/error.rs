use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::repositories::UpstreamError;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Text too large: {0}")]
    PayloadTooLarge(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream service error: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

/// Upstream failures keep the caller-facing part of their status: input the
/// provider rejected stays a 4xx, everything on the provider's side becomes a
/// gateway error.
impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { status: 429, message, .. } => {
                AppError::RateLimitExceeded(message)
            }
            UpstreamError::Rejected {
                status, message, ..
            } if matches!(status, 400 | 404 | 413 | 422) => AppError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
                message,
            },
            err @ UpstreamError::Rejected { .. } => AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: err.to_string(),
            },
            err @ (UpstreamError::Unavailable { .. } | UpstreamError::NotConfigured(_)) => {
                AppError::ServiceUnavailable(err.to_string())
            }
            err @ UpstreamError::Timeout { .. } => AppError::Upstream {
                status: StatusCode::GATEWAY_TIMEOUT,
                message: err.to_string(),
            },
            err @ UpstreamError::InvalidResponse { .. } => AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: err.to_string(),
            },
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(
            error = %self,
            status = %status.as_u16(),
            "Request failed"
        );

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
