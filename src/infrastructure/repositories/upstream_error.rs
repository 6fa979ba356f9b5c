use std::time::Duration;

/// Failure reported by an external collaborator (speech engine or language model).
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("{provider} rejected the request ({status}): {message}")]
    Rejected {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} is unreachable: {message}")]
    Unavailable {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} did not answer within {after:?}")]
    Timeout {
        provider: &'static str,
        after: Duration,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("not configured: {0}")]
    NotConfigured(&'static str),
}
