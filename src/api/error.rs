//! Error types for the remote configuration service

use thiserror::Error;

/// Errors from the remote configuration service
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 404 - tenant has no configuration document
    #[error("configuration not found")]
    NotFound,

    /// 401 - token invalid or expired
    #[error("unauthorized: API token invalid or expired")]
    Unauthorized,

    /// 403 - token lacks required permissions
    #[error("forbidden: API token lacks required permissions")]
    Forbidden,

    /// 429 - too many requests
    #[error("rate limited by the configuration service")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Request exceeded the configured timeout
    #[error("request to the configuration service timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset)
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success HTTP status
    #[error("configuration service returned status {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body could not be parsed
    #[error("invalid response from configuration service: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether this error means "no document exists" rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Whether retrying the same request later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::Network(_) | ApiError::RateLimited { .. }
        )
    }

    /// Retry-after seconds if the service told us to back off
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }
}
