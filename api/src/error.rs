//! Error types for the storefront API client

use thiserror::Error;

/// Result alias used by every API call
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur when talking to the storefront backend
///
/// A `204 No Content` answer is never an error: list endpoints decode it as
/// an empty list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, timeout, reset)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered `401`; the stored token has been cleared
    #[error("Unauthorized - session expired")]
    Unauthorized,

    /// The backend answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The base URL or a request part could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The bearer token could not be persisted
    #[error("Token storage failed: {0}")]
    TokenStorage(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the backend answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_)
            | Self::Decode(_)
            | Self::InvalidRequest(_)
            | Self::TokenStorage(_) => None,
        }
    }

    /// True when the backend answered with exactly `status`
    #[must_use]
    pub fn has_status(&self, status: u16) -> bool {
        self.status() == Some(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert!(ApiError::Status { status: 400, message: String::new() }.has_status(400));
        assert_eq!(ApiError::Transport("reset".into()).status(), None);
    }
}
