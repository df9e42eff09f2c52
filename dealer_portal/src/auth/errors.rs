//! Authentication error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the remote authentication API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered `401 Unauthorized`
    #[error("Unauthorized: {}", detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// The server answered with any other non-success status
    #[error("Request failed with status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server-provided error detail, if the response carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => {
                detail.as_deref()
            }
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }
}

/// Result type for remote API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Token store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or removing the token file failed
    #[error("Token store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for token store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from fetching the profile of the current user.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// There is no authenticated user to fetch a profile for
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The profile request failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_rejections() {
        let err = ApiError::Unauthorized {
            detail: Some("Incorrect username or password".to_string()),
        };
        assert_eq!(err.detail(), Some("Incorrect username or password"));

        let err = ApiError::Status {
            status: 422,
            detail: None,
        };
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_network_error_has_no_detail() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.detail(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 500,
            detail: Some("boom".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }
}
