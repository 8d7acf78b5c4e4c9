/*
[INPUT]:  Error sources (HTTP, REST/auth API, serialization, session state)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the DevFlow adapter
#[derive(Error, Debug)]
pub enum DevflowError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Authentication failed or no session is available
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session token is expired
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The addressed row does not exist (or is not visible to this user)
    #[error("Task not found: {id}")]
    NotFound { id: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Failure injected by the in-memory backend
    #[error("Simulated failure: {0}")]
    Simulated(String),
}

impl DevflowError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            DevflowError::Authentication { .. } | DevflowError::SessionExpired
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DevflowError::NotFound { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        DevflowError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status onto the closest variant.
    pub fn from_status(status: StatusCode, message: impl Into<String>, retry_after: Option<u64>) -> Self {
        let message = message.into();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                DevflowError::Authentication { message }
            }
            StatusCode::TOO_MANY_REQUESTS => DevflowError::RateLimit {
                retry_after: retry_after.unwrap_or(1),
            },
            _ => DevflowError::api_error(status, message),
        }
    }

    pub fn not_signed_in() -> Self {
        DevflowError::Authentication {
            message: "no active session, please sign in again".to_string(),
        }
    }
}

/// Result type alias for DevFlow adapter operations
pub type Result<T> = std::result::Result<T, DevflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        assert!(DevflowError::SessionExpired.is_auth_error());
        assert!(DevflowError::not_signed_in().is_auth_error());
        assert!(!DevflowError::Timeout { duration: 30 }.is_auth_error());
    }

    #[test]
    fn test_status_mapping() {
        assert!(DevflowError::from_status(StatusCode::UNAUTHORIZED, "jwt expired", None).is_auth_error());
        assert!(matches!(
            DevflowError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down", Some(7)),
            DevflowError::RateLimit { retry_after: 7 }
        ));

        match DevflowError::from_status(StatusCode::BAD_REQUEST, "invalid input syntax", None) {
            DevflowError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "invalid input syntax");
            }
            other => panic!("Expected Api error variant, got {other:?}"),
        }
    }
}
