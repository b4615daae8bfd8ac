//! API-specific error types
//!
//! Provides error classification for API operations.

use std::time::Duration;

use reqwest::StatusCode;
use synvia_common::auth::{RefreshError, StoreError};
use synvia_domain::SynviaError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Session expired or could not be renewed (401, refresh failures)
    Authentication,
    /// Signed in but not allowed (403)
    Authorization,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (other 4xx, undecodable bodies)
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Configuration and local session storage errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 that survived the refresh-and-retry flow
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Session(#[from] StoreError),

    /// The refresh call failed; the session has already been torn down
    #[error("Token refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::Refresh(_) => ApiErrorCategory::Authentication,
            Self::Forbidden(_) => ApiErrorCategory::Authorization,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Client { .. } | Self::Decode(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) | Self::Session(_) => ApiErrorCategory::Config,
        }
    }

    /// HTTP status behind this error, if the server answered
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::RateLimit(_) => Some(429),
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the user has to sign in again
    pub const fn requires_login(&self) -> bool {
        matches!(self.category(), ApiErrorCategory::Authentication)
    }

    /// Map a non-accepted response status to an error
    pub(crate) fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let detail = extract_error_message(body);
        let message = if detail.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {detail}")
        };

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(message),
            s if s.is_server_error() => Self::Server { status: s.as_u16(), message },
            s => Self::Client { status: s.as_u16(), message },
        }
    }

    /// Map a transport error; `timeout` is the limit that was in force
    pub(crate) fn from_transport(err: SynviaError, timeout: Duration) -> Self {
        match err {
            SynviaError::Timeout(_) => Self::Timeout(timeout),
            SynviaError::Network(message) => Self::Network(message),
            SynviaError::Serialization(message) => Self::Decode(message),
            SynviaError::Auth(message) => Self::Unauthorized(message),
            SynviaError::Config(message)
            | SynviaError::InvalidInput(message)
            | SynviaError::Storage(message)
            | SynviaError::Internal(message) => Self::Config(message),
        }
    }
}

/// Backend error bodies look like `{"error": "..."}` or `{"message": "..."}`;
/// anything else is returned trimmed.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(field) {
                return text.clone();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Unauthorized("test".to_string()).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::Forbidden("test".to_string()).category(),
            ApiErrorCategory::Authorization
        );
        assert_eq!(
            ApiError::Refresh(RefreshError::Transport("offline".into())).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(30)).category(),
            ApiErrorCategory::Network
        );
    }

    #[test]
    fn test_from_status_mapping() {
        let url = "http://localhost:8080/api/produtos";

        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, url, "");
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(err.status(), Some(401));
        assert!(err.requires_login());

        let err = ApiError::from_status(StatusCode::NOT_FOUND, url, r#"{"error":"Produto não encontrado"}"#);
        match err {
            ApiError::Client { status, message } => {
                assert_eq!(status, 404);
                assert!(message.ends_with("Produto não encontrado"));
            }
            other => panic!("expected client error, got {other:?}"),
        }

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, url, "upstream down\n");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.category(), ApiErrorCategory::Server);
        assert!(!err.requires_login());
    }

    #[test]
    fn test_extract_error_message_prefers_error_field() {
        assert_eq!(extract_error_message(r#"{"error":"E","message":"M"}"#), "E");
        assert_eq!(extract_error_message(r#"{"message":"M"}"#), "M");
        assert_eq!(extract_error_message(r#"{"detail":1}"#), r#"{"detail":1}"#);
        assert_eq!(extract_error_message("  plain  "), "plain");
    }

    #[test]
    fn test_transport_timeout_keeps_limit() {
        let err = ApiError::from_transport(
            SynviaError::Timeout("HTTP request timed out".into()),
            Duration::from_secs(15),
        );
        assert!(matches!(err, ApiError::Timeout(d) if d == Duration::from_secs(15)));
    }
}
