//! Session types and errors

use std::time::Duration;

use thiserror::Error;

/// Errors raised by a [`SessionStore`](super::SessionStore)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error("session storage write failed: {0}")]
    Write(String),

    #[error("stored session value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Errors raised while refreshing the access token
///
/// `Clone` because a single refresh outcome is handed to every request that
/// joined it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// No response was received
    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("refresh request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success status
    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("session storage error during refresh: {0}")]
    Store(#[from] StoreError),
}

/// Why a session was torn down without the user asking for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// A 401 arrived but no refresh token was stored
    MissingRefreshToken,
    /// The refresh endpoint answered without both tokens
    IncompleteRefreshResponse,
    /// The refresh call itself failed
    RefreshFailed,
}

/// Session lifecycle events delivered to [`SessionListener`](super::SessionListener)s
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    Refreshed,
    Expired(ExpiryReason),
    LoggedOut,
}
