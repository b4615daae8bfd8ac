//! Session layer shared across Synvia crates.
//!
//! Holds everything the authenticated API client needs that does not depend
//! on a transport: the session manager with its single-flight refresh, the
//! injection seams (store, refresher, listener, navigator) and the login
//! redirect.
//!
//! # Features
//!
//! - `test-utils`: exposes [`testing`] mocks to downstream test suites

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    ExpiryReason, LoginRedirect, MemorySessionStore, Navigator, RefreshError, RefreshOutcome,
    SessionEvent, SessionListener, SessionManager, SessionStore, StoreError, TokenRefresher,
};
