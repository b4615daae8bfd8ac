//! # Synvia Infrastructure
//!
//! I/O implementations behind the session layer in `synvia-common`.
//!
//! This crate contains:
//! - HTTP transport (`reqwest`) and request correlation IDs
//! - The authenticated API client with token refresh, and the auth service
//! - Session store backends (JSON file, platform keychain)
//! - Configuration loading (file + environment)
//!
//! ## Architecture
//! - Implements traits defined in `synvia-common`
//! - Depends on `synvia-domain` and `synvia-common`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod session;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiError, ApiErrorCategory, ApiRequest, AuthService, HttpTokenRefresher,
    LoginOutcome,
};
pub use errors::InfraError;
pub use http::{generate_request_id, HttpClient};
pub use session::{open_store, FileSessionStore, KeychainSessionStore};
