//! Synvia backend API client
//!
//! # Architecture
//!
//! - [`ApiClient`]: bearer token + `X-Request-ID` on every request, one
//!   deduplicated refresh and a single retry on 401
//! - [`HttpTokenRefresher`]: the `POST /auth/refresh` call used by the
//!   session manager
//! - [`AuthService`]: login (with MFA outcomes), logout, restore
//! - [`ApiError`]: status and transport error taxonomy

pub mod auth;
pub mod client;
pub mod errors;
pub mod refresh;
pub mod request;

pub use auth::{AuthService, LoginOutcome};
pub use client::ApiClient;
pub use errors::{ApiError, ApiErrorCategory};
pub use refresh::HttpTokenRefresher;
pub use request::{ApiRequest, StatusPredicate};
