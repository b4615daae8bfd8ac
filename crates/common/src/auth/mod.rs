//! Session credentials and token refresh
//!
//! This module replaces ambient global session state with an explicit
//! [`SessionManager`] injected into the HTTP client.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  SessionManager  │  credentials + single in-flight refresh
//! └────────┬─────────┘
//!          │
//!          ├──► SessionStore      (persisted accessToken / refreshToken / user)
//!          ├──► TokenRefresher    (POST /auth/refresh)
//!          └──► SessionListener   (events, e.g. LoginRedirect → Navigator)
//! ```
//!
//! # Module Organization
//!
//! - **[`traits`]**: injection seams (`SessionStore`, `TokenRefresher`,
//!   `SessionListener`, `Navigator`)
//! - **[`types`]**: errors and session events
//! - **[`store`]**: in-memory store
//! - **[`session`]**: the session manager
//! - **[`redirect`]**: login redirect listener

pub mod redirect;
pub mod session;
pub mod store;
pub mod traits;
pub mod types;

pub use redirect::LoginRedirect;
pub use session::{RefreshOutcome, SessionManager};
pub use store::MemorySessionStore;
pub use traits::{Navigator, SessionListener, SessionStore, TokenRefresher};
pub use types::{ExpiryReason, RefreshError, SessionEvent, StoreError};
