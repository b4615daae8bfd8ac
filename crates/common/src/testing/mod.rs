//! Testing utilities
//!
//! Mocks for the session seams, shared with downstream crates through the
//! `test-utils` feature:
//! - **[`mocks`]**: scripted refresher, recording navigator and listener,
//!   plus a [`Gate`] for holding a refresh in flight
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use synvia_common::auth::{MemorySessionStore, SessionManager};
//! use synvia_common::testing::{MockTokenRefresher, RecordingListener};
//!
//! let refresher = Arc::new(MockTokenRefresher::succeeding("T2", "R2"));
//! let manager = SessionManager::new(Arc::new(MemorySessionStore::new()), refresher);
//! manager.subscribe(Arc::new(RecordingListener::new()));
//! ```

pub mod mocks;

pub use mocks::{Gate, MockTokenRefresher, RecordingListener, RecordingNavigator, StickySessionStore};
