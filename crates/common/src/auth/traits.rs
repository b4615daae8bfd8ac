//! Traits for session storage, token refresh and navigation
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (persistent storage, the backend refresh endpoint,
//! the presentation layer's router).

use async_trait::async_trait;
use synvia_domain::RefreshResponse;

use super::types::{RefreshError, SessionEvent, StoreError};

/// Persistent key-value store holding the session credentials
///
/// Reads and writes are synchronous so that a reader always observes the most
/// recent write at the time of its call.
pub trait SessionStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// `None` when the key is not present
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Client for the backend token refresh endpoint
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchange a refresh token for a new token pair
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token from the current session
    ///
    /// # Returns
    /// The decoded response body. Missing tokens are reported through
    /// `None` fields, not as an error.
    ///
    /// # Errors
    /// Returns error if the call fails at the transport or HTTP level
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError>;
}

/// Receives session lifecycle events
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: &SessionEvent);
}

/// Presentation-layer router
pub trait Navigator: Send + Sync {
    /// Route currently displayed (e.g. `/vendas/nova`)
    fn current_route(&self) -> String;

    /// Perform a full navigation to `route`
    fn navigate(&self, route: &str);
}
