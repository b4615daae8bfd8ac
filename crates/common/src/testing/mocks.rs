//! Mock implementations of the session traits
//!
//! Scripted stand-ins for the refresh endpoint and the presentation layer so
//! session behaviour can be exercised without a backend or a router.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use synvia_domain::RefreshResponse;
use tokio::sync::Semaphore;

use crate::auth::{
    MemorySessionStore, Navigator, RefreshError, SessionEvent, SessionListener, SessionStore,
    StoreError, TokenRefresher,
};

/// One-shot barrier for holding async work until a test releases it
///
/// Once opened, every current and future waiter passes.
#[derive(Debug)]
pub struct Gate {
    permits: Semaphore,
}

impl Gate {
    #[must_use]
    pub const fn new() -> Self {
        Self { permits: Semaphore::const_new(0) }
    }

    /// Release all waiters
    pub fn open(&self) {
        self.permits.add_permits(1);
    }

    /// Wait until the gate is opened
    pub async fn wait(&self) {
        // The permit goes back on drop so the next waiter can pass too.
        let _permit = self.permits.acquire().await;
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted [`TokenRefresher`]
///
/// # Examples
///
/// ```
/// use synvia_common::auth::TokenRefresher;
/// use synvia_common::testing::MockTokenRefresher;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let refresher = MockTokenRefresher::succeeding("T2", "R2");
/// let response = runtime.block_on(refresher.refresh("R1")).unwrap();
/// assert_eq!(response.access_token.as_deref(), Some("T2"));
/// assert_eq!(refresher.calls(), 1);
/// ```
#[derive(Debug)]
pub struct MockTokenRefresher {
    result: Result<RefreshResponse, RefreshError>,
    gate: Option<Arc<Gate>>,
    calls: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockTokenRefresher {
    /// Refresher that always returns the given token pair
    #[must_use]
    pub fn succeeding(access_token: &str, refresh_token: &str) -> Self {
        Self::responding(RefreshResponse {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
        })
    }

    /// Refresher that always returns `response` as-is
    #[must_use]
    pub fn responding(response: RefreshResponse) -> Self {
        Self::with_result(Ok(response))
    }

    /// Refresher that always fails with `error`
    #[must_use]
    pub fn failing(error: RefreshError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<RefreshResponse, RefreshError>) -> Self {
        Self { result, gate: None, calls: AtomicUsize::new(0), received: Mutex::new(Vec::new()) }
    }

    /// Hold every refresh call until `gate` is opened
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of refresh calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens received, in call order
    pub fn received_tokens(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl TokenRefresher for MockTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        self.received.lock().push(refresh_token.to_string());
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.wait().await;
        }

        self.result.clone()
    }
}

/// [`Navigator`] that records every navigation
#[derive(Debug)]
pub struct RecordingNavigator {
    route: Mutex<String>,
    navigations: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new(initial_route: &str) -> Self {
        Self { route: Mutex::new(initial_route.to_string()), navigations: Mutex::new(Vec::new()) }
    }

    /// Move to `route` without recording a navigation (user clicking around)
    pub fn set_route(&self, route: &str) {
        *self.route.lock() = route.to_string();
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> String {
        self.route.lock().clone()
    }

    fn navigate(&self, route: &str) {
        self.set_route(route);
        self.navigations.lock().push(route.to_string());
    }
}

/// [`SessionListener`] that records every event
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }
}

impl SessionListener for RecordingListener {
    fn on_session_event(&self, event: &SessionEvent) {
        self.events.lock().push(event.clone());
    }
}

/// In-memory [`SessionStore`] whose removals of one key always fail
#[derive(Debug)]
pub struct StickySessionStore {
    inner: MemorySessionStore,
    sticky_key: String,
}

impl StickySessionStore {
    #[must_use]
    pub fn new(inner: MemorySessionStore, sticky_key: &str) -> Self {
        Self { inner, sticky_key: sticky_key.to_string() }
    }

    pub fn inner(&self) -> &MemorySessionStore {
        &self.inner
    }
}

impl SessionStore for StickySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if key == self.sticky_key {
            return Err(StoreError::Write(format!("cannot remove '{key}'")));
        }
        self.inner.remove(key)
    }
}
