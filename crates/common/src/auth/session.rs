//! Session manager with single-flight token refresh
//!
//! Owns the persisted session credentials and coordinates access-token
//! refresh:
//! - Token and profile access backed by an injected [`SessionStore`]
//! - At most one refresh call in flight; concurrent callers join it
//! - Teardown (store cleared + [`SessionEvent::Expired`]) when the session
//!   cannot be recovered
//! - Lifecycle events fanned out to registered [`SessionListener`]s

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use synvia_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_KEY};
use synvia_domain::{TokenPair, UserProfile};
use tracing::{debug, info, warn};

use super::traits::{SessionListener, SessionStore, TokenRefresher};
use super::types::{ExpiryReason, RefreshError, SessionEvent, StoreError};

/// Result of a refresh: the new access token, or `None` when the session was
/// torn down instead.
pub type RefreshOutcome = Result<Option<String>, RefreshError>;

type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Shared state the refresh future needs. Kept apart from the pending slot so
/// the stored future never owns the slot it lives in.
struct SessionCore {
    store: Arc<dyn SessionStore>,
    refresher: Arc<dyn TokenRefresher>,
    listeners: RwLock<Vec<Arc<dyn SessionListener>>>,
}

/// Session credentials plus the in-flight refresh handle
///
/// Cloning is cheap; clones share the same store, listeners and pending
/// refresh.
#[derive(Clone)]
pub struct SessionManager {
    core: Arc<SessionCore>,
    pending: Arc<Mutex<Option<PendingRefresh>>>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("listeners", &self.core.listeners.read().len())
            .field("refreshing", &self.is_refreshing())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a new session manager
    ///
    /// # Arguments
    /// * `store` - Persistent storage for tokens and profile
    /// * `refresher` - Client for the refresh endpoint
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            core: Arc::new(SessionCore { store, refresher, listeners: RwLock::new(Vec::new()) }),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Register a listener for session events
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        self.core.listeners.write().push(listener);
    }

    /// Current access token, if any
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.core.store.get(ACCESS_TOKEN_KEY)
    }

    /// Current refresh token, if any
    ///
    /// # Errors
    /// Returns error if the store cannot be read
    pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.core.store.get(REFRESH_TOKEN_KEY)
    }

    /// Stored user profile, if any
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] if the stored profile is not valid JSON
    pub fn current_user(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(raw) = self.core.store.get(USER_KEY)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| StoreError::Corrupt {
            key: USER_KEY.to_string(),
            reason: e.to_string(),
        })
    }

    /// Persist tokens and, optionally, the user profile
    ///
    /// # Errors
    /// Returns error if any value cannot be written
    pub fn set_session(
        &self,
        tokens: &TokenPair,
        user: Option<&UserProfile>,
    ) -> Result<(), StoreError> {
        self.core.persist_tokens(tokens)?;
        if let Some(user) = user {
            self.update_user(user)?;
        }
        Ok(())
    }

    /// Persist a fresh login and notify listeners
    ///
    /// # Errors
    /// Returns error if any value cannot be written
    pub fn start_session(&self, tokens: &TokenPair, user: &UserProfile) -> Result<(), StoreError> {
        self.set_session(tokens, Some(user))?;
        info!(email = %user.email, "session started");
        self.core.emit(&SessionEvent::LoggedIn);
        Ok(())
    }

    /// Replace the stored user profile
    ///
    /// # Errors
    /// Returns error if the profile cannot be serialized or written
    pub fn update_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user).map_err(|e| StoreError::Write(e.to_string()))?;
        self.core.store.set(USER_KEY, &raw)
    }

    /// Remove every persisted session key
    ///
    /// All keys are attempted even if one fails.
    ///
    /// # Errors
    /// Returns the first removal error
    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.core.clear()
    }

    /// Clear the session at the user's request and notify listeners
    ///
    /// # Errors
    /// Returns the first removal error
    pub fn logout(&self) -> Result<(), StoreError> {
        self.core.clear()?;
        info!("session ended by logout");
        self.core.emit(&SessionEvent::LoggedOut);
        Ok(())
    }

    /// Restore a previously persisted session on startup
    ///
    /// A session is only restored when access token, refresh token and
    /// profile are all present. A corrupt profile clears the session.
    ///
    /// # Errors
    /// Returns error if the store cannot be read or cleared
    pub fn restore(&self) -> Result<Option<UserProfile>, StoreError> {
        if self.access_token()?.is_none() || self.refresh_token()?.is_none() {
            return Ok(None);
        }

        match self.current_user() {
            Ok(user) => Ok(user),
            Err(StoreError::Corrupt { reason, .. }) => {
                warn!(%reason, "stored user profile is corrupt; clearing session");
                self.core.clear()?;
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Whether a signed-in session is stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_))) && matches!(self.current_user(), Ok(Some(_)))
    }

    /// Whether a refresh is currently in flight
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Obtain a new access token, joining any refresh already in flight
    ///
    /// The pending handle is installed under the lock before the first await,
    /// so every caller that fails while a refresh is running shares its
    /// result and only one refresh call reaches the backend.
    ///
    /// # Returns
    /// `Some(token)` on success, `None` if the session was torn down
    /// (no refresh token stored, or incomplete refresh response)
    ///
    /// # Errors
    /// Returns the refresh error (after teardown) if the refresh call failed
    pub async fn refresh_access_token(&self) -> RefreshOutcome {
        let pending = {
            let mut slot = self.pending.lock();
            if let Some(existing) = slot.as_ref() {
                debug!("joining in-flight token refresh");
                existing.clone()
            } else {
                debug!("starting token refresh");
                let core = Arc::clone(&self.core);
                let refresh = async move { core.run_refresh().await }.boxed().shared();
                *slot = Some(refresh.clone());
                refresh
            }
        };

        let outcome = pending.clone().await;

        let mut slot = self.pending.lock();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
            *slot = None;
        }

        outcome
    }
}

impl SessionCore {
    async fn run_refresh(&self) -> RefreshOutcome {
        let stored = match self.store.get(REFRESH_TOKEN_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "cannot read refresh token; ending session");
                self.expire(ExpiryReason::RefreshFailed);
                return Err(err.into());
            }
        };

        let Some(refresh_token) = stored.filter(|t| !t.is_empty()) else {
            warn!("no refresh token stored; ending session");
            self.expire(ExpiryReason::MissingRefreshToken);
            return Ok(None);
        };

        match self.refresher.refresh(&refresh_token).await {
            Ok(response) => {
                if let Some(tokens) = response.into_token_pair() {
                    self.persist_tokens(&tokens)?;
                    info!("access token refreshed");
                    self.emit(&SessionEvent::Refreshed);
                    Ok(Some(tokens.access_token))
                } else {
                    warn!("refresh response missing tokens; ending session");
                    self.expire(ExpiryReason::IncompleteRefreshResponse);
                    Ok(None)
                }
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed; ending session");
                self.expire(ExpiryReason::RefreshFailed);
                Err(err)
            }
        }
    }

    fn persist_tokens(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in SESSION_KEYS {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "failed to remove session key");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Unauthorized teardown. Storage failures are logged; listeners are
    /// notified regardless so the user still lands on the login screen.
    fn expire(&self, reason: ExpiryReason) {
        let _ = self.clear();
        self.emit(&SessionEvent::Expired(reason));
    }

    fn emit(&self, event: &SessionEvent) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.on_session_event(event);
        }
    }
}
