//! Login redirect on session expiry
//!
//! Bridges [`SessionEvent::Expired`] to the presentation layer's router so the
//! HTTP client never depends on a specific navigation mechanism.

use tracing::{debug, info};

use super::traits::{Navigator, SessionListener};
use super::types::SessionEvent;

/// Sends the user to the login route when the session expires
pub struct LoginRedirect<N: Navigator> {
    navigator: N,
    login_route: String,
}

impl<N: Navigator> LoginRedirect<N> {
    #[must_use]
    pub fn new(navigator: N, login_route: impl Into<String>) -> Self {
        Self { navigator, login_route: login_route.into() }
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Navigate to the login route unless it is already displayed.
    ///
    /// # Returns
    /// `true` if a navigation was performed
    pub fn redirect_to_login(&self) -> bool {
        if self.navigator.current_route() == self.login_route {
            debug!(route = %self.login_route, "already on login route; skipping redirect");
            return false;
        }

        info!(route = %self.login_route, "session expired; redirecting to login");
        self.navigator.navigate(&self.login_route);
        true
    }
}

impl<N: Navigator> SessionListener for LoginRedirect<N> {
    fn on_session_event(&self, event: &SessionEvent) {
        if matches!(event, SessionEvent::Expired(_)) {
            self.redirect_to_login();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ExpiryReason;
    use crate::testing::RecordingNavigator;

    #[test]
    fn redirects_on_expiry() {
        let redirect = LoginRedirect::new(RecordingNavigator::new("/vendas/nova"), "/login");

        redirect.on_session_event(&SessionEvent::Expired(ExpiryReason::RefreshFailed));

        assert_eq!(redirect.navigator().navigations(), vec!["/login".to_string()]);
        assert_eq!(redirect.navigator().current_route(), "/login");
    }

    #[test]
    fn suppresses_redirect_when_already_on_login() {
        let redirect = LoginRedirect::new(RecordingNavigator::new("/login"), "/login");

        assert!(!redirect.redirect_to_login());
        redirect.on_session_event(&SessionEvent::Expired(ExpiryReason::MissingRefreshToken));

        assert!(redirect.navigator().navigations().is_empty());
    }

    #[test]
    fn second_expiry_does_not_navigate_again() {
        let redirect = LoginRedirect::new(RecordingNavigator::new("/estoque"), "/login");

        assert!(redirect.redirect_to_login());
        assert!(!redirect.redirect_to_login());
        assert_eq!(redirect.navigator().navigations().len(), 1);
    }

    #[test]
    fn ignores_other_events() {
        let redirect = LoginRedirect::new(RecordingNavigator::new("/"), "/login");

        redirect.on_session_event(&SessionEvent::LoggedOut);
        redirect.on_session_event(&SessionEvent::Refreshed);

        assert!(redirect.navigator().navigations().is_empty());
    }
}
