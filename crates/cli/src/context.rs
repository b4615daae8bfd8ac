//! CLI context - wires config, session store and API client

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use synvia_common::auth::{LoginRedirect, Navigator, SessionManager};
use synvia_domain::Config;
use synvia_infra::{open_store, ApiClient, AuthService, HttpClient, HttpTokenRefresher};
use tracing::debug;

/// Navigator for a terminal session
///
/// There is no screen to switch, so navigating records the route and tells
/// the user what to do next.
#[derive(Debug)]
pub struct TerminalNavigator {
    route: Mutex<String>,
}

impl TerminalNavigator {
    pub fn new(route: impl Into<String>) -> Self {
        Self { route: Mutex::new(route.into()) }
    }
}

impl Navigator for TerminalNavigator {
    fn current_route(&self) -> String {
        self.route.lock().clone()
    }

    #[allow(clippy::print_stderr)]
    fn navigate(&self, route: &str) {
        *self.route.lock() = route.to_string();
        eprintln!("Sessão expirada. Faça login novamente com `synvia login` ({route}).");
    }
}

/// Everything a command needs
pub struct CliContext {
    pub config: Config,
    pub auth: AuthService,
    pub redirect: Arc<LoginRedirect<TerminalNavigator>>,
}

impl CliContext {
    /// Build the context for a command running "on" `route`
    pub fn new(config: Config, route: &str) -> Result<Self> {
        let store = open_store(&config.session);

        let http = HttpClient::from_config(&config.api).context("failed to build HTTP client")?;

        let refresher = Arc::new(HttpTokenRefresher::new(http.clone(), &config.api));
        let session = SessionManager::new(store, refresher);

        let redirect = Arc::new(LoginRedirect::new(
            TerminalNavigator::new(route),
            config.session.login_route.clone(),
        ));
        session.subscribe(redirect.clone());

        let client = ApiClient::with_http_client(http, &config.api.base_url, session);
        debug!(base_url = %client.base_url(), backend = %config.session.backend, "CLI context ready");

        Ok(Self { config, auth: AuthService::new(client), redirect })
    }

    pub const fn client(&self) -> &ApiClient {
        self.auth.client()
    }
}

#[cfg(test)]
mod tests {
    use synvia_common::auth::SessionListener;
    use synvia_common::{ExpiryReason, SessionEvent};
    use synvia_domain::SessionBackend;

    use super::*;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.session.backend = SessionBackend::Memory;
        config
    }

    #[test]
    fn navigator_tracks_route() {
        let navigator = TerminalNavigator::new("/estoque");
        assert_eq!(navigator.current_route(), "/estoque");

        navigator.navigate("/login");
        assert_eq!(navigator.current_route(), "/login");
    }

    #[test]
    fn expiry_moves_terminal_to_login_once() {
        let ctx = CliContext::new(memory_config(), "/relatorios").unwrap();
        let expired = SessionEvent::Expired(ExpiryReason::RefreshFailed);

        ctx.redirect.on_session_event(&expired);
        assert_eq!(ctx.redirect.navigator().current_route(), "/login");
        assert!(!ctx.redirect.redirect_to_login());
    }

    #[test]
    fn client_uses_configured_base_url() {
        let mut config = memory_config();
        config.api.base_url = "https://pdv.padaria.com.br/api/".to_string();

        let ctx = CliContext::new(config, "/").unwrap();
        assert_eq!(ctx.client().url_for("/produtos"), "https://pdv.padaria.com.br/api/produtos");
        assert!(!ctx.auth.is_authenticated());
    }
}
