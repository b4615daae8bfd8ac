//! Shared fixtures for the infra integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use synvia_common::auth::{LoginRedirect, MemorySessionStore, SessionManager};
use synvia_common::testing::{RecordingListener, RecordingNavigator};
use synvia_domain::constants::{ACCESS_TOKEN_KEY, LOGIN_ROUTE, REFRESH_TOKEN_KEY, USER_KEY};
use synvia_domain::ApiConfig;
use synvia_infra::{ApiClient, HttpClient, HttpTokenRefresher};
use wiremock::{MockServer, Request, ResponseTemplate};

pub const USER_JSON: &str = r#"{"id":1,"nome":"Ana","email":"ana@padaria.com","perfil":"gerente","permissoes":["vendas","produtos"]}"#;

/// Mock backend plus a fully wired client, the way the CLI wires it
pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub session: SessionManager,
    pub client: ApiClient,
    pub redirect: Arc<LoginRedirect<RecordingNavigator>>,
    pub listener: Arc<RecordingListener>,
}

impl TestContext {
    /// Context whose store holds `entries` and whose UI shows `route`
    pub async fn with_store(route: &str, entries: &[(&str, &str)]) -> Self {
        init_tracing();
        let server = MockServer::start().await;
        let config = ApiConfig { base_url: format!("{}/api", server.uri()), ..ApiConfig::default() };

        let store = Arc::new(MemorySessionStore::with_entries(entries.iter().copied()));
        let http = HttpClient::from_config(&config).unwrap();
        let refresher = Arc::new(HttpTokenRefresher::new(http.clone(), &config));
        let session = SessionManager::new(store.clone(), refresher);

        let redirect = Arc::new(LoginRedirect::new(RecordingNavigator::new(route), LOGIN_ROUTE));
        let listener = Arc::new(RecordingListener::new());
        session.subscribe(redirect.clone());
        session.subscribe(listener.clone());

        let client = ApiClient::with_http_client(http, &config.base_url, session.clone());

        Self { server, store, session, client, redirect, listener }
    }

    /// Signed in as T1/R1 on the new-sale screen
    pub async fn signed_in() -> Self {
        Self::with_store(
            "/vendas/nova",
            &[(ACCESS_TOKEN_KEY, "T1"), (REFRESH_TOKEN_KEY, "R1"), (USER_KEY, USER_JSON)],
        )
        .await
    }

    /// Requests the mock server received for `path`
    pub async fn requests_to(&self, path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.redirect.navigator().navigations()
    }
}

pub fn refresh_ok(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({ "accessToken": access, "refreshToken": refresh }))
}

pub fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
