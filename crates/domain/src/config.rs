//! Configuration structures
//!
//! Every section carries serde defaults so that a partial file (or no file at
//! all) still yields a usable configuration. Loading lives in
//! `synvia-infra::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_KEYCHAIN_SERVICE, DEFAULT_SESSION_FILE, LOGIN_ROUTE,
    REFRESH_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS,
};
use crate::impl_domain_str_conversions;

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (e.g. `http://localhost:8080/api`)
    pub base_url: String,
    /// Timeout for ordinary requests
    pub timeout_seconds: u64,
    /// Timeout for the token refresh call
    pub refresh_timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: REQUEST_TIMEOUT_SECS,
            refresh_timeout_seconds: REFRESH_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    #[must_use]
    pub const fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_seconds)
    }
}

/// Where session credentials are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process memory only; nothing survives a restart
    Memory,
    /// JSON file on disk
    #[default]
    File,
    /// Platform keychain
    Keychain,
}

impl_domain_str_conversions!(SessionBackend {
    Memory => "memory",
    File => "file",
    Keychain => "keychain",
});

/// Session persistence and navigation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    /// Session file path (file backend)
    pub path: String,
    /// Keychain service name (keychain backend)
    pub keychain_service: String,
    /// Route the presentation layer navigates to when the session expires
    pub login_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            path: DEFAULT_SESSION_FILE.to_string(),
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            login_route: LOGIN_ROUTE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.refresh_timeout(), Duration::from_secs(15));
        assert_eq!(config.session.backend, SessionBackend::File);
        assert_eq!(config.session.login_route, "/login");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api":{"base_url":"https://pdv.example.com/api"}}"#).unwrap();
        assert_eq!(config.api.base_url, "https://pdv.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn session_backend_parses_case_insensitively() {
        assert_eq!("Keychain".parse::<SessionBackend>().unwrap(), SessionBackend::Keychain);
        assert!("sqlite".parse::<SessionBackend>().is_err());
    }
}
