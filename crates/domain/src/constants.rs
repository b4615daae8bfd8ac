//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API configuration
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REFRESH_TIMEOUT_SECS: u64 = 15;

// Backend endpoints (relative to the base URL)
pub const AUTH_REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const AUTH_LOGIN_ENDPOINT: &str = "/auth/login";

// Persisted session keys
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

// Request headers
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Initial attempt plus the single retry allowed after a credential refresh.
pub const MAX_REQUEST_ATTEMPTS: usize = 2;

// Routes
pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

// Session storage
pub const DEFAULT_SESSION_FILE: &str = "synvia-session.json";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Synvia.session";

/// Message shown when the backend rejects a login without an explicit reason.
pub const DEFAULT_LOGIN_ERROR: &str = "Credenciais inválidas";
