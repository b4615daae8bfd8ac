//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Probes multiple paths for a config file (JSON or TOML); uses built-in
//!    defaults when none exists
//! 2. Applies `SYNVIA_*` environment overrides on top
//! 3. Validates the result
//!
//! ## Environment Variables
//! - `SYNVIA_API_BASE_URL`: Backend base URL
//! - `SYNVIA_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `SYNVIA_REFRESH_TIMEOUT_SECS`: Token refresh timeout in seconds
//! - `SYNVIA_USER_AGENT`: User agent sent with every request
//! - `SYNVIA_SESSION_BACKEND`: `memory`, `file` or `keychain`
//! - `SYNVIA_SESSION_PATH`: Session file path (file backend)
//! - `SYNVIA_KEYCHAIN_SERVICE`: Keychain service name (keychain backend)
//! - `SYNVIA_LOGIN_ROUTE`: Route shown when the session expires
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./synvia.{json,toml}` (current working
//!    directory)
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use synvia_domain::{Config, Result, SessionBackend, SynviaError};
use url::Url;

/// Load configuration: file (or defaults), then environment overrides
///
/// # Errors
/// Returns `SynviaError::Config` if a config file exists but cannot be read
/// or parsed, an override has an invalid value, or validation fails
pub fn load() -> Result<Config> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found; using defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `SynviaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SynviaError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SynviaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SynviaError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Apply `SYNVIA_*` environment variables on top of `config`
///
/// Unset or empty variables leave the current value in place.
///
/// # Errors
/// Returns `SynviaError::Config` if a variable has an invalid value
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(url) = env_var("SYNVIA_API_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(secs) = env_parse::<u64>("SYNVIA_API_TIMEOUT_SECS")? {
        config.api.timeout_seconds = secs;
    }
    if let Some(secs) = env_parse::<u64>("SYNVIA_REFRESH_TIMEOUT_SECS")? {
        config.api.refresh_timeout_seconds = secs;
    }
    if let Some(agent) = env_var("SYNVIA_USER_AGENT") {
        config.api.user_agent = Some(agent);
    }
    if let Some(backend) = env_parse::<SessionBackend>("SYNVIA_SESSION_BACKEND")? {
        config.session.backend = backend;
    }
    if let Some(path) = env_var("SYNVIA_SESSION_PATH") {
        config.session.path = path;
    }
    if let Some(service) = env_var("SYNVIA_KEYCHAIN_SERVICE") {
        config.session.keychain_service = service;
    }
    if let Some(route) = env_var("SYNVIA_LOGIN_ROUTE") {
        config.session.login_route = route;
    }
    Ok(())
}

/// Check a loaded configuration for values the client cannot work with
///
/// # Errors
/// Returns `SynviaError::Config` describing the first invalid value
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        SynviaError::Config(format!("Invalid API base URL '{}': {e}", config.api.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SynviaError::Config(format!(
            "API base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.api.timeout_seconds == 0 || config.api.refresh_timeout_seconds == 0 {
        return Err(SynviaError::Config("Timeouts must be at least one second".to_string()));
    }

    if !config.session.login_route.starts_with('/') {
        return Err(SynviaError::Config(format!(
            "Login route must start with '/', got '{}'",
            config.session.login_route
        )));
    }

    if config.session.backend == SessionBackend::File && config.session.path.trim().is_empty() {
        return Err(SynviaError::Config("Session file path is empty".to_string()));
    }

    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `SynviaError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SynviaError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SynviaError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SynviaError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("synvia.json"),
        dir.join("synvia.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `SynviaError::Config` naming the variable if parsing fails
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| SynviaError::Config(format!("Invalid value for {key} ('{raw}'): {e}")))
        })
        .transpose()
}
