//! Refresh endpoint client
//!
//! Calls `POST {base}/auth/refresh` directly on the transport, outside the
//! authenticated request flow, so a failing refresh can never recurse into
//! another refresh.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use synvia_common::auth::{RefreshError, TokenRefresher};
use synvia_domain::constants::AUTH_REFRESH_ENDPOINT;
use synvia_domain::{ApiConfig, RefreshRequest, RefreshResponse, SynviaError};
use tracing::{debug, instrument, warn};

use super::client::join_url;
use super::errors::extract_error_message;
use crate::http::HttpClient;

/// [`TokenRefresher`] backed by the backend refresh endpoint
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: HttpClient,
    url: String,
    timeout: Duration,
}

impl HttpTokenRefresher {
    pub fn new(http: HttpClient, config: &ApiConfig) -> Self {
        Self {
            http,
            url: join_url(&config.base_url, AUTH_REFRESH_ENDPOINT),
            timeout: config.refresh_timeout(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshError> {
        let body = RefreshRequest { refresh_token: refresh_token.to_string() };
        let request = self.http.request(Method::POST, &self.url).timeout(self.timeout).json(&body);

        let response = self.http.send(request).await.map_err(|err| match err {
            SynviaError::Timeout(_) => RefreshError::Timeout(self.timeout),
            other => RefreshError::Transport(other.to_string()),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let body = response.text().await.map_err(|e| RefreshError::Transport(e.to_string()))?;
        debug!(%status, "refresh endpoint answered");

        // An unreadable body carries no tokens; the session layer decides what that means.
        Ok(serde_json::from_str(&body).unwrap_or_else(|err| {
            warn!(error = %err, "refresh response is not valid JSON");
            RefreshResponse::default()
        }))
    }
}
