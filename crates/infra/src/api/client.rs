//! Authenticated API client
//!
//! Every request carries the current bearer token and an `X-Request-ID`. A
//! 401 triggers one deduplicated token refresh through the
//! [`SessionManager`], after which the request is re-issued once with the
//! new token.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use synvia_common::auth::{SessionManager, StoreError};
use synvia_domain::constants::MAX_REQUEST_ATTEMPTS;
use synvia_domain::SynviaError;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use super::request::ApiRequest;
use crate::http::{generate_request_id, HttpClient};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// API client bound to one backend base URL and one session
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: HttpClient,
    session: SessionManager,
    base_url: String,
}

impl ApiClient {
    /// Create a client around an existing transport
    pub fn with_http_client(http: HttpClient, base_url: &str, session: SessionManager) -> Self {
        Self { http, session, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Issue a request, refreshing the session and retrying once on 401
    ///
    /// # Returns
    ///
    /// The response, if its status is accepted by the request (2xx/3xx by
    /// default)
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] / [`ApiError::Timeout`] when no response
    ///   arrived; these never trigger a refresh
    /// - [`ApiError::Unauthorized`] when the 401 persists after a retry or no
    ///   new token could be obtained
    /// - [`ApiError::Refresh`] when the refresh call itself failed
    /// - [`ApiError::Forbidden`], [`ApiError::RateLimit`],
    ///   [`ApiError::Client`] or [`ApiError::Server`] for other statuses
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let url = self.url_for(request.path());
        let request_id = match request.request_id() {
            Some(caller_id) => caller_id.clone(),
            None => HeaderValue::from_str(&generate_request_id())
                .map_err(|e| ApiError::Config(format!("invalid request id: {e}")))?,
        };
        let timeout = request.timeout_override().unwrap_or_else(|| self.http.timeout());
        let mut token = self.stored_access_token()?;
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(%url, ?request_id, attempt, "API request");

            let response = self
                .send_once(&request, &url, &request_id, token.as_deref())
                .await
                .map_err(|err| ApiError::from_transport(err, timeout))?;

            let status = response.status();
            if request.accepts(status) {
                debug!(%url, %status, attempt, "API request successful");
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status, &url, &body);

            if status == StatusCode::FORBIDDEN {
                warn!(%url, "access denied by backend");
                return Err(error);
            }

            if status != StatusCode::UNAUTHORIZED || attempt >= MAX_REQUEST_ATTEMPTS {
                debug!(%url, %status, attempt, "API request failed");
                return Err(error);
            }

            info!(%url, "access token rejected; refreshing session");
            match self.session.refresh_access_token().await? {
                Some(new_token) => token = Some(new_token),
                None => return Err(error),
            }
        }
    }

    /// Issue a request and decode the JSON response
    ///
    /// 204/205 responses decode from `null`, so `()` and `Option<T>` work.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus [`ApiError::Decode`] for
    /// undecodable bodies
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        decode_json(response).await
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json)
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// Execute a POST request
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json)
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).json(body)?).await
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json)
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).json(body)?).await
    }

    /// Execute a PATCH request
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json)
    pub async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(ApiRequest::patch(path).json(body)?).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json)
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::delete(path)).await
    }

    /// Access token for the next request; an unreadable session is sent
    /// anonymously so login can still replace it.
    fn stored_access_token(&self) -> Result<Option<String>, ApiError> {
        match self.session.access_token() {
            Ok(token) => Ok(token),
            Err(StoreError::Corrupt { key, reason }) => {
                warn!(%key, %reason, "stored session is unreadable; sending request without a token");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        url: &str,
        request_id: &HeaderValue,
        token: Option<&str>,
    ) -> Result<Response, SynviaError> {
        let headers = outbound_headers(request, request_id, token)?;
        let mut builder = self.http.request(request.method().clone(), url).headers(headers);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body_json() {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout_override() {
            builder = builder.timeout(timeout);
        }

        self.http.send(builder).await
    }
}

/// Caller headers plus correlation ID and, when signed in, the bearer token
fn outbound_headers(
    request: &ApiRequest,
    request_id: &HeaderValue,
    token: Option<&str>,
) -> Result<HeaderMap, SynviaError> {
    let mut headers = request.headers().clone();
    headers.insert(REQUEST_ID, request_id.clone());

    if let Some(token) = token {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| SynviaError::InvalidInput(format!("invalid access token: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
    }

    Ok(headers)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    // Handle 204/205 No Content responses
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            ApiError::Decode(format!(
                "No content response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

    if bytes.is_empty() {
        return serde_json::from_value(serde_json::Value::Null)
            .map_err(|e| ApiError::Decode(format!("Empty response body: {e}")));
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("Failed to parse response: {e}")))
}

/// Join a base URL and a request path; absolute URLs are used as-is
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
