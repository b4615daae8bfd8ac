//! Outbound request descriptor

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use synvia_domain::constants::REQUEST_ID_HEADER;

use super::errors::ApiError;

/// Decides whether a response status counts as success
pub type StatusPredicate = Arc<dyn Fn(StatusCode) -> bool + Send + Sync>;

/// One logical API request
///
/// The body is held as a JSON value so the request can be re-issued after a
/// token refresh.
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    accept_status: Option<StatusPredicate>,
    timeout: Option<Duration>,
}

impl ApiRequest {
    /// Request for `path`, relative to the configured base URL
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
            accept_status: None,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON body
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if `body` cannot be serialized
    pub fn json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Config(format!("Failed to serialize body: {e}")))?;
        Ok(self.body(value))
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Treat every status for which `predicate` holds as success
    #[must_use]
    pub fn accept_status<F>(mut self, predicate: F) -> Self
    where
        F: Fn(StatusCode) -> bool + Send + Sync + 'static,
    {
        self.accept_status = Some(Arc::new(predicate));
        self
    }

    /// Override the client-wide timeout for this request
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn body_json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub const fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    /// Caller-supplied correlation ID, if any
    ///
    /// Returned as the raw header value so opaque bytes are forwarded intact.
    pub fn request_id(&self) -> Option<&HeaderValue> {
        self.headers.get(REQUEST_ID_HEADER)
    }

    /// Whether `status` counts as success for this request
    ///
    /// Defaults to 2xx and 3xx.
    pub fn accepts(&self, status: StatusCode) -> bool {
        self.accept_status.as_ref().map_or_else(
            || status.is_success() || status.is_redirection(),
            |predicate| predicate(status),
        )
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_body", &self.body.is_some())
            .field("query", &self.query)
            .field("custom_status", &self.accept_status.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_acceptance() {
        let request = ApiRequest::get("/produtos");
        assert!(request.accepts(StatusCode::OK));
        assert!(request.accepts(StatusCode::NO_CONTENT));
        assert!(request.accepts(StatusCode::NOT_MODIFIED));
        assert!(!request.accepts(StatusCode::UNAUTHORIZED));
        assert!(!request.accepts(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn custom_status_predicate() {
        let request = ApiRequest::post("/auth/login").accept_status(|s| s.as_u16() < 500);
        assert!(request.accepts(StatusCode::UNAUTHORIZED));
        assert!(request.accepts(StatusCode::PRECONDITION_REQUIRED));
        assert!(!request.accepts(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn request_id_reads_caller_header() {
        let request = ApiRequest::get("/clientes")
            .header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("trace-42"));
        assert_eq!(request.request_id().unwrap(), "trace-42");
        assert_eq!(ApiRequest::get("/clientes").request_id(), None);

        let opaque = HeaderValue::from_bytes(b"caixa-\xe7-01").unwrap();
        let request = ApiRequest::get("/clientes")
            .header(HeaderName::from_static("x-request-id"), opaque.clone());
        assert_eq!(request.request_id(), Some(&opaque));
    }

    #[test]
    fn json_body_is_kept_for_reissue() {
        #[derive(Serialize)]
        struct NovaVenda<'a> {
            cliente_id: i64,
            forma_pagamento: &'a str,
        }

        let request = ApiRequest::post("/vendas")
            .json(&NovaVenda { cliente_id: 3, forma_pagamento: "pix" })
            .unwrap()
            .query("loja", "centro");

        let cloned = request.clone();
        assert_eq!(cloned.body_json().unwrap()["forma_pagamento"], "pix");
        assert_eq!(cloned.query_pairs(), &[("loja".to_string(), "centro".to_string())]);
        assert_eq!(cloned.method(), &Method::POST);
    }
}
