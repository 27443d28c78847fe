//! REST client: the single network egress point.
//!
//! Every outgoing call goes through [`ApiClient::execute`], which joins the
//! relative path onto the configured base URL, serializes query parameters,
//! attaches `Authorization: Bearer <token>` when a session is persisted, and
//! classifies the outcome.
//!
//! ERROR HANDLING
//! ==============
//! Nothing is caught or retried here. Transport failures, 4xx and 5xx come
//! back as distinct [`ApiError`] variants and the caller decides.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::fmt::Display;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, error_message_from_body};
use crate::session::SessionStore;

// =============================================================================
// REQUEST DESCRIPTION
// =============================================================================

/// Method, relative path, query and optional JSON body of one call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl Display) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Append `key=value` only when `value` is present.
    #[must_use]
    pub fn query_opt<V: Display>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the body cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// A successful (2xx) response with its body already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Body as a message string. Accepts raw text or a JSON string literal.
    #[must_use]
    pub fn text(&self) -> String {
        match serde_json::from_str::<String>(&self.body) {
            Ok(decoded) => decoded,
            Err(_) => self.body.trim().to_owned(),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to one base URL and one persisted session.
///
/// Cheap to clone; clones share the connection pool and session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self { http, base_url: config.api_url.trim_end_matches('/').to_owned(), session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a relative API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    /// Assemble the outgoing request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the URL or a header is invalid.
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::Request, ApiError> {
        let mut builder = self.http.request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    /// Send a request and return the 2xx response, or the classified failure.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when no response arrives
    /// - [`ApiError::Client`] for 4xx, [`ApiError::Server`] for 5xx
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let outgoing = self.build_request(&request)?;
        tracing::debug!(method = %request.method, path = %request.path, "api request");

        let response = self.http.execute(outgoing).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(method = %request.method, path = %request.path, status, "api response");

        if !(200..300).contains(&status) {
            return Err(ApiError::from_status(status, error_message_from_body(&body)));
        }
        Ok(ApiResponse { status, body })
    }

    /// Send and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClient::execute`] failures and [`ApiError::Decode`].
    pub async fn json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    /// Send and return the body as a message string.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClient::execute`] failures.
    pub async fn text(&self, request: ApiRequest) -> Result<String, ApiError> {
        Ok(self.execute(request).await?.text())
    }

    /// Send and ignore the body (e.g. `204 No Content`).
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClient::execute`] failures.
    pub async fn empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
