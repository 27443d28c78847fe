//! In-process mock REST backend for service and context tests.
//!
//! Binds an axum router to `127.0.0.1:0`, answers canned responses keyed by
//! method and path, and records every request it receives.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::session::SessionStore;
use crate::storage::{KeyValueStore, MemoryStore, StorageError};

/// One canned response.
#[derive(Clone, Debug)]
pub struct MockRoute {
    method: Method,
    path: String,
    query_contains: Option<String>,
    status: u16,
    body: String,
    content_type: &'static str,
    delay: Duration,
}

impl MockRoute {
    pub fn json(method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        Self {
            method,
            path: path.to_owned(),
            query_contains: None,
            status,
            body: body.to_string(),
            content_type: "application/json",
            delay: Duration::ZERO,
        }
    }

    pub fn text(method: Method, path: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path: path.to_owned(),
            query_contains: None,
            status,
            body: body.to_owned(),
            content_type: "text/plain;charset=UTF-8",
            delay: Duration::ZERO,
        }
    }

    /// Only match when the raw query string contains `fragment`.
    pub fn when_query(mut self, fragment: &str) -> Self {
        self.query_contains = Some(fragment.to_owned());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn matches(&self, method: &Method, uri: &Uri) -> bool {
        if &self.method != method || self.path != uri.path() {
            return false;
        }
        match &self.query_contains {
            Some(fragment) => uri.query().is_some_and(|q| q.contains(fragment.as_str())),
            None => true,
        }
    }
}

/// A request as seen by the mock backend.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<MockRoute>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockBackend {
    /// Base API URL including the `/api` prefix.
    pub base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub async fn start(routes: Vec<MockRoute>) -> std::io::Result<Self> {
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { routes: Arc::new(routes), recorded: Arc::clone(&recorded) };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app).await {
                tracing::warn!(%error, "mock backend stopped");
            }
        });

        Ok(Self { base_url: format!("http://{addr}/api"), recorded })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        match self.recorded.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Config pointing at this backend.
    pub fn config(&self) -> ClientConfig {
        ClientConfig { api_url: self.base_url.clone(), ..ClientConfig::default() }
    }

    /// API client over a fresh in-memory session store.
    pub fn client(&self) -> (ApiClient, SessionStore) {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        match ApiClient::new(&self.config(), sessions.clone()) {
            Ok(client) => (client, sessions),
            Err(error) => panic!("mock api client: {error}"),
        }
    }
}

async fn handle(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let authorization = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).map(ToOwned::to_owned);
    let entry = Recorded {
        method: method.clone(),
        path: uri.path().to_owned(),
        query: uri.query().map(ToOwned::to_owned),
        authorization,
        body,
    };
    match state.recorded.lock() {
        Ok(mut guard) => guard.push(entry),
        Err(poisoned) => poisoned.into_inner().push(entry),
    }

    let Some(route) = state.routes.iter().find(|r| r.matches(&method, &uri)).cloned() else {
        return (StatusCode::NOT_FOUND, "no mock route").into_response();
    };
    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }
    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, route.content_type)], route.body).into_response()
}

/// Memory store whose targeted removals always fail; `purge` fails too when
/// `fail_purge` is set.
pub struct StuckStore {
    inner: MemoryStore,
    fail_purge: bool,
}

impl StuckStore {
    pub fn new(fail_purge: bool) -> Self {
        Self { inner: MemoryStore::new(), fail_purge }
    }
}

impl KeyValueStore for StuckStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn put_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.inner.put_many(entries)
    }

    fn remove_many(&self, _keys: &[&str]) -> Result<(), StorageError> {
        Err(StorageError::Poisoned)
    }

    fn purge(&self) -> Result<(), StorageError> {
        if self.fail_purge { Err(StorageError::Poisoned) } else { self.inner.purge() }
    }
}
