use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::net::types::{Session, User};
use crate::storage::MemoryStore;
use crate::test_support::{MockBackend, MockRoute};

fn offline_client() -> (ApiClient, SessionStore) {
    let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
    let config = ClientConfig { api_url: "http://cinema.test/api".into(), ..ClientConfig::default() };
    (ApiClient::new(&config, sessions.clone()).unwrap(), sessions)
}

fn ann_session() -> Session {
    Session { token: "t1".into(), user: User { id: 7, name: "Ann".into(), email: "a@b.com".into() } }
}

// =============================================================
// Request shaping
// =============================================================

#[test]
fn endpoint_url_joins_without_double_slash() {
    assert_eq!(endpoint_url("http://h/api/", "/films"), "http://h/api/films");
    assert_eq!(endpoint_url("http://h/api", "films/1"), "http://h/api/films/1");
}

#[test]
fn build_request_serializes_query_parameters() {
    let (client, _) = offline_client();
    let request = ApiRequest::get("/films").query("query", "star wars").query("page", 2);
    let built = client.build_request(&request).unwrap();
    assert_eq!(built.method(), &Method::GET);
    assert_eq!(built.url().as_str(), "http://cinema.test/api/films?query=star+wars&page=2");
}

#[test]
fn build_request_skips_absent_optional_query() {
    let (client, _) = offline_client();
    let request = ApiRequest::get("/films/populaires").query_opt("utilisateurId", None::<i64>).query_opt("page", Some(1));
    let built = client.build_request(&request).unwrap();
    assert_eq!(built.url().query(), Some("page=1"));
}

#[test]
fn build_request_without_session_has_no_authorization() {
    let (client, _) = offline_client();
    let built = client.build_request(&ApiRequest::get("/films/genres")).unwrap();
    assert!(built.headers().get(reqwest::header::AUTHORIZATION).is_none());
}

#[test]
fn build_request_attaches_bearer_from_persisted_session() {
    let (client, sessions) = offline_client();
    sessions.save(&ann_session()).unwrap();
    let built = client.build_request(&ApiRequest::get("/favoris")).unwrap();
    assert_eq!(built.headers().get(reqwest::header::AUTHORIZATION).unwrap(), "Bearer t1");
}

#[test]
fn build_request_reads_token_fresh_each_time() {
    let (client, sessions) = offline_client();
    sessions.save(&ann_session()).unwrap();
    sessions.clear();
    let built = client.build_request(&ApiRequest::get("/favoris")).unwrap();
    assert!(built.headers().get(reqwest::header::AUTHORIZATION).is_none());
}

#[test]
fn build_request_encodes_json_body() {
    let (client, _) = offline_client();
    let request = ApiRequest::put("/utilisateurs/7/preferences").json(&[28, 12]).unwrap();
    let built = client.build_request(&request).unwrap();
    assert_eq!(built.method(), &Method::PUT);
    assert_eq!(built.headers().get(reqwest::header::CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(built.body().and_then(reqwest::Body::as_bytes), Some(&b"[28,12]"[..]));
}

#[test]
fn response_text_accepts_plain_and_json_string() {
    let plain = ApiResponse { status: 200, body: "Mot de passe modifié avec succès".into() };
    assert_eq!(plain.text(), "Mot de passe modifié avec succès");
    let quoted = ApiResponse { status: 200, body: "\"ok\"".into() };
    assert_eq!(quoted.text(), "ok");
}

#[test]
fn response_json_decode_failure_is_decode_error() {
    let response = ApiResponse { status: 200, body: "<html>".into() };
    assert!(matches!(response.json::<Vec<i64>>(), Err(ApiError::Decode(_))));
}

// =============================================================
// Against the mock backend
// =============================================================

#[tokio::test]
async fn execute_classifies_4xx_as_client_error_with_message() {
    let backend = MockBackend::start(vec![MockRoute::json(
        Method::GET,
        "/api/favoris/check",
        400,
        json!({ "message": "utilisateurId manquant" }),
    )])
    .await
    .unwrap();
    let (client, _) = backend.client();

    let err = client.empty(ApiRequest::get("/favoris/check")).await.unwrap_err();
    match err {
        ApiError::Client { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "utilisateurId manquant");
        }
        other => panic!("expected client error, got {other:?}"),
    }
}

#[tokio::test]
async fn execute_classifies_5xx_as_server_error() {
    let backend =
        MockBackend::start(vec![MockRoute::text(Method::GET, "/api/films/populaires", 502, "bad gateway")]).await.unwrap();
    let (client, _) = backend.client();

    let err = client.empty(ApiRequest::get("/films/populaires")).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 502, .. }));
}

#[tokio::test]
async fn execute_reports_network_error_when_nothing_listens() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
    let config = ClientConfig { api_url: format!("http://{addr}/api"), ..ClientConfig::default() };
    let client = ApiClient::new(&config, sessions).unwrap();

    let err = client.empty(ApiRequest::get("/films")).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn json_sends_bearer_and_decodes_body() {
    let backend = MockBackend::start(vec![MockRoute::json(Method::GET, "/api/films/genres", 200, json!([
        { "id": 28, "libelle": "Action" }
    ]))])
    .await
    .unwrap();
    let (client, sessions) = backend.client();
    sessions.save(&ann_session()).unwrap();

    let genres: Vec<crate::net::types::Genre> = client.json(ApiRequest::get("/films/genres")).await.unwrap();
    assert_eq!(genres.len(), 1);

    let seen = backend.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t1"));
}
