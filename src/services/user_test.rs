use axum::http::Method;
use serde_json::json;

use super::*;
use crate::test_support::{MockBackend, MockRoute};

async fn service(routes: Vec<MockRoute>) -> (MockBackend, UserService) {
    let backend = MockBackend::start(routes).await.unwrap();
    let (api, _) = backend.client();
    (backend, UserService::new(api))
}

fn ann_profile() -> serde_json::Value {
    json!({ "id": 7, "nom": "Ann", "email": "a@b.com", "preferences": [{ "id": 28, "libelle": "Action" }] })
}

#[tokio::test]
async fn profile_decodes_preferences() {
    let (_backend, users) = service(vec![MockRoute::json(Method::GET, "/api/utilisateurs/7", 200, ann_profile())]).await;

    let profile = users.profile(7).await.unwrap();
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.preferences, vec![Genre { id: 28, label: "Action".into() }]);
}

#[tokio::test]
async fn preferences_lists_genres() {
    let (_backend, users) = service(vec![MockRoute::json(
        Method::GET,
        "/api/utilisateurs/7/preferences",
        200,
        json!([{ "id": 28, "libelle": "Action" }, { "id": 18, "libelle": "Drame" }]),
    )])
    .await;

    assert_eq!(users.preferences(7).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_preferences_puts_id_array() {
    let (backend, users) =
        service(vec![MockRoute::json(Method::PUT, "/api/utilisateurs/7/preferences", 200, ann_profile())]).await;

    let profile = users.update_preferences(7, &[28, 12]).await.unwrap();
    assert_eq!(profile.id, 7);
    assert_eq!(backend.requests()[0].json_body(), json!([28, 12]));
}

#[tokio::test]
async fn recommendations_query_by_user() {
    let (backend, users) = service(vec![MockRoute::json(
        Method::GET,
        "/api/recommandations",
        200,
        json!([{ "id": 1, "title": "Heat", "poster_path": "/heat.jpg" }]),
    )])
    .await;

    let films = users.recommendations(7).await.unwrap();
    assert_eq!(films[0].poster_url("w500").as_deref(), Some("https://image.tmdb.org/t/p/w500/heat.jpg"));
    assert_eq!(backend.requests()[0].query.as_deref(), Some("utilisateurId=7"));
}

#[tokio::test]
async fn unknown_user_is_client_error() {
    let (_backend, users) = service(vec![MockRoute::json(
        Method::GET,
        "/api/utilisateurs/99",
        404,
        json!({ "error": "Utilisateur non trouvé" }),
    )])
    .await;

    match users.profile(99).await.unwrap_err() {
        ApiError::Client { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Utilisateur non trouvé");
        }
        other => panic!("expected client error, got {other:?}"),
    }
}
