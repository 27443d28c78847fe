//! User profile, genre preferences and recommendations.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use crate::error::ApiError;
use crate::net::api::{ApiClient, ApiRequest};
use crate::net::types::{Genre, MovieSummary, UserProfile};

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        self.api.json(ApiRequest::get(format!("/utilisateurs/{user_id}"))).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn preferences(&self, user_id: i64) -> Result<Vec<Genre>, ApiError> {
        self.api.json(ApiRequest::get(format!("/utilisateurs/{user_id}/preferences"))).await
    }

    /// Replace the preferred genres with `genre_ids`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn update_preferences(&self, user_id: i64, genre_ids: &[i64]) -> Result<UserProfile, ApiError> {
        self.api.json(ApiRequest::put(format!("/utilisateurs/{user_id}/preferences")).json(genre_ids)?).await
    }

    /// Films suggested from the user's preferences and favorites.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn recommendations(&self, user_id: i64) -> Result<Vec<MovieSummary>, ApiError> {
        self.api.json(ApiRequest::get("/recommandations").query("utilisateurId", user_id)).await
    }
}
