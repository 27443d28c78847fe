//! A user's favorite films.

#[cfg(test)]
#[path = "favori_test.rs"]
mod favori_test;

use crate::error::ApiError;
use crate::net::api::{ApiClient, ApiRequest};
use crate::net::types::{Favori, FavoriRequest, UpdateWatched};

#[derive(Clone)]
pub struct FavoriService {
    api: ApiClient,
}

impl FavoriService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Save a film for a user. The server imports the film from TMDB if it
    /// is not in the local catalog yet.
    ///
    /// # Errors
    ///
    /// [`ApiError::Client`] when the film is already a favorite or unknown.
    pub async fn add(&self, request: &FavoriRequest) -> Result<Favori, ApiError> {
        self.api.json(ApiRequest::post("/favoris").json(request)?).await
    }

    /// Favorites of `user_id`, optionally narrowed to watched/unwatched.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn list(&self, user_id: i64, watched: Option<bool>) -> Result<Vec<Favori>, ApiError> {
        self.api.json(ApiRequest::get("/favoris").query("utilisateurId", user_id).query_opt("vu", watched)).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn update(&self, id: i64, update: &UpdateWatched) -> Result<Favori, ApiError> {
        self.api.json(ApiRequest::put(format!("/favoris/{id}")).json(update)?).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.api.empty(ApiRequest::delete(format!("/favoris/{id}"))).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn is_favorite(&self, user_id: i64, film_id: i64) -> Result<bool, ApiError> {
        let request = ApiRequest::get("/favoris/check").query("utilisateurId", user_id).query("filmId", film_id);
        self.api.json(request).await
    }
}
