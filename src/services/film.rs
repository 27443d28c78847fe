//! Film catalog and TMDB search endpoints.

#[cfg(test)]
#[path = "film_test.rs"]
mod film_test;

use crate::error::ApiError;
use crate::net::api::{ApiClient, ApiRequest};
use crate::net::types::{Genre, MovieDetails, MoviePage, PersonSearchResult, SearchFilters, UniversalQuery, UniversalSearchResult};

#[derive(Clone)]
pub struct FilmService {
    api: ApiClient,
}

impl FilmService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Filtered search (`GET /films`). With no query and no genre the server
    /// falls back to its popular list.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn search(&self, filters: &SearchFilters, user_id: Option<i64>) -> Result<MoviePage, ApiError> {
        let request = ApiRequest::get("/films")
            .query_opt("query", filters.query.as_deref().filter(|q| !q.trim().is_empty()))
            .query_opt("genre", filters.genre)
            .query_opt("annee", filters.year)
            .query_opt("page", filters.page)
            .query_opt("utilisateurId", user_id);
        self.api.json(request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn details(&self, id: i64, user_id: Option<i64>) -> Result<MovieDetails, ApiError> {
        self.api.json(ApiRequest::get(format!("/films/{id}")).query_opt("utilisateurId", user_id)).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn popular(&self, page: u32) -> Result<MoviePage, ApiError> {
        self.api.json(ApiRequest::get("/films/populaires").query("page", page)).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.api.json(ApiRequest::get("/films/genres")).await
    }

    /// Films, actors and directors matching one free-text query.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn universal_search(&self, query: &UniversalQuery) -> Result<UniversalSearchResult, ApiError> {
        let request = ApiRequest::get("/films/recherche/universelle")
            .query("q", &query.q)
            .query_opt("utilisateurId", query.user_id)
            .query_opt("genre", query.genre)
            .query_opt("annee", query.year);
        self.api.json(request).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn search_by_actor(&self, name: &str, user_id: Option<i64>) -> Result<PersonSearchResult, ApiError> {
        self.person_search("/films/recherche/acteur", name, user_id).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`] from the call, unchanged.
    pub async fn search_by_director(&self, name: &str, user_id: Option<i64>) -> Result<PersonSearchResult, ApiError> {
        self.person_search("/films/recherche/realisateur", name, user_id).await
    }

    async fn person_search(&self, path: &str, name: &str, user_id: Option<i64>) -> Result<PersonSearchResult, ApiError> {
        self.api.json(ApiRequest::get(path).query("nom", name).query_opt("utilisateurId", user_id)).await
    }
}
