//! Movie details screen.

#[cfg(test)]
#[path = "movie_test.rs"]
mod movie_test;

use serde::Serialize;

use crate::error::ApiError;
use crate::net::types::{Favori, FavoriRequest, MovieDetails, User};
use crate::services::favori::FavoriService;
use crate::services::film::FilmService;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieView {
    pub details: MovieDetails,
    pub is_favorite: bool,
}

impl MovieView {
    /// Load a film. The favorite flag is only checked for a signed-in user
    /// and reads as `false` when the check fails.
    ///
    /// # Errors
    ///
    /// Returns the details failure.
    pub async fn load(films: &FilmService, favoris: &FavoriService, id: i64, user: Option<&User>) -> Result<Self, ApiError> {
        let details = films.details(id, user.map(|u| u.id)).await?;
        let is_favorite = match user {
            Some(user) => favoris.is_favorite(user.id, id).await.unwrap_or_else(|error| {
                tracing::warn!(%error, film_id = id, "favorite check failed");
                false
            }),
            None => false,
        };
        Ok(Self { details, is_favorite })
    }

    /// Save this film to `user`'s favorites and flip the flag.
    ///
    /// # Errors
    ///
    /// The server's refusal (e.g. already a favorite); the flag is unchanged.
    pub async fn add_to_favorites(&mut self, favoris: &FavoriService, user: &User) -> Result<Favori, ApiError> {
        let request = FavoriRequest { film_id: self.details.id, user_id: user.id, comment: None };
        let saved = favoris.add(&request).await?;
        self.is_favorite = true;
        Ok(saved)
    }
}
