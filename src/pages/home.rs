//! Landing screen: popular films plus personal recommendations.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use serde::Serialize;

use crate::error::ApiError;
use crate::net::types::{MovieSummary, User};
use crate::services::film::FilmService;
use crate::services::user::UserService;

/// Films shown per home-screen row.
pub const HOME_ROW_LEN: usize = 12;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HomeView {
    pub popular: Vec<MovieSummary>,
    pub recommendations: Vec<MovieSummary>,
}

impl HomeView {
    /// Load the home rows. Popular films are required; recommendations are
    /// only fetched for a signed-in user and degrade to empty on failure.
    ///
    /// # Errors
    ///
    /// Returns the popular-films failure.
    pub async fn load(films: &FilmService, users: &UserService, user: Option<&User>) -> Result<Self, ApiError> {
        let mut popular = films.popular(1).await?.results;
        popular.truncate(HOME_ROW_LEN);

        let recommendations = match user {
            Some(user) => match users.recommendations(user.id).await {
                Ok(mut list) => {
                    list.truncate(HOME_ROW_LEN);
                    list
                }
                Err(error) => {
                    tracing::warn!(%error, user_id = user.id, "recommendations unavailable");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self { popular, recommendations })
    }
}
