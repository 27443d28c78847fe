//! Search box backing the search screen.
//!
//! Typing fires overlapping requests; responses can arrive out of order.
//! Every call takes a ticket from one shared sequencer, and a response whose
//! ticket has been superseded resolves to `Ok(None)` instead of replacing
//! newer results. Stale failures are dropped the same way.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use crate::error::ApiError;
use crate::net::types::{MoviePage, SearchFilters, UniversalQuery, UniversalSearchResult};
use crate::services::film::FilmService;
use crate::state::sequence::RequestSequencer;

pub struct SearchPage {
    films: FilmService,
    sequence: RequestSequencer,
}

impl SearchPage {
    #[must_use]
    pub fn new(films: FilmService) -> Self {
        Self { films, sequence: RequestSequencer::new() }
    }

    /// Filtered search. `Ok(None)` means a newer search has been issued.
    ///
    /// # Errors
    ///
    /// The call's [`ApiError`], if this is still the latest search.
    pub async fn search(&self, filters: &SearchFilters, user_id: Option<i64>) -> Result<Option<MoviePage>, ApiError> {
        let ticket = self.sequence.issue();
        let result = self.films.search(filters, user_id).await;
        self.sequence.accept(ticket, result).transpose()
    }

    /// Universal search. `Ok(None)` means a newer search has been issued.
    ///
    /// # Errors
    ///
    /// The call's [`ApiError`], if this is still the latest search.
    pub async fn universal(&self, query: &UniversalQuery) -> Result<Option<UniversalSearchResult>, ApiError> {
        let ticket = self.sequence.issue();
        let result = self.films.universal_search(query).await;
        self.sequence.accept(ticket, result).transpose()
    }
}
