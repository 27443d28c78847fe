//! Wire DTOs for the Cinéphile REST API.
//!
//! DESIGN
//! ======
//! The backend speaks French field names (`nom`, `titre`, `vu`, ...) and
//! passes TMDB payloads through in snake_case. Every record here is an
//! explicit struct with `Option` for fields the server may omit, so a
//! missing poster or release date is a type-level concern instead of a
//! runtime surprise. Unknown fields are ignored.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL of the TMDB image CDN.
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

// =============================================================================
// AUTH
// =============================================================================

/// The authenticated principal. Only ever obtained from an auth response or
/// from the persisted session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    /// Display name (`nom` on the wire).
    #[serde(rename = "nom", alias = "name")]
    pub name: String,
    pub email: String,
}

/// Persisted credential/user pair identifying the current principal.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").field("user", &self.user).finish()
    }
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token scheme, always `"Bearer"` in practice.
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub id: i64,
    #[serde(rename = "nom", alias = "name")]
    pub name: String,
    pub email: String,
}

impl AuthResponse {
    #[must_use]
    pub fn into_session(self) -> Session {
        Session { token: self.token, user: User { id: self.id, name: self.name, email: self.email } }
    }
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "motDePasse")]
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    #[serde(rename = "nom")]
    pub name: &'a str,
    pub email: &'a str,
    #[serde(rename = "motDePasse")]
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

// =============================================================================
// CATALOG (local entities)
// =============================================================================

/// A film genre. The local catalog calls the label `libelle`; TMDB payloads
/// call it `name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    #[serde(rename = "libelle", alias = "name")]
    pub label: String,
}

/// Actor or director as stored in the local catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    /// ISO date (`YYYY-MM-DD`), if known.
    #[serde(rename = "dateNaissance", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "profilePath", default)]
    pub profile_path: Option<String>,
}

/// A film saved in the local catalog (embedded in favorites).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Film {
    /// TMDB identifier.
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "anneeSortie", default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(rename = "paysOrigine", default)]
    pub country: Option<String>,
    /// Average rating out of 10.
    #[serde(default)]
    pub note: Option<f64>,
    #[serde(rename = "posterPath", default)]
    pub poster_path: Option<String>,
    #[serde(rename = "backdropPath", default)]
    pub backdrop_path: Option<String>,
    #[serde(rename = "realisateur", default)]
    pub director: Option<Person>,
    #[serde(rename = "acteurs", default, deserialize_with = "deserialize_vec_or_null")]
    pub actors: Vec<Person>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub genres: Vec<Genre>,
}

impl Film {
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        tmdb_image_url(size, self.poster_path.as_deref())
    }
}

// =============================================================================
// FAVORITES
// =============================================================================

/// A user's saved film with its watched flag and optional note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Favori {
    pub id: i64,
    #[serde(rename = "vu", default)]
    pub watched: bool,
    /// Server-local timestamp (`YYYY-MM-DDTHH:MM:SS`).
    #[serde(rename = "dateAjout", default)]
    pub added_at: Option<String>,
    #[serde(rename = "commentaire", default)]
    pub comment: Option<String>,
    pub film: Film,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FavoriRequest {
    #[serde(rename = "filmId")]
    pub film_id: i64,
    #[serde(rename = "utilisateurId")]
    pub user_id: i64,
    #[serde(rename = "commentaire", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Partial update of a favorite; absent fields are left untouched server-side.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpdateWatched {
    #[serde(rename = "vu", skip_serializing_if = "Option::is_none")]
    pub watched: Option<bool>,
    #[serde(rename = "commentaire", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// =============================================================================
// TMDB PASS-THROUGH
// =============================================================================

/// Movie entry in TMDB list payloads (search, popular, recommendations).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`; TMDB sends an empty string for unknown dates.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub genre_ids: Vec<i64>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub genres: Vec<Genre>,
}

impl MovieSummary {
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        tmdb_image_url(size, self.poster_path.as_deref())
    }

    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }
}

/// Paginated TMDB movie list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl Default for MoviePage {
    fn default() -> Self {
        Self { page: first_page(), results: Vec::new(), total_pages: 0, total_results: 0 }
    }
}

fn first_page() -> u32 {
    1
}

/// Filters for `GET /films`. Every field is optional; absent ones are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    /// Genre id.
    pub genre: Option<i64>,
    /// Release year (`annee` on the wire).
    #[serde(rename = "annee")]
    pub year: Option<i32>,
    pub page: Option<u32>,
}

/// Parameters for the universal (films + actors + directors) search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniversalQuery {
    pub q: String,
    pub user_id: Option<i64>,
    pub genre: Option<i64>,
    pub year: Option<i32>,
}

/// A person matched by universal search, with a slice of their filmography.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonWithFilms {
    pub id: i64,
    pub name: String,
    #[serde(rename = "profilePath", default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub films: Vec<MovieSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UniversalSearchResult {
    #[serde(default)]
    pub films: Option<MoviePage>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub actors: Vec<PersonWithFilms>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub directors: Vec<PersonWithFilms>,
}

impl UniversalSearchResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.films.as_ref().is_none_or(|page| page.results.is_empty())
            && self.actors.is_empty()
            && self.directors.is_empty()
    }
}

/// TMDB person summary attached to actor/director searches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Result of `/films/recherche/acteur` and `/films/recherche/realisateur`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonSearchResult {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub person: Option<PersonSummary>,
}

/// Full TMDB movie record returned by `GET /films/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        tmdb_image_url(size, self.poster_path.as_deref())
    }

    #[must_use]
    pub fn backdrop_url(&self, size: &str) -> Option<String> {
        tmdb_image_url(size, self.backdrop_path.as_deref())
    }

    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        release_year(self.release_date.as_deref())
    }

    /// Billed cast, in credit order, capped at `limit`.
    #[must_use]
    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        let cast = self.credits.as_ref().map_or(&[][..], |c| c.cast.as_slice());
        &cast[..cast.len().min(limit)]
    }

    /// Crew members credited with the `Director` job.
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.credits.iter().flat_map(|c| c.crew.iter()).filter(|member| member.job.as_deref() == Some("Director"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub cast: Vec<CastMember>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub crew: Vec<CrewMember>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

// =============================================================================
// USERS
// =============================================================================

/// User record returned by `/utilisateurs/{id}` and preference updates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub preferences: Vec<Genre>,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Build a TMDB CDN URL, or `None` when the path is absent or blank.
#[must_use]
pub fn tmdb_image_url(size: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    Some(format!("{TMDB_IMAGE_BASE_URL}/{size}{path}"))
}

fn release_year(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse::<i32>().ok()
}

/// Treat an explicit JSON `null` list the same as an absent one.
fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
