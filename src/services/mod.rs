//! Thin typed wrappers over the REST endpoints, one per resource.

pub mod auth;
pub mod favori;
pub mod film;
pub mod user;
