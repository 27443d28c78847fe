//! Cinéphile client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Talks to the Cinéphile REST backend (films, favorites, preferences,
//! recommendations) on behalf of one user. The `cinephile` binary is the
//! front-end; everything it needs lives here.
//!
//! DESIGN
//! ======
//! - `net::api` is the only network egress point and attaches the bearer
//!   token read from `session` on every call.
//! - `services` wrap endpoints; `services::auth` alone writes the session.
//! - `state::auth` publishes who is signed in; `routes` guards navigation
//!   against that snapshot.
//! - `pages` combine service calls into per-screen view models.

pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
