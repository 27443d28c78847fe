//! Persisted session: the bearer token and the user record it belongs to.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API client reads the token from here on every request; the auth
//! service is the only writer. Token and user are always written and cleared
//! together so a reader never observes one without the other.
//!
//! ERROR HANDLING
//! ==============
//! `clear` cannot fail. If the targeted removal errors, the whole store is
//! purged; either way this process treats the session as gone until the next
//! `save`.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::net::types::{Session, User};
use crate::storage::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    /// Set by `clear`, reset by `save`. Shared across clones.
    cleared: Arc<AtomicBool>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, cleared: Arc::new(AtomicBool::new(false)) }
    }

    /// Persist both halves of the session in one atomic batch, replacing any
    /// previous session.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be written.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user).map_err(|error| StorageError::Corrupt {
            path: USER_KEY.into(),
            message: error.to_string(),
        })?;
        self.store.put_many(&[(TOKEN_KEY, session.token.as_str()), (USER_KEY, user.as_str())])?;
        self.cleared.store(false, Ordering::Release);
        Ok(())
    }

    /// Read the persisted session. Anything missing, empty or unparseable is
    /// reported as no session.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let token = self.token()?;
        let raw_user = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("token present without user record; treating as signed out");
                return None;
            }
            Err(error) => {
                tracing::warn!(%error, "session user unreadable");
                return None;
            }
        };
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(error) => {
                tracing::warn!(%error, "persisted user record is malformed; ignoring session");
                None
            }
        }
    }

    /// Current bearer token, if a non-empty one is stored.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if self.cleared.load(Ordering::Acquire) {
            return None;
        }
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "session token unreadable");
                None
            }
        }
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    /// Remove both halves of the session. Never fails for the caller: a
    /// failed removal falls back to purging the store, and the session reads
    /// as absent in this process regardless.
    pub fn clear(&self) {
        self.cleared.store(true, Ordering::Release);
        let Err(error) = self.store.remove_many(&[TOKEN_KEY, USER_KEY]) else {
            return;
        };
        tracing::warn!(%error, "session removal failed; purging store");
        if let Err(error) = self.store.purge() {
            tracing::error!(%error, "failed to purge session store; session stays on disk");
        }
    }
}
