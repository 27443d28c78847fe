//! Process-wide authentication state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard and by every user-aware page. Written only by
//! this module's `login`, `register` and `logout`, after the auth service
//! call has fully succeeded.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel. The sender is private, so
//! the context is the single writer; any number of observers hold receivers
//! and see every transition. Hydration reads the persisted session once at
//! construction and trusts it without a network round-trip.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tokio::sync::watch;

use crate::error::AuthError;
use crate::net::types::{Session, User};
use crate::services::auth::AuthService;

/// Coarse authentication status for observers that do not need the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticated,
}

/// Snapshot of who is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
}

impl AuthState {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() { AuthStatus::Authenticated } else { AuthStatus::Anonymous }
    }
}

/// Owner of the current [`AuthState`].
pub struct AuthContext {
    auth: AuthService,
    tx: watch::Sender<AuthState>,
}

impl AuthContext {
    /// Build the context, hydrating from the persisted session.
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        let initial = auth.current_session().map_or_else(AuthState::anonymous, |s| AuthState::authenticated(s.user));
        tracing::debug!(authenticated = initial.is_authenticated(), "auth context hydrated");
        let (tx, _rx) = watch::channel(initial);
        Self { auth, tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    /// The auth service this context drives, for password-reset flows that
    /// do not change state.
    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.auth
    }

    /// Sign in and publish the new user.
    ///
    /// # Errors
    ///
    /// Propagates [`AuthService::login`] failures; state is left unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self.auth.login(email, password).await?;
        Ok(self.publish(session))
    }

    /// Create an account, sign in as it and publish the new user.
    ///
    /// # Errors
    ///
    /// Propagates [`AuthService::register`] failures; state is left unchanged.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self.auth.register(name, email, password).await?;
        Ok(self.publish(session))
    }

    /// Clear the session and publish the anonymous state.
    pub fn logout(&self) {
        self.auth.logout();
        self.tx.send_replace(AuthState::anonymous());
        tracing::info!("signed out");
    }

    fn publish(&self, session: Session) -> User {
        let user = session.user;
        tracing::info!(user_id = user.id, "signed in");
        self.tx.send_replace(AuthState::authenticated(user.clone()));
        user
    }
}
