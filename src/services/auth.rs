//! Auth endpoints plus ownership of the persisted session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth context is the only caller of `register`/`login`/`logout`; it
//! publishes state after these return. A session is persisted before it is
//! handed back, so "returned" always implies "persisted".

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::AuthError;
use crate::net::api::{ApiClient, ApiRequest};
use crate::net::types::{AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, Session};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidationError`] when the server rejects the payload
    /// (e.g. duplicate email), plus the shared network/server/storage failures.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = ApiRequest::post("/auth/register")
            .json(&RegisterRequest { name, email, password })
            .map_err(|e| AuthError::from_api(e, AuthError::ValidationError))?;
        let response: AuthResponse =
            self.api.json(request).await.map_err(|e| AuthError::from_api(e, AuthError::ValidationError))?;
        self.persist(response)
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] on any 4xx, plus the shared
    /// network/server/storage failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = ApiRequest::post("/auth/login")
            .json(&LoginRequest { email, password })
            .map_err(|e| AuthError::from_api(e, |_| AuthError::InvalidCredentials))?;
        let response: AuthResponse =
            self.api.json(request).await.map_err(|e| AuthError::from_api(e, |_| AuthError::InvalidCredentials))?;
        self.persist(response)
    }

    /// Ask for a reset link. The returned message is the server's, verbatim;
    /// it deliberately says nothing about whether the account exists.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidationError`] if the email is rejected as malformed.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let request = ApiRequest::post("/auth/forgot-password")
            .json(&ForgotPasswordRequest { email })
            .map_err(|e| AuthError::from_api(e, AuthError::ValidationError))?;
        self.api.text(request).await.map_err(|e| AuthError::from_api(e, AuthError::ValidationError))
    }

    /// Set a new password using an emailed reset token.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidOrExpiredToken`] when the server rejects the token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<String, AuthError> {
        let request = ApiRequest::post("/auth/reset-password")
            .json(&ResetPasswordRequest { token, new_password })
            .map_err(|e| AuthError::from_api(e, AuthError::InvalidOrExpiredToken))?;
        self.api.text(request).await.map_err(|e| AuthError::from_api(e, AuthError::InvalidOrExpiredToken))
    }

    /// Drop the persisted session. Local only; never fails.
    pub fn logout(&self) {
        self.session.clear();
    }

    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.session.load()
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.has_session()
    }

    fn persist(&self, response: AuthResponse) -> Result<Session, AuthError> {
        if response.token.trim().is_empty() {
            return Err(AuthError::Decode("auth response carried an empty token".into()));
        }
        let session = response.into_session();
        self.session.save(&session)?;
        tracing::info!(user_id = session.user.id, "session persisted");
        Ok(session)
    }
}
