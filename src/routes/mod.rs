//! Route table and the authentication guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every navigation goes through [`resolve`]: unknown paths fall back to the
//! home route, then [`guard`] sends anonymous visitors of protected routes to
//! the login screen. Both are pure functions of the auth snapshot.


use std::fmt;

use url::form_urlencoded;

use crate::state::auth::AuthState;

/// A screen of the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    ForgotPassword,
    /// Reset form; the token arrives in the emailed link's query string.
    ResetPassword { token: Option<String> },
    Home,
    Search,
    Movie { id: i64 },
    Favorites,
    Recommendations,
    Profile,
}

impl Route {
    /// Match a path (optionally with a query string). Unknown paths are `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let route = match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword { token: query_param(query, "token") },
            "/search" => Self::Search,
            "/favorites" => Self::Favorites,
            "/recommendations" => Self::Recommendations,
            "/profile" => Self::Profile,
            other => {
                let id = other.strip_prefix("/movie/")?.parse().ok()?;
                Self::Movie { id }
            }
        };
        Some(route)
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::ForgotPassword => "/forgot-password".into(),
            Self::ResetPassword { token: Some(token) } => {
                let query = form_urlencoded::Serializer::new(String::new()).append_pair("token", token).finish();
                format!("/reset-password?{query}")
            }
            Self::ResetPassword { token: None } => "/reset-password".into(),
            Self::Home => "/".into(),
            Self::Search => "/search".into(),
            Self::Movie { id } => format!("/movie/{id}"),
            Self::Favorites => "/favorites".into(),
            Self::Recommendations => "/recommendations".into(),
            Self::Profile => "/profile".into(),
        }
    }

    /// Whether the route requires an authenticated user.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::ForgotPassword | Self::ResetPassword { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen.
    #[must_use]
    pub fn route(&self) -> &Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}

/// Render public routes always and protected routes only when signed in.
#[must_use]
pub fn guard(state: &AuthState, route: Route) -> Navigation {
    if route.is_protected() && !state.is_authenticated() {
        Navigation::Redirect(Route::Login)
    } else {
        Navigation::Render(route)
    }
}

/// Resolve a raw path: unknown paths redirect home, then the guard applies.
#[must_use]
pub fn resolve(state: &AuthState, path: &str) -> Navigation {
    match Route::parse(path) {
        Some(route) => guard(state, route),
        None => match guard(state, Route::Home) {
            Navigation::Render(home) => Navigation::Redirect(home),
            redirect @ Navigation::Redirect(_) => redirect,
        },
    }
}

/// First value for `key`, percent-decoded. Empty values count as absent.
fn query_param(query: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
