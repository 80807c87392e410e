//! Auth routes — session cookie extraction, logout, dev session bootstrap.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

fn dev_auth_bypass_enabled() -> bool {
    env_bool("DEV_AUTH_BYPASS").unwrap_or(false)
}

/// Session cookie carrying `value`; `max_age` of zero clears it.
fn session_cookie(value: String, max_age: Option<Duration>) -> Cookie<'static> {
    let mut cookie = Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .build();
    if let Some(max_age) = max_age {
        cookie.set_max_age(max_age);
    }
    cookie
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session validation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/me` — return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout` — delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, user_id = %auth.user.id, "session delete failed");
    }

    let jar = CookieJar::new().add(session_cookie(String::new(), Some(Duration::ZERO)));
    (jar, StatusCode::NO_CONTENT)
}

/// `POST /api/dev/session` — local-development session without the identity service.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`.
pub async fn dev_session(
    State(state): State<AppState>,
) -> Result<(CookieJar, Json<session::SessionUser>), StatusCode> {
    if !dev_auth_bypass_enabled() {
        return Err(StatusCode::NOT_FOUND);
    }

    let (user, token) = session::create_dev_session(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "dev session creation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::warn!(user_id = %user.id, "dev session issued (DEV_AUTH_BYPASS)");

    let jar = CookieJar::new().add(session_cookie(token, None));
    Ok((jar, Json(user)))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
