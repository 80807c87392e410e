//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! A JSON API under `/api` plus a health check. Every `/api/ideas*` route
//! takes the `AuthUser` extractor, so a request without a valid session is
//! rejected with 401 before any storage or provider work happens.

pub mod auth;
pub mod ideas;
pub mod refine;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/catalog", get(refine::catalog))
        .route("/api/providers", get(refine::providers))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dev/session", post(auth::dev_session))
        .route("/api/ideas", get(ideas::list_ideas).post(ideas::create_idea))
        .route("/api/ideas/{id}", get(ideas::get_idea))
        .route("/api/ideas/{id}/phrases", post(ideas::append_phrase))
        .route("/api/ideas/{id}/refine", post(refine::refine_idea))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
