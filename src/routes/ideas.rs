//! Idea routes — list, create, fetch, append phrase.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::idea::{self, IdeaError, IdeaRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateIdeaBody {
    pub title: String,
}

#[derive(Deserialize)]
pub struct AppendPhraseBody {
    pub phrase: String,
}

/// `GET /api/ideas` — caller's ideas, newest first.
pub async fn list_ideas(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<IdeaRow>>, StatusCode> {
    let rows = idea::list_ideas(&state.pool, auth.user.id)
        .await
        .map_err(idea_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/ideas` — create an idea with no phrases.
pub async fn create_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateIdeaBody>,
) -> Result<(StatusCode, Json<IdeaRow>), StatusCode> {
    let row = idea::create_idea(&state.pool, auth.user.id, &body.title)
        .await
        .map_err(idea_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/ideas/:id` — one idea.
pub async fn get_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<IdeaRow>, StatusCode> {
    let row = idea::get_idea(&state.pool, auth.user.id, idea_id)
        .await
        .map_err(idea_error_to_status)?;
    Ok(Json(row))
}

/// `POST /api/ideas/:id/phrases` — append a phrase, newest last.
pub async fn append_phrase(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<AppendPhraseBody>,
) -> Result<Json<IdeaRow>, StatusCode> {
    let row = idea::append_phrase(&state.pool, auth.user.id, idea_id, &body.phrase)
        .await
        .map_err(idea_error_to_status)?;
    Ok(Json(row))
}

pub(crate) fn idea_error_to_status(err: IdeaError) -> StatusCode {
    match err {
        IdeaError::NotFound(_) => StatusCode::NOT_FOUND,
        IdeaError::Invalid(_) => StatusCode::BAD_REQUEST,
        IdeaError::Database(e) => {
            tracing::error!(error = %e, "idea query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
