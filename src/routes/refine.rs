//! Refinement routes — catalog, provider list, refine an idea.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{TaskEntry, task_catalog};
use crate::llm::{ProviderStatus, Refinement};
use crate::routes::auth::AuthUser;
use crate::routes::ideas::idea_error_to_status;
use crate::services::refine::{self, RefineError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RefineBody {
    pub provider: String,
    pub task_ids: Vec<String>,
}

/// `GET /api/catalog` — every selectable analysis.
pub async fn catalog() -> Json<&'static [TaskEntry]> {
    Json(task_catalog())
}

/// `GET /api/providers` — provider picker rows.
pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderStatus>> {
    Json(state.router.providers())
}

/// `POST /api/ideas/:id/refine` — run one refinement over the idea's phrases.
///
/// Provider failures are a 200 carrying the error envelope; only invalid
/// requests map to error statuses.
pub async fn refine_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<RefineBody>,
) -> Result<Json<Refinement>, StatusCode> {
    let refinement = refine::refine_idea(&state, auth.user.id, idea_id, &body.provider, &body.task_ids)
        .await
        .map_err(|e| {
            tracing::warn!(code = e.error_code(), error = %e, %idea_id, "refine rejected");
            refine_error_to_status(e)
        })?;
    Ok(Json(refinement))
}

pub(crate) fn refine_error_to_status(err: RefineError) -> StatusCode {
    match err {
        RefineError::NoPhrases | RefineError::NoTasks => StatusCode::BAD_REQUEST,
        RefineError::Idea(e) => idea_error_to_status(e),
    }
}
