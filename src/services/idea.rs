//! Idea service — ideas and their phrases, scoped to one owner.
//!
//! DESIGN
//! ======
//! An idea is a title plus an ordered list of phrases, newest last. Phrases
//! are stored inline as a `TEXT[]` so a refinement loads everything it
//! needs in one row. Every query filters on `user_id`; an idea owned by
//! someone else is indistinguishable from a missing one.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IdeaError {
    #[error("idea not found: {0}")]
    NotFound(Uuid),
    #[error("invalid idea input: {0}")]
    Invalid(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IdeaError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_IDEA_NOT_FOUND",
            Self::Invalid(_) => "E_IDEA_INVALID",
            Self::Database(_) => "E_DATABASE",
        }
    }
}

/// Row returned from idea queries. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IdeaRow {
    pub id: Uuid,
    pub title: String,
    pub phrases: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

const IDEA_COLUMNS: &str = "id, title, phrases,
    (EXTRACT(EPOCH FROM created_at) * 1000)::BIGINT AS created_at,
    (EXTRACT(EPOCH FROM updated_at) * 1000)::BIGINT AS updated_at";

fn idea_from_row(row: &PgRow) -> IdeaRow {
    IdeaRow {
        id: row.get("id"),
        title: row.get("title"),
        phrases: row.get("phrases"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Trimmed `raw`, or `None` when nothing is left.
pub(crate) fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// =============================================================================
// CRUD
// =============================================================================

/// List the user's ideas, newest first by creation time.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_ideas(pool: &PgPool, user_id: Uuid) -> Result<Vec<IdeaRow>, IdeaError> {
    let rows = sqlx::query(&format!(
        "SELECT {IDEA_COLUMNS} FROM ideas WHERE user_id = $1 ORDER BY created_at DESC, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(idea_from_row).collect())
}

/// Create an idea with no phrases.
///
/// # Errors
///
/// Returns [`IdeaError::Invalid`] for a blank title, or a database error.
pub async fn create_idea(pool: &PgPool, user_id: Uuid, title: &str) -> Result<IdeaRow, IdeaError> {
    let title = non_blank(title).ok_or(IdeaError::Invalid("title must not be blank"))?;

    let row = sqlx::query(&format!(
        "INSERT INTO ideas (id, user_id, title) VALUES ($1, $2, $3) RETURNING {IDEA_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .fetch_one(pool)
    .await?;

    Ok(idea_from_row(&row))
}

/// Fetch one idea.
///
/// # Errors
///
/// Returns [`IdeaError::NotFound`] when the idea is missing or not owned by
/// `user_id`, or a database error.
pub async fn get_idea(pool: &PgPool, user_id: Uuid, idea_id: Uuid) -> Result<IdeaRow, IdeaError> {
    let row = sqlx::query(&format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1 AND user_id = $2"))
        .bind(idea_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(IdeaError::NotFound(idea_id))?;

    Ok(idea_from_row(&row))
}

/// Append a phrase to the end of an idea's list.
///
/// # Errors
///
/// Returns [`IdeaError::Invalid`] for a blank phrase,
/// [`IdeaError::NotFound`] when the idea is missing or not owned, or a
/// database error.
pub async fn append_phrase(pool: &PgPool, user_id: Uuid, idea_id: Uuid, phrase: &str) -> Result<IdeaRow, IdeaError> {
    let phrase = non_blank(phrase).ok_or(IdeaError::Invalid("phrase must not be blank"))?;

    let row = sqlx::query(&format!(
        "UPDATE ideas
         SET phrases = array_append(phrases, $3), updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {IDEA_COLUMNS}"
    ))
    .bind(idea_id)
    .bind(user_id)
    .bind(phrase)
    .fetch_optional(pool)
    .await?
    .ok_or(IdeaError::NotFound(idea_id))?;

    Ok(idea_from_row(&row))
}

#[cfg(test)]
#[path = "idea_test.rs"]
mod tests;
