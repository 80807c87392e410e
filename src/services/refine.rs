//! Refine service — phrases + task selection → parsed `Refinement`.
//!
//! DESIGN
//! ======
//! This is the caller side of the provider contract. It rejects requests
//! with nothing to analyze before any prompt is built, then runs
//! build → dispatch → parse. Once validation passes the outcome is always a
//! `Refinement`: provider failures arrive as envelopes, not errors.

use tracing::info;
use uuid::Uuid;

use super::idea::{self, IdeaError};
use crate::catalog::{TaskEntry, task_catalog};
use crate::llm::prompt::resolve_tasks;
use crate::llm::{ProviderRouter, Refinement};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("no phrases to refine")]
    NoPhrases,
    #[error("no known analysis tasks selected")]
    NoTasks,
    #[error(transparent)]
    Idea(#[from] IdeaError),
}

impl RefineError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPhrases => "E_NO_PHRASES",
            Self::NoTasks => "E_NO_TASKS",
            Self::Idea(e) => e.error_code(),
        }
    }
}

/// Refine an explicit phrase list.
///
/// # Errors
///
/// Returns [`RefineError::NoPhrases`] when `phrases` is empty and
/// [`RefineError::NoTasks`] when no selected id is in `catalog`.
pub async fn refine_phrases<P, T>(
    router: &ProviderRouter,
    provider: &str,
    phrases: &[P],
    task_ids: &[T],
    catalog: &[TaskEntry],
) -> Result<Refinement, RefineError>
where
    P: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    if phrases.is_empty() {
        return Err(RefineError::NoPhrases);
    }
    let task_count = resolve_tasks(task_ids, catalog).len();
    if task_count == 0 {
        return Err(RefineError::NoTasks);
    }

    info!(provider, phrases = phrases.len(), tasks = task_count, "refine: dispatching");
    let raw = router.refine(provider, phrases, task_ids, catalog).await;
    let refinement = Refinement::parse(&raw);
    info!(provider, failed = refinement.is_error(), "refine: result parsed");
    Ok(refinement)
}

/// Refine a stored idea's phrases against the process catalog.
///
/// # Errors
///
/// Returns [`RefineError::Idea`] if the idea cannot be loaded, otherwise as
/// [`refine_phrases`].
pub async fn refine_idea<T>(
    state: &AppState,
    user_id: Uuid,
    idea_id: Uuid,
    provider: &str,
    task_ids: &[T],
) -> Result<Refinement, RefineError>
where
    T: AsRef<str> + Sync,
{
    let idea = idea::get_idea(&state.pool, user_id, idea_id).await?;
    refine_phrases(&state.router, provider, &idea.phrases, task_ids, task_catalog()).await
}

#[cfg(test)]
#[path = "refine_test.rs"]
mod tests;
