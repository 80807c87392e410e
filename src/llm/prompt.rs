//! Prompt builder — phrases + selected tasks → one composed prompt.
//!
//! Pure: no I/O, and identical inputs always produce an identical prompt.
//! Rejecting empty selections is the caller's job; an empty task list still
//! yields a well-formed prompt.

use super::types::ComposedPrompt;
use crate::catalog::{self, TaskEntry};

const SYSTEM_INSTRUCTION: &str = "You are an expert product strategist, market analyst, and project manager. \
Your task is to analyze raw, unstructured ideas and provide structured, actionable feedback. \
You must perform the requested analysis tasks and return the response ONLY as a single, valid JSON object. \
The keys of the JSON object must be the snake_cased 'id' of each task requested \
(e.g., 'structure', 'sub_components', 'pitch'). \
The value for each key must be your analysis, formatted as a Markdown string.";

/// Build the prompt for one refinement request.
///
/// Ids missing from `catalog` are dropped without error, and a repeated id
/// only counts once. The expected-key list mirrors the surviving ids in
/// selection order.
#[must_use]
pub fn build_prompt<P, T>(phrases: &[P], selected_task_ids: &[T], catalog: &[TaskEntry]) -> ComposedPrompt
where
    P: AsRef<str>,
    T: AsRef<str>,
{
    let tasks = resolve_tasks(selected_task_ids, catalog);

    let snippets = phrases
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n- ");
    let fragments = tasks
        .iter()
        .map(|task| task.prompt.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let keys = tasks
        .iter()
        .map(|task| format!("\"{}\"", task.id))
        .collect::<Vec<_>>()
        .join(", ");

    let user = format!(
        "Here are the raw idea snippets, newest last:\n- {snippets}\n\nTasks:\n{fragments}\n\n\
         Return a valid JSON object with keys for each requested task: [{keys}]"
    );

    ComposedPrompt { system: SYSTEM_INSTRUCTION.to_owned(), user }
}

/// Catalog entries for the selected ids, in selection order, unknown and
/// repeated ids removed.
#[must_use]
pub fn resolve_tasks<'a, T: AsRef<str>>(selected_task_ids: &[T], catalog: &'a [TaskEntry]) -> Vec<&'a TaskEntry> {
    let mut tasks: Vec<&TaskEntry> = Vec::with_capacity(selected_task_ids.len());
    for id in selected_task_ids {
        let Some(entry) = catalog::find(catalog, id.as_ref()) else {
            continue;
        };
        if !tasks.iter().any(|seen| seen.id == entry.id) {
            tasks.push(entry);
        }
    }
    tasks
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
