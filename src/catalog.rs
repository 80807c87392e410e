//! Task catalog — the fixed list of analyses a refinement can request.
//!
//! Loaded once per process and never mutated. Entry ids double as the keys
//! of the JSON object the model is asked to return.

use std::sync::OnceLock;

use serde::Serialize;

/// One selectable analysis dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEntry {
    pub id: String,
    pub label: String,
    pub prompt: String,
}

impl TaskEntry {
    #[must_use]
    pub fn new(id: &str, label: &str, prompt: &str) -> Self {
        Self { id: id.to_owned(), label: label.to_owned(), prompt: prompt.to_owned() }
    }
}

/// Ids preselected when a user first opens the analysis picker.
pub const DEFAULT_SELECTION: [&str; 4] = ["pitch", "category", "mvp", "next_steps"];

const ENTRIES: &[(&str, &str, &str)] = &[
    ("structure", "Structure", "Propose an optimal outline or hierarchy."),
    ("sub_components", "Sub-components", "Break the idea into logical modules or steps."),
    (
        "category",
        "Category",
        "Classify this idea into a category (e.g., How-to Guide, Product Spec, Marketing Plan, etc.) and explain your choice.",
    ),
    ("related_topics", "Related Topics", "List 3 related topics or similar products."),
    ("audience", "Target Audience", "Who are the target audiences & personas for this idea?"),
    (
        "gap_analysis",
        "Competitive Gap",
        "What are the existing solutions & the competitive gap this idea could fill?",
    ),
    ("use_cases", "Use Cases", "Describe potential use-cases or jobs-to-be-done."),
    ("feasibility", "Feasibility", "Assess the feasibility & required resources."),
    ("mvp", "MVP", "Define a Minimal Viable Product (MVP) version of this idea."),
    ("timeline", "Timeline", "Propose a high-level timeline with key milestones."),
    ("risks", "Risks & Mitigations", "Identify key risks & potential mitigations."),
    ("kpis", "Metrics / KPIs", "What metrics or KPIs should be used to track success?"),
    ("revenue", "Revenue Model", "Suggest a potential revenue or impact model."),
    ("tech_stack", "Tech Stack", "Suggest a potential scalability plan & tech-stack."),
    ("pitch", "Elevator Pitch", "Write a 30-word elevator pitch."),
    ("names", "Tagline & Names", "Propose a tagline and 3 alternative names."),
    ("next_steps", "Next Actions", "What are the immediate next best action steps?"),
    ("unknowns", "Open Questions", "List the open questions or unknowns about this idea."),
    ("mind_map", "Mind-map Summary", "Create a mind-map style summary in list form."),
    (
        "image_prompt",
        "Image Prompt",
        "Generate a detailed prompt for an image or diagram that visually represents this idea.",
    ),
];

/// The process-wide catalog.
#[must_use]
pub fn task_catalog() -> &'static [TaskEntry] {
    static CATALOG: OnceLock<Vec<TaskEntry>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        ENTRIES
            .iter()
            .map(|(id, label, prompt)| TaskEntry::new(id, label, prompt))
            .collect()
    })
}

/// Find an entry by id.
#[must_use]
pub fn find<'a>(catalog: &'a [TaskEntry], id: &str) -> Option<&'a TaskEntry> {
    catalog.iter().find(|entry| entry.id == id)
}

/// Heading for a result key: the catalog label, or the key itself upper-cased
/// with underscores as spaces when the model returned an unexpected key.
#[must_use]
pub fn display_label(catalog: &[TaskEntry], key: &str) -> String {
    find(catalog, key).map_or_else(|| key.replace('_', " ").to_uppercase(), |entry| entry.label.clone())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
