//! Known backend output quirks and their normalization rules.
//!
//! | Provider | Quirk                                   | Normalization                         |
//! |----------|-----------------------------------------|---------------------------------------|
//! | Claude   | JSON wrapped in a ```` ```json ```` fence | drop the opening line and closing fence |
//!
//! A new backend declares its quirks by adding rows to [`KNOWN_QUIRKS`].
//! Nothing here is a general Markdown cleaner.

use super::config::ProviderKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quirk {
    /// Completion arrives as ```` ```json\n{...}\n``` ````.
    JsonCodeFence,
}

pub const KNOWN_QUIRKS: &[(ProviderKind, Quirk)] = &[(ProviderKind::Claude, Quirk::JsonCodeFence)];

const JSON_FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "```";

impl Quirk {
    #[must_use]
    pub fn apply(self, text: String) -> String {
        match self {
            Self::JsonCodeFence => match strip_json_fence(&text) {
                Some(inner) => inner.to_owned(),
                None => text,
            },
        }
    }
}

/// Quirks declared for `kind`, in table order.
pub fn quirks_for(kind: ProviderKind) -> impl Iterator<Item = Quirk> {
    KNOWN_QUIRKS
        .iter()
        .filter(move |(k, _)| *k == kind)
        .map(|(_, quirk)| *quirk)
}

/// Run every quirk declared for `kind` over a completion.
#[must_use]
pub fn normalize(kind: ProviderKind, text: String) -> String {
    quirks_for(kind).fold(text, |text, quirk| quirk.apply(text))
}

/// Inner text of a ```` ```json ```` fenced block, or `None` when `text`
/// does not open with that exact fence.
#[must_use]
pub fn strip_json_fence(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(JSON_FENCE_OPEN)?;
    let inner = inner.trim_end();
    Some(inner.strip_suffix(FENCE_CLOSE).unwrap_or(inner).trim())
}

#[cfg(test)]
#[path = "quirks_test.rs"]
mod tests;
