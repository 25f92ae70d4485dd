pub mod entry;
pub mod store;

pub use entry::Entry;
pub use store::{DEFAULT_MAX_ITEMS, HistoryStore};

/// Trim a clipboard value for ingestion. Whitespace-only text is never recorded.
pub fn normalize_candidate(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
