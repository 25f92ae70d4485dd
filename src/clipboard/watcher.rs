use super::ClipboardSource;
use crate::history::{HistoryStore, normalize_candidate};
use tracing::debug;

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Change counter unchanged since the last poll.
    Unchanged,
    /// A change was seen but held no usable text.
    Ignored,
    /// New text that is already in the history.
    Duplicate,
    /// New text recorded as the newest entry.
    Captured,
    /// The clipboard could not be read; treated as no change.
    Unavailable,
}

/// Detects clipboard changes by comparing the OS change counter between polls.
#[derive(Debug, Default)]
pub struct ClipboardWatcher {
    last_seen: Option<u64>,
}

impl ClipboardWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// Treat `count` as already handled, e.g. after writing to the clipboard ourselves.
    pub fn mark_seen(&mut self, count: u64) {
        self.last_seen = Some(count);
    }

    /// Check the clipboard once and hand new text to `store`.
    ///
    /// The counter is recorded before the contents are inspected, so a
    /// change that carries no text is examined once and then skipped.
    pub fn poll<S>(&mut self, source: &mut S, store: &mut HistoryStore) -> PollOutcome
    where
        S: ClipboardSource + ?Sized,
    {
        let count = match source.change_count() {
            Ok(count) => count,
            Err(err) => {
                debug!(error = %err, "Clipboard change counter unavailable");
                return PollOutcome::Unavailable;
            }
        };

        if self.last_seen == Some(count) {
            return PollOutcome::Unchanged;
        }
        self.last_seen = Some(count);

        let text = match source.text() {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(count, "Clipboard changed to non-text content");
                return PollOutcome::Ignored;
            }
            Err(err) => {
                debug!(error = %err, "Clipboard text unavailable");
                return PollOutcome::Unavailable;
            }
        };

        let Some(candidate) = normalize_candidate(&text) else {
            return PollOutcome::Ignored;
        };

        match store.ingest(candidate) {
            Some(entry) => {
                debug!(
                    id = %entry.id(),
                    chars = entry.text().chars().count(),
                    "Captured clipboard text"
                );
                PollOutcome::Captured
            }
            None => PollOutcome::Duplicate,
        }
    }
}
