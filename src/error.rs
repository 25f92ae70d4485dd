use std::path::PathBuf;

/// Failures the history core absorbs and reports instead of propagating.
///
/// None of these are fatal: the store keeps its in-memory state and the
/// watcher keeps polling. Callers that care (the TUI status bar, the daemon
/// log) read them from `HistoryStore::take_last_error`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to read history from {}: {reason}", path.display())]
    PersistenceRead { path: PathBuf, reason: String },

    #[error("Failed to write history to {}: {reason}", path.display())]
    PersistenceWrite { path: PathBuf, reason: String },

    #[error("Clipboard unavailable: {0}")]
    ClipboardAccess(String),
}

impl HistoryError {
    pub fn read(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Self::PersistenceRead {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn write(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Self::PersistenceWrite {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }

    pub fn clipboard(err: impl std::fmt::Display) -> Self {
        Self::ClipboardAccess(err.to_string())
    }
}
