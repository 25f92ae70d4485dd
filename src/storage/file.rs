use super::PersistenceStore;
use crate::error::HistoryError;
use crate::history::Entry;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// History snapshot stored as a pretty-printed JSON array, newest entry first.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PersistenceStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Entry>, HistoryError> {
        read_snapshot(&self.path)
            .map(Option::unwrap_or_default)
            .map_err(|err| HistoryError::read(&self.path, &err))
    }

    fn save(&self, entries: &[Entry]) -> Result<(), HistoryError> {
        write_snapshot(&self.path, entries).map_err(|err| HistoryError::write(&self.path, &err))
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// `None` when no snapshot has been written yet.
fn read_snapshot(path: &Path) -> Result<Option<Vec<Entry>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read file: {}", path.display()));
        }
    };

    let entries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse history snapshot: {}", path.display()))?;

    Ok(Some(entries))
}

fn write_snapshot(path: &Path, entries: &[Entry]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(entries).context("Failed to serialize history")?;

    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
