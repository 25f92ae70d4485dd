use crate::clipboard::{Clipboard, ClipboardSink, ClipboardSource, ClipboardWatcher, PollOutcome};
use crate::config::Config;
use crate::error::HistoryError;
use crate::history::{Entry, HistoryStore};
use crate::storage::open_persistence;
use anyhow::Result;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything a front end needs: browsing, copy-back, deletion and the
/// clipboard poll, over one store and one clipboard.
pub struct HistoryController {
    store: HistoryStore,
    watcher: ClipboardWatcher,
    clipboard: Box<dyn Clipboard>,
}

impl HistoryController {
    pub fn new(store: HistoryStore, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            store,
            watcher: ClipboardWatcher::new(),
            clipboard,
        }
    }

    /// Open the history described by `config`.
    pub fn open(config: &Config, clipboard: Box<dyn Clipboard>) -> Result<Self> {
        let persistence = open_persistence(config.history_path()?, config.background_save);
        let store = HistoryStore::open(persistence, config.max_items);
        Ok(Self::new(store, clipboard))
    }

    /// Open the history for browsing only. Loading never rewrites the snapshot.
    pub fn open_read_only(config: &Config, clipboard: Box<dyn Clipboard>) -> Result<Self> {
        let persistence = open_persistence(config.history_path()?, false);
        let store = HistoryStore::open_read_only(persistence, config.max_items);
        Ok(Self::new(store, clipboard))
    }

    /// Poll the clipboard once.
    pub fn tick(&mut self) -> PollOutcome {
        self.watcher.poll(self.clipboard.as_mut(), &mut self.store)
    }

    pub fn visible_entries(&self, query: &str) -> Vec<&Entry> {
        self.store.search(query)
    }

    /// Put an entry's text back on the clipboard without moving it in the history.
    ///
    /// Returns `Ok(false)` for unknown ids. The resulting clipboard change is
    /// marked as seen so the next poll does not treat it as a new copy.
    pub fn copy(&mut self, id: Uuid) -> Result<bool, HistoryError> {
        let Some(entry) = self.store.get(id) else {
            debug!(%id, "No history entry to copy");
            return Ok(false);
        };

        self.clipboard.set_text(entry.text())?;

        match self.clipboard.change_count() {
            Ok(count) => self.watcher.mark_seen(count),
            Err(err) => debug!(error = %err, "Could not read change counter after copy"),
        }

        info!(%id, "Copied history entry to clipboard");
        Ok(true)
    }

    /// Treat whatever is on the clipboard right now as already seen.
    ///
    /// Called when recording resumes so that copies made while paused are
    /// never captured.
    pub fn resync(&mut self) {
        match self.clipboard.change_count() {
            Ok(count) => {
                self.watcher.mark_seen(count);
                debug!(count, "Clipboard watcher resynced");
            }
            Err(err) => debug!(error = %err, "Could not read change counter to resync"),
        }
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        self.store.remove(id)
    }

    pub fn clear_all(&mut self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.store.max_items()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn take_last_error(&mut self) -> Option<HistoryError> {
        self.store.take_last_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::MemoryClipboard;
    use crate::storage::JsonFileStore;
    use crate::storage::testing::MemoryPersistence;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(max_items: usize) -> (HistoryController, MemoryClipboard, MemoryPersistence) {
        let clipboard = MemoryClipboard::default();
        let persistence = MemoryPersistence::default();
        let store = HistoryStore::open(Box::new(persistence.clone()), max_items);
        let controller = HistoryController::new(store, Box::new(clipboard.clone()));
        (controller, clipboard, persistence)
    }

    fn visible(controller: &HistoryController, query: &str) -> Vec<String> {
        controller
            .visible_entries(query)
            .iter()
            .map(|entry| entry.text().to_string())
            .collect()
    }

    fn copy_and_tick(controller: &mut HistoryController, clipboard: &MemoryClipboard, text: &str) {
        clipboard.copy_external(text);
        controller.tick();
    }

    #[test]
    fn test_scenario_bounded_eviction() {
        let (mut controller, clipboard, _) = setup(3);

        for text in ["a", "b", "c", "d"] {
            copy_and_tick(&mut controller, &clipboard, text);
        }

        assert_eq!(visible(&controller, ""), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_scenario_repeat_copy_single_entry() {
        let (mut controller, clipboard, _) = setup(10);

        copy_and_tick(&mut controller, &clipboard, "x");
        copy_and_tick(&mut controller, &clipboard, "x");

        assert_eq!(visible(&controller, ""), vec!["x"]);
    }

    #[test]
    fn test_scenario_delete() {
        let (mut controller, clipboard, persistence) = setup(10);
        copy_and_tick(&mut controller, &clipboard, "a");
        copy_and_tick(&mut controller, &clipboard, "b");
        let a = controller.visible_entries("a")[0].id();

        assert!(controller.delete(a));

        assert_eq!(visible(&controller, ""), vec!["b"]);
        assert_eq!(persistence.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_scenario_search() {
        let (mut controller, clipboard, _) = setup(10);
        for text in ["blueberry", "apple", "banana"] {
            copy_and_tick(&mut controller, &clipboard, text);
        }

        assert_eq!(visible(&controller, ""), vec!["banana", "apple", "blueberry"]);
        assert_eq!(visible(&controller, "B"), vec!["banana", "blueberry"]);
    }

    #[test]
    fn test_scenario_clear_all_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let clipboard = MemoryClipboard::default();
        let store = HistoryStore::open(Box::new(JsonFileStore::new(&path)), 10);
        let mut controller = HistoryController::new(store, Box::new(clipboard.clone()));
        copy_and_tick(&mut controller, &clipboard, "one");
        copy_and_tick(&mut controller, &clipboard, "two");

        controller.clear_all();

        assert!(controller.is_empty());
        let saved: Vec<Entry> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_scenario_corrupt_file_at_startup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        fs::write(&path, "[{\"id\": 42").unwrap();
        let config = Config {
            history_file: Some(path),
            ..Config::default()
        };

        let mut controller =
            HistoryController::open(&config, Box::new(MemoryClipboard::default())).unwrap();

        assert!(controller.is_empty());
        assert!(matches!(
            controller.take_last_error(),
            Some(HistoryError::PersistenceRead { .. })
        ));
    }

    #[test]
    fn test_open_restores_history_across_restarts() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            history_file: Some(temp_dir.path().join("history.json")),
            ..Config::default()
        };
        let clipboard = MemoryClipboard::default();

        {
            let mut controller =
                HistoryController::open(&config, Box::new(clipboard.clone())).unwrap();
            copy_and_tick(&mut controller, &clipboard, "kept");
        }

        let controller = HistoryController::open(&config, Box::new(clipboard)).unwrap();
        assert_eq!(visible(&controller, ""), vec!["kept"]);
    }

    #[test]
    fn test_copy_writes_text_without_reordering() {
        let (mut controller, clipboard, persistence) = setup(10);
        copy_and_tick(&mut controller, &clipboard, "old");
        copy_and_tick(&mut controller, &clipboard, "new");
        let old = controller.visible_entries("old")[0].id();
        let saves = persistence.save_count();
        let version = controller.version();

        assert!(controller.copy(old).unwrap());

        assert_eq!(clipboard.writes(), vec!["old".to_string()]);
        assert_eq!(controller.tick(), PollOutcome::Unchanged);
        assert_eq!(visible(&controller, ""), vec!["new", "old"]);
        assert_eq!(persistence.save_count(), saves);
        assert_eq!(controller.version(), version);
    }

    #[test]
    fn test_copy_unknown_id_is_noop() {
        let (mut controller, clipboard, _) = setup(10);

        assert!(!controller.copy(Uuid::new_v4()).unwrap());
        assert!(clipboard.writes().is_empty());
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let (mut controller, clipboard, _) = setup(10);
        copy_and_tick(&mut controller, &clipboard, "a");
        let id = controller.visible_entries("")[0].id();
        clipboard.set_unavailable(true);

        let err = controller.copy(id).unwrap_err();

        assert!(matches!(err, HistoryError::ClipboardAccess(_)));
        assert_eq!(controller.len(), 1);
    }

    #[test]
    fn test_external_copy_after_copy_back_is_captured() {
        let (mut controller, clipboard, _) = setup(10);
        copy_and_tick(&mut controller, &clipboard, "a");
        let id = controller.visible_entries("")[0].id();
        controller.copy(id).unwrap();

        copy_and_tick(&mut controller, &clipboard, "b");

        assert_eq!(visible(&controller, ""), vec!["b", "a"]);
    }

    #[test]
    fn test_version_tracks_mutations() {
        let (mut controller, clipboard, _) = setup(10);
        let start = controller.version();

        copy_and_tick(&mut controller, &clipboard, "a");
        assert_eq!(controller.version(), start + 1);

        controller.tick();
        assert_eq!(controller.version(), start + 1);

        controller.clear_all();
        assert_eq!(controller.version(), start + 2);
    }

    #[test]
    fn test_resync_skips_changes_made_before_it() {
        let (mut controller, clipboard, _) = setup(10);
        copy_and_tick(&mut controller, &clipboard, "recorded");
        clipboard.copy_external("private");

        controller.resync();

        assert_eq!(controller.tick(), PollOutcome::Unchanged);
        assert_eq!(visible(&controller, ""), vec!["recorded"]);

        copy_and_tick(&mut controller, &clipboard, "later");
        assert_eq!(visible(&controller, ""), vec!["later", "recorded"]);
    }

    #[test]
    fn test_resync_with_unavailable_clipboard_is_harmless() {
        let (mut controller, clipboard, _) = setup(10);
        clipboard.set_unavailable(true);

        controller.resync();

        clipboard.set_unavailable(false);
        copy_and_tick(&mut controller, &clipboard, "a");
        assert_eq!(visible(&controller, ""), vec!["a"]);
    }

    #[test]
    fn test_open_read_only_does_not_rewrite_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let saved = vec![
            Entry::new("c".to_string()),
            Entry::new("b".to_string()),
            Entry::new("a".to_string()),
        ];
        fs::write(&path, serde_json::to_string_pretty(&saved).unwrap()).unwrap();
        let before = fs::read(&path).unwrap();
        let config = Config {
            history_file: Some(path.clone()),
            max_items: 1,
            ..Config::default()
        };

        let controller =
            HistoryController::open_read_only(&config, Box::new(MemoryClipboard::default()))
                .unwrap();

        assert_eq!(visible(&controller, ""), vec!["c"]);
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
