use super::{Entry, normalize_candidate};
use crate::error::HistoryError;
use crate::storage::PersistenceStore;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_MAX_ITEMS: usize = 50;

/// Owner of the in-memory history, newest entry first.
///
/// Every mutation is applied to memory first and then written out as a full
/// snapshot. A failed write never rolls the mutation back; the error is kept
/// for the caller and the next mutation writes the then-current state again.
/// Methods take `&mut self`, so callers sharing a store across threads must
/// wrap it in a lock held for the whole call.
pub struct HistoryStore {
    entries: Vec<Entry>,
    max_items: usize,
    persistence: Box<dyn PersistenceStore>,
    version: u64,
    last_error: Option<HistoryError>,
}

impl HistoryStore {
    /// An empty store that does not read `persistence`.
    pub fn new(persistence: Box<dyn PersistenceStore>, max_items: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_items: max_items.max(1),
            persistence,
            version: 0,
            last_error: None,
        }
    }

    /// Hydrate from `persistence`. An unreadable snapshot yields an empty
    /// history with the read error parked in `last_error`. Entries that break
    /// the history rules are dropped and the repaired snapshot is saved.
    pub fn open(persistence: Box<dyn PersistenceStore>, max_items: usize) -> Self {
        Self::open_with(persistence, max_items, true)
    }

    /// Like [`HistoryStore::open`], but a repair only applies in memory and the
    /// snapshot on disk is left untouched until something is mutated.
    pub fn open_read_only(persistence: Box<dyn PersistenceStore>, max_items: usize) -> Self {
        Self::open_with(persistence, max_items, false)
    }

    fn open_with(
        persistence: Box<dyn PersistenceStore>,
        max_items: usize,
        save_repairs: bool,
    ) -> Self {
        let mut store = Self::new(persistence, max_items);

        match store.persistence.load() {
            Ok(entries) => store.hydrate(entries, save_repairs),
            Err(err) => {
                warn!(error = %err, "Starting with empty clipboard history");
                store.last_error = Some(err);
            }
        }

        store
    }

    fn hydrate(&mut self, loaded: Vec<Entry>, save_repairs: bool) {
        let loaded_count = loaded.len();
        let mut seen: HashSet<String> = HashSet::new();

        let entries: Vec<Entry> = loaded
            .into_iter()
            .filter(|entry| !entry.text().trim().is_empty())
            .filter(|entry| seen.insert(entry.text().to_string()))
            .take(self.max_items)
            .collect();

        let dropped = loaded_count - entries.len();
        self.entries = entries;

        if dropped == 0 {
            debug!(count = self.entries.len(), "Loaded clipboard history");
            return;
        }

        info!(
            dropped,
            kept = self.entries.len(),
            max_items = self.max_items,
            save_repairs,
            "Dropped blank, duplicate or excess entries from saved history"
        );
        self.version += 1;
        if save_repairs {
            self.persist();
        }
    }

    /// Record `text` as the newest entry.
    ///
    /// Returns the new entry, or `None` when the trimmed text is blank or an
    /// entry with the same text already exists (the history is left as is).
    pub fn ingest(&mut self, text: &str) -> Option<&Entry> {
        let text = normalize_candidate(text)?;

        if self.entries.iter().any(|entry| entry.text() == text) {
            debug!("Clipboard text already in history");
            return None;
        }

        self.entries.insert(0, Entry::new(text.to_string()));

        if self.entries.len() > self.max_items {
            let evicted = self.entries.len() - self.max_items;
            self.entries.truncate(self.max_items);
            debug!(evicted, "Evicted oldest history entries");
        }

        self.version += 1;
        self.persist();
        self.entries.first()
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id() == id) else {
            debug!(%id, "No history entry to remove");
            return false;
        };

        self.entries.remove(index);
        self.version += 1;
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.version += 1;
        info!(removed, "Cleared clipboard history");
        self.persist();
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries whose text contains `query`, ignoring case, newest first.
    pub fn search(&self, query: &str) -> Vec<&Entry> {
        if query.is_empty() {
            return self.entries.iter().collect();
        }

        let query_lower = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&query_lower))
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Bumped on every applied mutation; compare against a remembered value
    /// to know when a view needs refreshing.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn take_last_error(&mut self) -> Option<HistoryError> {
        self.last_error.take()
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.entries) {
            Ok(()) => debug!(count = self.entries.len(), "Saved clipboard history"),
            Err(err) => {
                warn!(error = %err, "Clipboard history not saved, keeping in-memory state");
                self.last_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStore;
    use crate::storage::testing::MemoryPersistence;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(persistence: &MemoryPersistence, max_items: usize) -> HistoryStore {
        HistoryStore::open(Box::new(persistence.clone()), max_items)
    }

    fn texts(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.text()).collect()
    }

    #[test]
    fn test_ingest_puts_newest_first() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        store.ingest("a");
        store.ingest("b");

        assert_eq!(texts(store.list()), vec!["b", "a"]);
    }

    #[test]
    fn test_ingest_evicts_oldest_over_bound() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 3);

        for text in ["a", "b", "c", "d"] {
            store.ingest(text);
        }

        assert_eq!(texts(store.list()), vec!["d", "c", "b"]);
    }

    #[test]
    fn test_bound_holds_for_long_sequences() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 5);

        for i in 0..40 {
            store.ingest(&format!("item {}", i % 13));
            assert!(store.len() <= 5);
        }
        assert_eq!(store.list()[0].text(), "item 0");
    }

    #[test]
    fn test_ingest_same_text_twice_keeps_one_entry() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        assert!(store.ingest("x").is_some());
        assert!(store.ingest("x").is_none());

        assert_eq!(texts(store.list()), vec!["x"]);
    }

    #[test]
    fn test_duplicate_does_not_reorder_or_save() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        store.ingest("a");
        store.ingest("b");
        let version = store.version();
        let saves = persistence.save_count();

        store.ingest("a");

        assert_eq!(texts(store.list()), vec!["b", "a"]);
        assert_eq!(store.version(), version);
        assert_eq!(persistence.save_count(), saves);
    }

    #[test]
    fn test_ingest_trims_and_dedups_on_trimmed_text() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        store.ingest("  hello\n");
        store.ingest("hello");

        assert_eq!(texts(store.list()), vec!["hello"]);
    }

    #[test]
    fn test_ingest_ignores_blank_text() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        assert!(store.ingest("   \n\t").is_none());
        assert!(store.is_empty());
        assert_eq!(persistence.save_count(), 0);
    }

    #[test]
    fn test_remove_by_id() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        let a = store.ingest("a").unwrap().id();
        store.ingest("b");

        assert!(store.remove(a));
        assert_eq!(texts(store.list()), vec!["b"]);
        assert_eq!(texts(&persistence.snapshot().unwrap()), vec!["b"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        store.ingest("a");
        let version = store.version();

        assert!(!store.remove(Uuid::new_v4()));

        assert_eq!(texts(store.list()), vec!["a"]);
        assert_eq!(store.version(), version);
        assert!(store.take_last_error().is_none());
    }

    #[test]
    fn test_remove_twice_is_idempotent() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        let id = store.ingest("a").unwrap().id();

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_persists_empty_snapshot() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        store.ingest("a");
        store.ingest("b");

        store.clear();

        assert!(store.is_empty());
        assert_eq!(persistence.snapshot(), Some(Vec::new()));
    }

    #[test]
    fn test_search_filters_case_insensitively_in_order() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        store.ingest("blueberry");
        store.ingest("apple");
        store.ingest("Banana");

        let found: Vec<&str> = store.search("b").iter().map(|e| e.text()).collect();

        assert_eq!(found, vec!["Banana", "blueberry"]);
    }

    #[test]
    fn test_search_with_uppercase_query() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        store.ingest("hello world");

        assert_eq!(store.search("WORLD").len(), 1);
        assert!(store.search("mars").is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_everything() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        store.ingest("a");
        store.ingest("b");

        assert_eq!(store.search("").len(), 2);
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);

        let id = store.ingest("a").unwrap().id();
        store.ingest("b");
        store.remove(id);
        store.clear();

        assert_eq!(persistence.save_count(), 4);
    }

    #[test]
    fn test_save_failure_keeps_mutation() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        persistence.set_fail_saves(true);

        assert!(store.ingest("kept").is_some());

        assert_eq!(texts(store.list()), vec!["kept"]);
        assert!(matches!(
            store.take_last_error(),
            Some(HistoryError::PersistenceWrite { .. })
        ));
        assert!(store.take_last_error().is_none());
    }

    #[test]
    fn test_next_save_recaptures_state_after_failure() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 10);
        persistence.set_fail_saves(true);
        store.ingest("a");

        persistence.set_fail_saves(false);
        store.ingest("b");

        assert_eq!(texts(&persistence.snapshot().unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_open_restores_saved_order() {
        let persistence = MemoryPersistence::default();
        {
            let mut store = store_with(&persistence, 10);
            store.ingest("first");
            store.ingest("second");
        }

        let reopened = store_with(&persistence, 10);

        assert_eq!(texts(reopened.list()), vec!["second", "first"]);
        assert_eq!(reopened.version(), 0);
    }

    #[test]
    fn test_open_with_unreadable_snapshot_starts_empty() {
        let persistence = MemoryPersistence::default();
        persistence.set_fail_load(true);

        let mut store = store_with(&persistence, 10);

        assert!(store.is_empty());
        assert!(matches!(
            store.take_last_error(),
            Some(HistoryError::PersistenceRead { .. })
        ));
    }

    #[test]
    fn test_open_repairs_invariants() {
        let persistence = MemoryPersistence::with_entries(vec![
            Entry::new("one".to_string()),
            Entry::new("  ".to_string()),
            Entry::new("two".to_string()),
            Entry::new("one".to_string()),
            Entry::new("three".to_string()),
        ]);

        let store = store_with(&persistence, 2);

        assert_eq!(texts(store.list()), vec!["one", "two"]);
        assert_eq!(store.version(), 1);
        assert_eq!(texts(&persistence.snapshot().unwrap()), vec!["one", "two"]);
    }

    #[test]
    fn test_zero_max_items_is_raised_to_one() {
        let persistence = MemoryPersistence::default();
        let mut store = store_with(&persistence, 0);

        store.ingest("a");
        store.ingest("b");

        assert_eq!(store.max_items(), 1);
        assert_eq!(texts(store.list()), vec!["b"]);
    }

    #[test]
    fn test_open_read_only_repairs_in_memory_only() {
        let saved = vec![
            Entry::new("one".to_string()),
            Entry::new("one".to_string()),
            Entry::new("two".to_string()),
        ];
        let persistence = MemoryPersistence::with_entries(saved.clone());

        let store = HistoryStore::open_read_only(Box::new(persistence.clone()), 10);

        assert_eq!(texts(store.list()), vec!["one", "two"]);
        assert_eq!(persistence.save_count(), 0);
        assert_eq!(persistence.snapshot(), Some(saved));
    }

    #[test]
    fn test_open_read_only_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        let file = JsonFileStore::new(&path);
        let saved: Vec<Entry> = ["c", "b", "a"]
            .into_iter()
            .map(|text| Entry::new(text.to_string()))
            .collect();
        file.save(&saved).unwrap();
        let before = fs::read(&path).unwrap();

        let store = HistoryStore::open_read_only(Box::new(file.clone()), 1);

        assert_eq!(texts(store.list()), vec!["c"]);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(file.load().unwrap().len(), 3);
    }
}
