pub mod file;
pub mod writer;

pub use file::JsonFileStore;
pub use writer::BackgroundWriter;

use crate::error::HistoryError;
use crate::history::Entry;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Durable home for the history snapshot.
///
/// `save` always receives the complete ordered history and replaces whatever
/// was stored before. `load` on a store that was never written returns an
/// empty list.
pub trait PersistenceStore: Send {
    fn load(&self) -> Result<Vec<Entry>, HistoryError>;
    fn save(&self, entries: &[Entry]) -> Result<(), HistoryError>;
    fn location(&self) -> &Path;
}

/// The snapshot file at `path`, written inline or by a background writer.
pub fn open_persistence(path: PathBuf, background: bool) -> Box<dyn PersistenceStore> {
    let store = JsonFileStore::new(path);

    if background {
        match BackgroundWriter::spawn(store.clone()) {
            Ok(writer) => return Box::new(writer),
            Err(err) => warn!(error = %err, "Falling back to inline history saves"),
        }
    }

    Box::new(store)
}
