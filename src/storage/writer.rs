use super::PersistenceStore;
use crate::error::HistoryError;
use crate::history::Entry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Moves snapshot writes off the caller's thread.
///
/// A single worker drains a FIFO channel, so snapshots reach the inner store
/// in the order they were produced. When several are queued only the newest
/// is written. A failed write is handed back by the next `save` call.
/// Dropping the writer waits for the queue to drain.
pub struct BackgroundWriter<P> {
    inner: P,
    location: PathBuf,
    sender: Option<Sender<Vec<Entry>>>,
    failures: Receiver<HistoryError>,
    worker: Option<JoinHandle<()>>,
}

impl<P> BackgroundWriter<P>
where
    P: PersistenceStore + Clone + 'static,
{
    pub fn spawn(inner: P) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Vec<Entry>>();
        let (failure_sender, failures) = mpsc::channel::<HistoryError>();
        let worker_store = inner.clone();

        let worker = thread::Builder::new()
            .name("clip-tui-writer".to_string())
            .spawn(move || {
                while let Ok(mut snapshot) = receiver.recv() {
                    while let Ok(newer) = receiver.try_recv() {
                        snapshot = newer;
                    }

                    if let Err(err) = worker_store.save(&snapshot) {
                        error!(error = %err, "Background history save failed");
                        let _ = failure_sender.send(err);
                    }
                }
                debug!("History writer stopped");
            })
            .context("Failed to start history writer thread")?;

        Ok(Self {
            location: inner.location().to_path_buf(),
            inner,
            sender: Some(sender),
            failures,
            worker: Some(worker),
        })
    }
}

impl<P> PersistenceStore for BackgroundWriter<P>
where
    P: PersistenceStore,
{
    fn load(&self) -> Result<Vec<Entry>, HistoryError> {
        self.inner.load()
    }

    fn save(&self, entries: &[Entry]) -> Result<(), HistoryError> {
        let stopped = || HistoryError::PersistenceWrite {
            path: self.location.clone(),
            reason: "history writer has stopped".to_string(),
        };

        self.sender
            .as_ref()
            .ok_or_else(stopped)?
            .send(entries.to_vec())
            .map_err(|_| stopped())?;

        // The snapshot just queued supersedes the failed one, but the caller
        // still hears that an earlier write did not land.
        match self.failures.try_iter().last() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn location(&self) -> &Path {
        &self.location
    }
}

impl<P> Drop for BackgroundWriter<P> {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("History writer thread panicked");
        }
    }
}
