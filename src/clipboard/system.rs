use super::{ClipboardSink, ClipboardSource};
use crate::error::HistoryError;

/// The system clipboard through `arboard`.
///
/// arboard exposes no change counter, so one is derived here: every
/// `change_count` reads the current text and bumps the counter when it
/// differs from the last observed value. `text` returns the value observed by
/// the latest `change_count`, so the two always describe the same change.
///
/// On Linux, text set through this type stays available while the process
/// keeps the clipboard handle alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
    observed: Option<String>,
    counter: u64,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, HistoryError> {
        if self.handle.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(HistoryError::clipboard)?;
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .ok_or_else(|| HistoryError::clipboard("clipboard handle missing"))
    }

    fn read_current(&mut self) -> Result<Option<String>, HistoryError> {
        let result = self.handle()?.get_text();
        match result {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => {
                // Reconnect on the next call; the display server may have restarted.
                self.handle = None;
                Err(HistoryError::clipboard(err))
            }
        }
    }

    fn observe(&mut self, current: Option<String>) {
        if current != self.observed {
            self.observed = current;
            self.counter += 1;
        }
    }
}

impl ClipboardSource for SystemClipboard {
    fn change_count(&mut self) -> Result<u64, HistoryError> {
        let current = self.read_current()?;
        self.observe(current);
        Ok(self.counter)
    }

    fn text(&mut self) -> Result<Option<String>, HistoryError> {
        Ok(self.observed.clone())
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), HistoryError> {
        let result = self.handle()?.set_text(text);
        if let Err(err) = result {
            self.handle = None;
            return Err(HistoryError::clipboard(err));
        }
        self.observe(Some(text.to_string()));
        Ok(())
    }
}
