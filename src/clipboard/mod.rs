pub mod system;
pub mod watcher;

pub use system::SystemClipboard;
pub use watcher::{ClipboardWatcher, PollOutcome};

use crate::error::HistoryError;

/// Read side of the OS clipboard.
pub trait ClipboardSource {
    /// Counter that changes whenever the clipboard contents change.
    fn change_count(&mut self) -> Result<u64, HistoryError>;

    /// Current text, or `None` when the clipboard holds something else.
    fn text(&mut self) -> Result<Option<String>, HistoryError>;
}

/// Write side of the OS clipboard.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), HistoryError>;
}

pub trait Clipboard: ClipboardSource + ClipboardSink {}

impl<T: ClipboardSource + ClipboardSink> Clipboard for T {}
