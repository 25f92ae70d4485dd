use super::mode::Mode;
use crate::ui::theme::Theme;
use clip_tui::controller::HistoryController;
use clip_tui::history::Entry;
use clip_tui::schedule::Ticker;
use std::time::{Duration, Instant};
use uuid::Uuid;

const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub struct AppState {
    pub controller: HistoryController,
    pub cursor_position: usize,
    pub mode: Mode,
    pub query: String,
    pub should_quit: bool,
    pub show_help: bool,
    pub theme: Theme,
    pub ticker: Ticker,
    pub status_message: Option<(String, Instant)>,
    seen_version: u64,
}

impl AppState {
    pub fn new(controller: HistoryController, theme: Theme, poll_interval: Duration) -> Self {
        let mut ticker = Ticker::new(poll_interval);
        ticker.start(Instant::now());

        let mut state = Self {
            seen_version: controller.version(),
            controller,
            cursor_position: 0,
            mode: Mode::Browse,
            query: String::new(),
            should_quit: false,
            show_help: false,
            theme,
            ticker,
            status_message: None,
        };
        state.sync_with_history();
        state
    }

    pub fn visible_entries(&self) -> Vec<&Entry> {
        self.controller.visible_entries(&self.query)
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.visible_entries()
            .get(self.cursor_position)
            .map(|entry| entry.id())
    }

    pub fn is_recording(&self) -> bool {
        self.ticker.is_running()
    }

    /// Poll the clipboard when the ticker is due, then pick up any changes.
    pub fn on_tick(&mut self, now: Instant) {
        if self.ticker.fire(now) {
            self.controller.tick();
        }
        self.sync_with_history();
    }

    /// Refresh view state after the history changed and surface absorbed errors.
    pub fn sync_with_history(&mut self) {
        let version = self.controller.version();
        if version != self.seen_version {
            self.seen_version = version;
            self.clamp_cursor();
        }

        if let Some(err) = self.controller.take_last_error() {
            self.set_status(err.to_string());
        }
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 && self.cursor_position < count - 1 {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_top(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_bottom(&mut self) {
        self.cursor_position = self.visible_entries().len().saturating_sub(1);
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 {
            self.cursor_position = self.cursor_position.min(count - 1);
        } else {
            self.cursor_position = 0;
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.cursor_position = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.cursor_position = 0;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.cursor_position = 0;
    }

    pub fn copy_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        match self.controller.copy(id) {
            Ok(true) => self.set_status("Copied to clipboard"),
            Ok(false) => {}
            Err(err) => self.set_status(err.to_string()),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        if self.controller.delete(id) {
            self.set_status("Entry deleted");
            self.sync_with_history();
        }
    }

    pub fn clear_history(&mut self) {
        self.controller.clear_all();
        self.cursor_position = 0;
        self.set_status("History cleared");
        self.sync_with_history();
    }

    pub fn toggle_recording(&mut self, now: Instant) {
        if self.ticker.is_running() {
            self.ticker.stop();
            self.set_status("Recording paused");
        } else {
            self.controller.resync();
            self.ticker.start(now);
            self.set_status("Recording resumed");
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn clear_expired_status_message(&mut self) {
        if let Some((_, shown_at)) = &self.status_message
            && shown_at.elapsed() >= STATUS_MESSAGE_TTL
        {
            self.status_message = None;
        }
    }
}
