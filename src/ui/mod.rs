pub mod components;
pub mod theme;

use crate::app::{AppState, event::handle_key_event};
use anyhow::Result;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const MAX_INPUT_WAIT: Duration = Duration::from_millis(100);

struct TerminalGuard {
    keyboard_enhancement: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.keyboard_enhancement {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = stdout.flush();
    }
}

pub fn run_tui(mut state: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let supports_keyboard_enhancement = execute!(
        stdout,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok();

    let _guard = TerminalGuard {
        keyboard_enhancement: supports_keyboard_enhancement,
    };

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut state);
    terminal.show_cursor()?;
    state.ticker.stop();

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    loop {
        state.clear_expired_status_message();
        state.on_tick(Instant::now());

        terminal.draw(|f| {
            components::render(f, state);
        })?;

        // Wake up in time for the next clipboard poll even without input.
        let wait = state
            .ticker
            .time_until_due(Instant::now())
            .map_or(MAX_INPUT_WAIT, |due| due.min(MAX_INPUT_WAIT));

        if event::poll(wait)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(key, state);
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
