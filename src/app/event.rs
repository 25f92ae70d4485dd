use super::mode::Mode;
use super::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return;
    }

    match state.mode {
        Mode::Browse => handle_browse_mode(key, state),
        Mode::Search => handle_search_mode(key, state),
        Mode::ConfirmClear => handle_confirm_clear(key, state),
    }
}

fn handle_browse_mode(key: KeyEvent, state: &mut AppState) {
    if state.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            state.show_help = false;
        }
        return;
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => state.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_cursor_down(),
        KeyCode::Home | KeyCode::Char('g') => state.move_cursor_to_top(),
        KeyCode::End | KeyCode::Char('G') => state.move_cursor_to_bottom(),

        // Entry actions
        KeyCode::Enter | KeyCode::Char('y') => state.copy_selected(),
        KeyCode::Char('d') | KeyCode::Delete => state.delete_selected(),
        KeyCode::Char('D') => {
            if !state.controller.is_empty() {
                state.mode = Mode::ConfirmClear;
            }
        }

        KeyCode::Char('/') => state.mode = Mode::Search,
        KeyCode::Esc => state.clear_query(),
        KeyCode::Char('p') => state.toggle_recording(Instant::now()),
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Char('q') => state.should_quit = true,

        _ => {}
    }
}

fn handle_search_mode(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc => {
            state.clear_query();
            state.mode = Mode::Browse;
        }
        KeyCode::Enter => state.mode = Mode::Browse,
        KeyCode::Backspace => state.pop_query_char(),
        KeyCode::Up => state.move_cursor_up(),
        KeyCode::Down => state.move_cursor_down(),
        KeyCode::Char(c) => state.push_query_char(c),
        _ => {}
    }
}

fn handle_confirm_clear(key: KeyEvent, state: &mut AppState) {
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        state.clear_history();
    } else {
        state.set_status("Clear cancelled");
    }
    state.mode = Mode::Browse;
}
