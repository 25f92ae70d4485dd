use crate::app::{AppState, Mode};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = " / ";

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let editing = state.mode == Mode::Search;

    let query_style = if editing {
        Style::default()
            .fg(state.theme.search)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(state.theme.search)
    };

    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(state.theme.timestamp)),
        Span::styled(state.query.as_str(), query_style),
    ]);

    f.render_widget(Paragraph::new(line), area);

    if editing {
        let offset = (PROMPT.width() + state.query.width()) as u16;
        let x = area.x.saturating_add(offset).min(area.right().saturating_sub(1));
        f.set_cursor_position(Position::new(x, area.y));
    }
}
