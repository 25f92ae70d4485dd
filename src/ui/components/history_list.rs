use crate::app::AppState;
use chrono::Local;
use clip_tui::history::Entry;
use clip_tui::utils::text::preview_line;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M";

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let entries = state.visible_entries();
    let title = format!(" Clipboard History ({}) ", entries.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if entries.is_empty() {
        let message = if state.query.is_empty() {
            "Nothing copied yet. Copy some text and it will show up here."
        } else {
            "No entries match the search."
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(state.theme.timestamp));
        f.render_widget(paragraph, area);
        return;
    }

    // Borders plus the timestamp column and its gap.
    let text_width = (area.width as usize).saturating_sub(2 + TIMESTAMP_FORMAT.len() + 2);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, text_width, state)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(state.theme.foreground))
        .highlight_style(
            Style::default()
                .fg(state.theme.cursor)
                .add_modifier(Modifier::REVERSED),
        );

    let mut list_state = ListState::default().with_selected(Some(state.cursor_position));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn entry_line(entry: &Entry, text_width: usize, state: &AppState) -> Line<'static> {
    let timestamp = entry
        .created_at()
        .with_timezone(&Local)
        .format(TIMESTAMP_FORMAT)
        .to_string();

    Line::from(vec![
        Span::styled(timestamp, Style::default().fg(state.theme.timestamp)),
        Span::raw("  "),
        Span::raw(preview_line(entry.text(), text_width)),
    ])
}
