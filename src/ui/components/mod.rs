pub mod history_list;
pub mod search_bar;
pub mod status_bar;

use crate::app::{AppState, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(f: &mut Frame, state: &AppState) {
    let show_search = state.mode == Mode::Search || !state.query.is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if show_search { 1 } else { 0 }), // Search bar
            Constraint::Min(1),                                  // History list
            Constraint::Length(1),                               // Status bar
        ])
        .split(f.area());

    if show_search {
        search_bar::render(f, state, chunks[0]);
    }

    history_list::render(f, state, chunks[1]);
    status_bar::render(f, state, chunks[2]);

    if state.mode == Mode::ConfirmClear {
        render_confirm_overlay(f, state);
    } else if state.show_help {
        render_help_overlay(f, state);
    }
}

fn render_help_overlay(f: &mut Frame, state: &AppState) {
    let help_text = r#"
    Clipboard History Help

    Browse:
      ↑/↓ or j/k        Move cursor
      g/G or Home/End   Jump to newest/oldest
      Enter or y        Copy entry to clipboard
      d                 Delete entry
      D                 Clear all history
      /                 Search
      Esc               Clear search
      p                 Pause/resume recording
      ?                 Toggle help
      q                 Quit

    Search:
      Type to filter (case-insensitive)
      Enter             Keep filter and browse
      Esc               Clear filter
    "#;

    let area = centered_rect(60, 70, f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(state.theme.background));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(state.theme.foreground))
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn render_confirm_overlay(f: &mut Frame, state: &AppState) {
    let area = centered_rect(50, 20, f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Clear history ")
        .style(Style::default().bg(state.theme.background));

    let lines = vec![
        Line::from(""),
        Line::from(format!("Delete all {} entries?", state.controller.len())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" confirm   any other key cancels"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(state.theme.foreground))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
