use crate::app::AppState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn render(f: &mut Frame, state: &AppState, area: Rect) {
    let base_style = Style::default()
        .fg(state.theme.status_bar_fg)
        .bg(state.theme.status_bar_bg);

    let (recording_text, recording_style) = if state.is_recording() {
        (" ● REC ", base_style)
    } else {
        (
            " ‖ PAUSED ",
            base_style
                .fg(state.theme.paused)
                .add_modifier(Modifier::BOLD),
        )
    };

    let left_content = format!(
        " {} | {}/{} entries |",
        state.mode,
        state.controller.len(),
        state.controller.max_items()
    );

    let message = state
        .status_message
        .as_ref()
        .map(|(text, _)| format!(" {text}"))
        .unwrap_or_default();

    let hint = "? help  q quit";
    let version_text = format!("v{VERSION}");

    let used = left_content.width()
        + recording_text.width()
        + message.width()
        + hint.width()
        + version_text.width()
        + 2;
    let padding = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(left_content, base_style),
        Span::styled(recording_text, recording_style),
        Span::styled(message, base_style.add_modifier(Modifier::ITALIC)),
        Span::styled(format!("{:>padding$} {hint} {version_text}", ""), base_style),
    ]);

    f.render_widget(Paragraph::new(line).style(base_style), area);
}
