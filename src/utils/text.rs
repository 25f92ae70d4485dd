use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Collapse every whitespace run, newlines included, into one space.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with an ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();

    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }

    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}

/// One-line preview of a clipboard entry for list rows.
pub fn preview_line(text: &str, max_width: usize) -> String {
    truncate_to_width(&single_line(text), max_width)
}
