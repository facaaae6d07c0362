//! Status bar: bottom line with film-list state and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::page::FilmsStatus;
use crate::theme::{C_ACCENT, C_ERROR, C_HIGHLIGHT, C_MUTED, C_SEPARATOR};

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, status: &FilmsStatus, in_field: bool) {
    let (bulb, bulb_color) = match status {
        FilmsStatus::Loading => ("○", C_ACCENT),
        FilmsStatus::Loaded => ("●", C_HIGHLIGHT),
        FilmsStatus::Failed(_) => ("✗", C_ERROR),
    };

    let keys = if in_field {
        " type to edit  Enter search  Esc clear  Tab/Shift-Tab next field  Ctrl-C quit"
    } else {
        " ↑↓/jk scroll  Enter search  Tab/Shift-Tab fields  q quit"
    };

    let line = Line::from(vec![
        Span::styled(
            " SWSEARCH ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(bulb, Style::default().fg(bulb_color).add_modifier(Modifier::BOLD)),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
