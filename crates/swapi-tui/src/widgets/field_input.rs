//! FieldInput: wraps tui-input as a single-line text field.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED};

pub enum FieldAction {
    Changed(String),
    Confirmed,
    None,
}

pub struct FieldInput {
    input: Input,
    placeholder: String,
}

impl FieldInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    /// Overwrite the text when the owner changed it (e.g. field was reset).
    pub fn sync(&mut self, value: &str) {
        if self.input.value() != value {
            self.input = Input::new(value.to_string());
        }
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc clears the text (an edit like any other). Cursor movement that
    /// leaves the text unchanged reports `None`.
    pub fn handle_key(&mut self, key: KeyEvent) -> FieldAction {
        match key.code {
            KeyCode::Enter => FieldAction::Confirmed,
            KeyCode::Esc => {
                if self.input.value().is_empty() {
                    FieldAction::None
                } else {
                    self.input = Input::default();
                    FieldAction::Changed(String::new())
                }
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != before {
                    FieldAction::Changed(self.input.value().to_string())
                } else {
                    FieldAction::None
                }
            }
        }
    }

    /// Render the text (or placeholder) into a one-row `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let scroll = self.input.visual_scroll(area.width.saturating_sub(2) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(format!(" {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!(" {}", visible), Style::default().fg(C_INPUT_FG))
        };

        let paragraph = Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_INPUT_BG));
        frame.render_widget(paragraph, area);

        if focused && area.width > 0 {
            let cursor_x = area.x + 1 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut field = FieldInput::new("starship");
        assert!(matches!(field.handle_key(key(KeyCode::Char('X'))), FieldAction::Changed(v) if v == "X"));
        assert!(matches!(field.handle_key(key(KeyCode::Left)), FieldAction::None));
        assert!(matches!(field.handle_key(key(KeyCode::Enter)), FieldAction::Confirmed));
    }

    #[test]
    fn test_esc_clears_then_noop() {
        let mut field = FieldInput::new("vehicle");
        field.sync("AT-AT");
        assert!(matches!(field.handle_key(key(KeyCode::Esc)), FieldAction::Changed(v) if v.is_empty()));
        assert!(matches!(field.handle_key(key(KeyCode::Esc)), FieldAction::None));
    }
}
