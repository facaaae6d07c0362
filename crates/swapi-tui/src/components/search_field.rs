//! SearchField: one of the three entity inputs, plus the search bar line.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use swapi_proto::EntityKind;

use crate::action::{Action, ComponentId};
use crate::component::{Component, ViewState};
use crate::form::SearchForm;
use crate::theme::{
    style_error, style_secondary, C_ACCENT, C_ACTIVE_FIELD, C_BUTTON_DISABLED, C_BUTTON_ENABLED,
};
use crate::widgets::field_input::{FieldAction, FieldInput};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub struct SearchField {
    kind: EntityKind,
    input: FieldInput,
}

impl SearchField {
    pub fn new(kind: EntityKind) -> Self {
        let placeholder = match kind {
            EntityKind::Starship => "e.g. Millennium Falcon",
            EntityKind::Person => "e.g. Luke Skywalker",
            EntityKind::Vehicle => "e.g. Snowspeeder",
        };
        Self {
            kind,
            input: FieldInput::new(placeholder),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Pull the value back from the form (it may have been reset).
    pub fn sync(&mut self, form: &SearchForm) {
        self.input.sync(form.field(self.kind).value());
    }

    /// Rows needed: top border, input, bottom border (error line).
    pub fn height(&self) -> u16 {
        3
    }
}

impl Component for SearchField {
    fn id(&self) -> ComponentId {
        ComponentId::Field(self.kind)
    }

    fn handle_key(&mut self, key: KeyEvent, _view: &ViewState<'_>) -> Vec<Action> {
        match self.input.handle_key(key) {
            FieldAction::Changed(value) => vec![Action::Input(self.kind, value)],
            FieldAction::Confirmed => vec![Action::Submit],
            FieldAction::None => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, view: &ViewState<'_>) {
        let badge = (view.form.active_kind() == Some(self.kind)).then_some(Badge {
            text: "ACTIVE",
            color: C_ACTIVE_FIELD,
        });
        let mut block = pane_chrome(self.kind.label(), focused, badge);
        if let Some(err) = view.form.visible_error(self.kind) {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {} ", err.message()),
                style_error(),
            )));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height > 0 {
            self.input.draw(frame, Rect { height: 1, ..inner }, focused);
        }
    }
}

/// One row: the search "button" and the outcome message.
pub fn draw_search_bar(frame: &mut Frame, area: Rect, form: &SearchForm, pending: bool) {
    let button_style = if form.search_enabled() {
        Style::default()
            .fg(C_BUTTON_ENABLED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_BUTTON_DISABLED)
    };

    let mut spans = vec![Span::styled(" [ Search ⏎ ] ", button_style)];
    if pending {
        spans.push(Span::styled(" searching…", style_secondary()));
    } else if let Some(message) = form.message() {
        spans.push(Span::styled(format!(" {}", message), Style::default().fg(C_ACCENT)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
