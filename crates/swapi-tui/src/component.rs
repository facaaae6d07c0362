//! Component trait: the interface every UI panel implements.
//!
//! - Components own their view state and render themselves.
//! - They read the `PageShell` (and the form) but never mutate them.
//! - They produce `Vec<Action>`; the App dispatches those.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::form::SearchForm;
use crate::page::PageShell;

/// Read-only view handed to components.
pub struct ViewState<'a> {
    pub page: &'a PageShell,
    pub form: &'a SearchForm,
}

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event while focused. Returns actions to be dispatched.
    fn handle_key(&mut self, key: KeyEvent, view: &ViewState<'_>) -> Vec<Action>;

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, view: &ViewState<'_>);
}
