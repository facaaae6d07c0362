//! Action enum: all user-initiated intents and internal events.

use swapi_proto::EntityKind;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Field(EntityKind),
    FilmList,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Form ─────────────────────────────────────────────────────────────────
    /// The text of a field changed (one keystroke).
    Input(EntityKind, String),
    Submit,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    ScrollUp(usize),
    ScrollDown(usize),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
