//! SearchForm: coordinates the three search fields.
//!
//! At most one field is active (required) at a time. Interacting with another
//! field makes it the active one and clears the previous one. Every operation
//! returns `Vec<FormEvent>`; the App dispatches those to the page shell and
//! the search runner.
//!
//! ```text
//!  NoActiveField ──input(t)──▶ ActiveField(t, valid)
//!  ActiveField(t', _) ──input(t), t≠t'──▶ ActiveField(t, valid)   (t' cleared)
//!  ActiveField(t, _) ──input(t)──▶ ActiveField(t, valid')
//! ```

use std::sync::Arc;

use swapi_proto::{Entity, EntityKind, Film, SwapiError};
use tracing::{debug, warn};

use crate::validator::{FieldError, SearchInput};

pub const SEARCH_FAILED: &str = "Search failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    NoActiveField,
    ActiveField { kind: EntityKind, valid: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub kind: EntityKind,
    /// Already trimmed, never empty.
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Replace the page's highlighted film urls.
    HighlightFilms(Vec<String>),
    /// Start this search, abandoning any pending one.
    Search(SearchRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An entity matched; these films reference it (possibly none).
    Films(Vec<String>),
    /// No entity in the result set matched the term.
    NotFound(String),
}

/// Pick the first entity whose name equals `term` (case-insensitive) and
/// collect the urls of every film that references it.
pub fn resolve_outcome(
    kind: EntityKind,
    term: &str,
    entities: &[Entity],
    films: &[Film],
) -> SearchOutcome {
    let needle = term.to_lowercase();
    let Some(matched) = entities.iter().find(|e| e.name.to_lowercase() == needle) else {
        return SearchOutcome::NotFound(format!(
            "No films found containing this {} \"{}\"",
            kind, term
        ));
    };

    let urls = films
        .iter()
        .filter(|film| kind.film_refs(film).iter().any(|u| *u == matched.url))
        .map(|film| film.url.clone())
        .collect();
    SearchOutcome::Films(urls)
}

pub struct SearchForm {
    /// Indexed in `EntityKind::ALL` order.
    fields: [SearchInput; 3],
    state: FormState,
    message: Option<String>,
    films: Arc<[Film]>,
}

impl SearchForm {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            state: FormState::NoActiveField,
            message: None,
            films: Arc::from(Vec::new()),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn field(&self, kind: EntityKind) -> &SearchInput {
        &self.fields[slot(kind)]
    }

    fn field_mut(&mut self, kind: EntityKind) -> &mut SearchInput {
        &mut self.fields[slot(kind)]
    }

    pub fn active_kind(&self) -> Option<EntityKind> {
        match self.state {
            FormState::NoActiveField => None,
            FormState::ActiveField { kind, .. } => Some(kind),
        }
    }

    pub fn search_enabled(&self) -> bool {
        matches!(self.state, FormState::ActiveField { valid: true, .. })
    }

    /// Error to render under `kind`. Before any field is active, a touched
    /// field reports `Required` so a blind submit shows what is missing.
    pub fn visible_error(&self, kind: EntityKind) -> Option<FieldError> {
        let field = self.field(kind);
        if self.state == FormState::NoActiveField && field.is_touched() {
            return Some(FieldError::Required);
        }
        field.visible_error()
    }

    /// The film list may arrive after the form is built; until then searches
    /// simply match nothing.
    pub fn set_films(&mut self, films: Arc<[Film]>) {
        self.films = films;
    }

    /// Blur: mark one field touched.
    pub fn touch(&mut self, kind: EntityKind) {
        self.field_mut(kind).touch();
    }

    /// A keystroke in `kind`'s field.
    pub fn on_input(&mut self, kind: EntityKind, value: impl Into<String>) -> Vec<FormEvent> {
        self.message = None;
        self.field_mut(kind).on_edit(value);

        if self.active_kind() != Some(kind) {
            self.activate(kind);
        }

        let valid = self.field(kind).is_valid();
        self.state = FormState::ActiveField { kind, valid };

        vec![FormEvent::HighlightFilms(Vec::new())]
    }

    fn activate(&mut self, kind: EntityKind) {
        debug!("[form] active field -> {}", kind);
        for other in EntityKind::ALL {
            let field = self.field_mut(other);
            field.set_required(other == kind);
            if other != kind {
                field.reset();
            }
        }
    }

    /// Search button / Enter.
    pub fn submit(&mut self) -> Vec<FormEvent> {
        self.message = None;
        for field in self.fields.iter_mut() {
            field.touch();
        }

        let FormState::ActiveField { kind, valid: true } = self.state else {
            debug!("[form] submit ignored in state {:?}", self.state);
            return Vec::new();
        };

        let term = self.field(kind).value().trim();
        if term.is_empty() {
            return Vec::new();
        }

        vec![FormEvent::Search(SearchRequest {
            kind,
            term: term.to_string(),
        })]
    }

    /// Apply the result of `request`. Only called for the live search.
    pub fn finish_search(
        &mut self,
        request: &SearchRequest,
        result: Result<Vec<Entity>, SwapiError>,
    ) -> Vec<FormEvent> {
        let entities = match result {
            Ok(entities) => entities,
            Err(e) => {
                warn!("[form] search {} {:?} failed: {}", request.kind, request.term, e);
                self.message = Some(SEARCH_FAILED.to_string());
                return Vec::new();
            }
        };

        match resolve_outcome(request.kind, &request.term, &entities, &self.films) {
            SearchOutcome::NotFound(message) => {
                self.message = Some(message);
                vec![FormEvent::HighlightFilms(Vec::new())]
            }
            SearchOutcome::Films(urls) => {
                self.message = if urls.is_empty() {
                    Some(format!("{} \"{}\" not found", request.kind, request.term))
                } else {
                    None
                };
                vec![FormEvent::HighlightFilms(urls)]
            }
        }
    }
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Starship => 0,
        EntityKind::Person => 1,
        EntityKind::Vehicle => 2,
    }
}
