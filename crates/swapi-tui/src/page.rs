//! PageShell: the film list fetched once per session plus the current
//! highlight set. Components read it; only the App writes it.

use std::sync::Arc;

use swapi_proto::Film;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmsStatus {
    Loading,
    Loaded,
    Failed(String),
}

pub struct PageShell {
    films: Arc<[Film]>,
    highlighted: Vec<String>,
    films_status: FilmsStatus,
}

impl PageShell {
    pub fn new() -> Self {
        Self {
            films: Arc::from(Vec::new()),
            highlighted: Vec::new(),
            films_status: FilmsStatus::Loading,
        }
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn films_status(&self) -> &FilmsStatus {
        &self.films_status
    }

    pub fn highlighted(&self) -> &[String] {
        &self.highlighted
    }

    pub fn is_highlighted(&self, url: &str) -> bool {
        self.highlighted.iter().any(|u| u == url)
    }

    /// Store the fetched film list. Returns the shared handle to pass down to
    /// the form, or `None` if a list was already loaded this session.
    pub fn films_loaded(&mut self, films: Vec<Film>) -> Option<Arc<[Film]>> {
        if self.films_status == FilmsStatus::Loaded {
            debug!("[page] ignoring second film list");
            return None;
        }
        info!("[page] {} films loaded", films.len());
        self.films = Arc::from(films);
        self.films_status = FilmsStatus::Loaded;
        Some(Arc::clone(&self.films))
    }

    pub fn films_failed(&mut self, message: String) {
        if self.films_status != FilmsStatus::Loaded {
            self.films_status = FilmsStatus::Failed(message);
        }
    }

    /// Replace the highlight set wholesale.
    pub fn set_highlighted(&mut self, urls: Vec<String>) {
        self.highlighted = urls;
    }
}

impl Default for PageShell {
    fn default() -> Self {
        Self::new()
    }
}
