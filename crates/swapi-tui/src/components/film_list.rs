//! FilmList: every film fetched at startup, with the highlight set marked.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use swapi_proto::Film;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::action::{Action, ComponentId};
use crate::component::{Component, ViewState};
use crate::page::FilmsStatus;
use crate::theme::{
    style_default, style_error, style_highlighted, style_muted, style_secondary, style_selected,
    C_HIGHLIGHT,
};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

const TITLE_COLS: usize = 28;
const DIRECTOR_COLS: usize = 20;

pub struct FilmList {
    offset: usize,
}

impl FilmList {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize, len: usize) {
        self.offset = (self.offset + n).min(len.saturating_sub(1));
    }

    fn render_item(&self, film: &Film, highlighted: bool) -> ListItem<'static> {
        let marker = if highlighted { "★ " } else { "  " };
        let year = film
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        let row_style = if highlighted {
            style_highlighted()
        } else {
            style_default()
        };

        let line = Line::from(vec![
            Span::styled(marker, row_style),
            Span::styled(format!("{:>2}  ", film.episode_id), style_secondary()),
            Span::styled(pad_to_width(&film.title, TITLE_COLS), row_style),
            Span::styled(pad_to_width(&film.director, DIRECTOR_COLS), style_secondary()),
            Span::styled(year, style_muted()),
        ]);
        let item = ListItem::new(line);
        if highlighted {
            item.style(style_selected())
        } else {
            item
        }
    }
}

impl Default for FilmList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for FilmList {
    fn id(&self) -> ComponentId {
        ComponentId::FilmList
    }

    fn handle_key(&mut self, key: KeyEvent, _view: &ViewState<'_>) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::ScrollUp(1)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::ScrollDown(1)],
            KeyCode::PageUp => vec![Action::ScrollUp(10)],
            KeyCode::PageDown => vec![Action::ScrollDown(10)],
            KeyCode::Enter => vec![Action::Submit],
            KeyCode::Char('q') => vec![Action::Quit],
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, view: &ViewState<'_>) {
        let matches = view.page.highlighted().len();
        let badge_text = format!("{} MATCHING", matches);
        let badge = (matches > 0).then(|| Badge {
            text: badge_text.as_str(),
            color: C_HIGHLIGHT,
        });
        let block = pane_chrome("films", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let films = view.page.films();
        if films.is_empty() {
            let (msg, style) = match view.page.films_status() {
                FilmsStatus::Loading => ("  fetching films…".to_string(), style_muted()),
                FilmsStatus::Failed(e) => (format!("  could not load films: {}", e), style_error()),
                FilmsStatus::Loaded => ("  no films".to_string(), style_muted()),
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style)), inner);
            return;
        }

        let offset = self.offset.min(films.len().saturating_sub(1));
        let items: Vec<ListItem> = films
            .iter()
            .skip(offset)
            .take(inner.height as usize)
            .map(|film| self.render_item(film, view.page.is_highlighted(&film.url)))
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}

/// Truncate or pad `s` to exactly `cols` display columns.
fn pad_to_width(s: &str, cols: usize) -> String {
    if s.width() <= cols {
        return format!("{}{}", s, " ".repeat(cols - s.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > cols.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out
}
