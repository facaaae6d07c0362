//! App: event loop hosting the search form and the film list.
//!
//! Architecture:
//! - `App` owns the `PageShell`, the `SearchForm` coordinator and all components.
//! - Terminal events and the one-off film fetch arrive as `AppMessage`s over
//!   an mpsc channel; search replies arrive on the `Searcher`'s own channel.
//! - Every message is handled to completion before the next one is read.
//! - Components return `Vec<Action>`; the form returns `Vec<FormEvent>`;
//!   App dispatches both.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Terminal,
};
use swapi_proto::config::Config;
use swapi_proto::{EntityKind, Film, SwapiClient, SwapiError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    action::{Action, ComponentId},
    component::{Component, ViewState},
    components::{
        film_list::FilmList,
        search_field::{draw_search_bar, SearchField},
    },
    focus::FocusRing,
    form::{FormEvent, SearchForm},
    page::PageShell,
    search::{SearchReply, Searcher},
    theme::C_BG,
    widgets::{status_bar, toast::ToastManager},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    FilmsLoaded(Result<Vec<Film>, SwapiError>),
}

/// How long the reader waits for a terminal event before re-checking `stop`.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Forward terminal events to `tx` until `stop` is set or the receiver goes
/// away. `next_event` waits at most the given timeout and yields `None` when
/// nothing arrived, so quitting never hangs on a pending read.
fn spawn_event_reader<F>(
    tx: mpsc::Sender<AppMessage>,
    stop: Arc<AtomicBool>,
    mut next_event: F,
) -> JoinHandle<()>
where
    F: FnMut(Duration) -> io::Result<Option<Event>> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            match next_event(INPUT_POLL) {
                Ok(Some(ev)) => {
                    if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("[app] terminal event read failed: {}", e);
                    break;
                }
            }
        }
        debug!("[app] event reader stopped");
    })
}

fn poll_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── State ─────────────────────────────────────────────────────────────────
    page: PageShell,
    form: SearchForm,

    // ── Components ────────────────────────────────────────────────────────────
    /// In `EntityKind::ALL` order.
    fields: Vec<SearchField>,
    film_list: FilmList,
    focus: FocusRing,
    toast: ToastManager,

    // ── Remote ────────────────────────────────────────────────────────────────
    client: Arc<SwapiClient>,
    searcher: Searcher<SwapiClient>,
    search_rx: Option<mpsc::Receiver<SearchReply>>,

    tick: Duration,
    should_quit: bool,
    reader_stop: Arc<AtomicBool>,
}

impl App {
    pub fn new(config: &Config, client: SwapiClient) -> Self {
        let client = Arc::new(client);
        let (searcher, search_rx) = Searcher::new(Arc::clone(&client));

        let mut ring: Vec<ComponentId> = EntityKind::ALL
            .iter()
            .map(|k| ComponentId::Field(*k))
            .collect();
        ring.push(ComponentId::FilmList);

        Self {
            page: PageShell::new(),
            form: SearchForm::new(),
            fields: EntityKind::ALL.iter().map(|k| SearchField::new(*k)).collect(),
            film_list: FilmList::new(),
            focus: FocusRing::new(ring),
            toast: ToastManager::new(),
            client,
            searcher,
            search_rx: Some(search_rx),
            tick: Duration::from_millis(config.ui.tick_ms.max(10)),
            should_quit: false,
            reader_stop: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        self.searcher.cancel();
        self.reader_stop.store(true, Ordering::Relaxed);
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        let mut search_rx = self
            .search_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already started"))?;

        // ── Background task: keyboard events ──────────────────────────────────
        spawn_event_reader(tx.clone(), Arc::clone(&self.reader_stop), poll_terminal);

        // ── Background task: film list, fetched once ──────────────────────────
        let films_tx = tx.clone();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.fetch_films().await;
            let _ = films_tx.send(AppMessage::FilmsLoaded(result)).await;
        });

        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                Some(reply) = search_rx.recv() => {
                    needs_redraw = self.on_search_reply(reply);
                }

                _ = ticker.tick() => {
                    // Keep redrawing while a search is pending.
                    needs_redraw = self.toast.tick() || self.searcher.is_pending();
                }
            }
        }

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,

            AppMessage::FilmsLoaded(Ok(films)) => {
                let count = films.len();
                if let Some(shared) = self.page.films_loaded(films) {
                    self.form.set_films(shared);
                    self.toast.info(format!("{} films loaded", count));
                }
                true
            }
            AppMessage::FilmsLoaded(Err(e)) => {
                error!("[app] film list fetch failed: {}", e);
                self.page.films_failed(e.to_string());
                self.toast.error("Could not load the film list");
                true
            }
        }
    }

    fn on_search_reply(&mut self, reply: SearchReply) -> bool {
        let Some((request, result)) = self.searcher.accept(reply) else {
            return false;
        };
        info!(
            "[app] search {} {:?} finished (ok={})",
            request.kind,
            request.term,
            result.is_ok()
        );
        let events = self.form.finish_search(&request, result);
        self.apply_form_events(events);
        true
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return vec![Action::Quit],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        let view = ViewState {
            page: &self.page,
            form: &self.form,
        };
        match self.focus.current() {
            Some(ComponentId::Field(kind)) => self
                .fields
                .iter_mut()
                .find(|f| f.kind() == kind)
                .map(|f| f.handle_key(key, &view))
                .unwrap_or_default(),
            Some(ComponentId::FilmList) => self.film_list.handle_key(key, &view),
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Input(kind, value) => {
                let events = self.form.on_input(kind, value);
                self.apply_form_events(events);
            }
            Action::Submit => {
                let events = self.form.submit();
                self.apply_form_events(events);
            }
            Action::FocusNext | Action::FocusPrev => {
                // Leaving a field is a blur: it may now show its error.
                if let Some(ComponentId::Field(kind)) = self.focus.current() {
                    self.form.touch(kind);
                }
                if action == Action::FocusNext {
                    self.focus.next();
                } else {
                    self.focus.prev();
                }
            }
            Action::ScrollUp(n) => self.film_list.scroll_up(n),
            Action::ScrollDown(n) => self.film_list.scroll_down(n, self.page.films().len()),
            Action::Quit => {
                info!("[app] quit requested");
                self.should_quit = true;
            }
        }

        for field in self.fields.iter_mut() {
            field.sync(&self.form);
        }
    }

    fn apply_form_events(&mut self, events: Vec<FormEvent>) {
        for event in events {
            match event {
                FormEvent::HighlightFilms(urls) => self.page.set_highlighted(urls),
                FormEvent::Search(request) => {
                    if self.searcher.is_pending() {
                        warn!("[app] abandoning pending search for {:?}", request.term);
                    }
                    self.searcher.start(request);
                }
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let mut constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|f| Constraint::Length(f.height()))
            .collect();
        constraints.extend([
            Constraint::Length(1), // search bar
            Constraint::Length(1), // separator
            Constraint::Min(4),    // films
            Constraint::Length(1), // keys
        ]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let view = ViewState {
            page: &self.page,
            form: &self.form,
        };
        let n = self.fields.len();
        for (i, field) in self.fields.iter_mut().enumerate() {
            let focused = self.focus.is_focused(field.id());
            field.draw(frame, rows[i], focused, &view);
        }

        draw_search_bar(frame, rows[n], &self.form, self.searcher.is_pending());
        status_bar::draw_separator(frame, rows[n + 1]);

        let films_focused = self.focus.is_focused(ComponentId::FilmList);
        self.film_list.draw(frame, rows[n + 2], films_focused, &view);

        let in_field = matches!(self.focus.current(), Some(ComponentId::Field(_)));
        status_bar::draw_keys_bar(frame, rows[n + 3], self.page.films_status(), in_field);

        self.toast.draw(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::time::timeout;

    /// Hands out `events` one per call, then reports nothing until stopped.
    fn scripted(events: Vec<Event>) -> impl FnMut(Duration) -> io::Result<Option<Event>> + Send {
        let mut events = VecDeque::from(events);
        move |wait| match events.pop_front() {
            Some(ev) => Ok(Some(ev)),
            None => {
                std::thread::sleep(wait.min(Duration::from_millis(5)));
                Ok(None)
            }
        }
    }

    #[tokio::test]
    async fn test_event_reader_forwards_then_stops_on_flag() {
        let (tx, mut rx) = mpsc::channel(8);
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_event_reader(tx, Arc::clone(&stop), scripted(vec![Event::Resize(80, 24)]));

        match rx.recv().await {
            Some(AppMessage::Event(Event::Resize(80, 24))) => {}
            _ => panic!("expected the scripted resize event"),
        }

        // No further input arrives, yet setting the flag ends the reader.
        stop.store(true, Ordering::Relaxed);
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("reader should stop without another event")
            .unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_event_reader_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_event_reader(tx, stop, scripted(vec![Event::FocusGained]));

        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_event_reader_stops_on_read_error() {
        let (tx, _rx) = mpsc::channel(1);
        let stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_event_reader(tx, stop, |_| Err(io::Error::other("tty gone")));

        timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
