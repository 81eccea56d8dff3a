//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. The event loop polls the
//! terminal without blocking and sleeps on the Tokio timer between frames,
//! so debounced searches and favorite writes progress on the same
//! current-thread runtime.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cinefav_api::omdb::OmdbApi;
use cinefav_core::{
    FavoriteMovie, FavoritesError, FavoritesStore, FetchError, MovieDetails, SearchController,
    SearchSnapshot, fetch_details,
};
use cinefav_db::KeyValueStore;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use self::state::{ActivePane, BrowserState, DetailView, InputMode};
use self::ui::BrowserView;

/// Frame interval while no key is pending.
const TICK: Duration = Duration::from_millis(50);

/// IMDb title page prefix.
const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

/// Result of a background task, applied on the next frame.
enum Update {
    Detail {
        id: String,
        result: Result<MovieDetails, FetchError>,
    },
    Toggled {
        title: String,
        result: Result<bool, FavoritesError>,
    },
}

/// Browser session: core handles plus UI state.
struct Browser<A, S> {
    controller: SearchController<A>,
    favorites: Arc<FavoritesStore<S>>,
    api: Arc<A>,
    updates: mpsc::UnboundedSender<Update>,
    state: BrowserState,
}

/// Runs the browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A, S>(
    controller: SearchController<A>,
    favorites: Arc<FavoritesStore<S>>,
    api: Arc<A>,
) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let mut browser = Browser {
        controller,
        favorites,
        api,
        updates: tx,
        state: BrowserState::new(),
    };

    let seed = browser.controller.clone();
    tokio::spawn(async move {
        seed.load_default().await;
    });

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut browser, rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A, S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut Browser<A, S>,
    mut updates: mpsc::UnboundedReceiver<Update>,
) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    loop {
        while let Ok(update) = updates.try_recv() {
            browser.apply(update);
        }

        let search = browser.controller.snapshot();
        let favorites = browser.favorites.favorites();
        browser
            .state
            .sync(search.display_items().len(), favorites.len());

        let view = BrowserView {
            search: &search,
            favorites: &favorites,
        };
        terminal
            .draw(|frame| ui::draw(frame, &mut browser.state, &view))
            .context("failed to draw TUI")?;

        if event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
                && browser.handle_key(key, &search, &favorites)
            {
                return Ok(());
            }
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(TICK).await;
        }
    }
}

impl<A, S> Browser<A, S>
where
    A: OmdbApi + Send + Sync + 'static,
    S: KeyValueStore + Send + Sync + 'static,
{
    /// Applies a finished background task.
    fn apply(&mut self, update: Update) {
        match update {
            Update::Detail { id, result } => {
                let view = match result {
                    Ok(details) => DetailView::Loaded(Box::new(details)),
                    Err(err) => DetailView::Failed {
                        id: id.clone(),
                        message: err.to_string(),
                    },
                };
                self.state.finish_detail(&id, view);
            }
            Update::Toggled { title, result } => {
                if let Err(err) = result {
                    tracing::debug!(error = %err, "favorite toggle failed");
                    self.state.notice = Some(format!("Could not update favorites for {title}: {err}"));
                }
            }
        }
    }

    /// Handles one key press. Returns `true` to exit.
    fn handle_key(
        &mut self,
        key: KeyEvent,
        search: &SearchSnapshot,
        favorites: &[FavoriteMovie],
    ) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.state.notice = None;

        if self.state.detail.is_some() {
            self.handle_detail_input(key.code);
            return false;
        }

        match self.state.input_mode {
            InputMode::Query => {
                self.handle_query_input(key.code);
                false
            }
            InputMode::Normal => self.handle_normal_input(key.code, search, favorites),
        }
    }

    /// Keys while the detail popup is open.
    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.state.detail = None,
            KeyCode::Char(' ' | 'f') => {
                if let Some(DetailView::Loaded(details)) = &self.state.detail {
                    self.toggle_favorite(details.to_favorite());
                }
            }
            KeyCode::Char('o') => {
                if let Some(detail) = &self.state.detail {
                    let id = String::from(detail.id());
                    self.open_imdb(&id);
                }
            }
            _ => {}
        }
    }

    /// Keys while typing the query.
    fn handle_query_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state.query_clear();
                self.controller.set_query("");
            }
            KeyCode::Enter | KeyCode::Down => {
                self.state.input_mode = InputMode::Normal;
                self.state.active_pane = ActivePane::Results;
            }
            KeyCode::Tab => {
                self.state.input_mode = InputMode::Normal;
                self.state.active_pane = ActivePane::Favorites;
            }
            KeyCode::Backspace => {
                self.state.query_pop();
                self.controller.set_query(&self.state.query);
            }
            KeyCode::Char(c) => {
                self.state.query_push(c);
                self.controller.set_query(&self.state.query);
            }
            _ => {}
        }
    }

    /// Keys while navigating the lists. Returns `true` to exit.
    fn handle_normal_input(
        &mut self,
        key: KeyCode,
        search: &SearchSnapshot,
        favorites: &[FavoriteMovie],
    ) -> bool {
        let results = search.display_items();
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                self.state.input_mode = InputMode::Query;
                self.state.active_pane = ActivePane::Results;
            }
            KeyCode::Esc => {
                self.state.query_clear();
                self.controller.set_query("");
                self.state.input_mode = InputMode::Query;
                self.state.active_pane = ActivePane::Results;
            }
            KeyCode::Tab => self.state.toggle_pane(),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = match self.state.active_pane {
                    ActivePane::Results => results.len(),
                    ActivePane::Favorites => favorites.len(),
                };
                let at_end = self.state.move_down(len);
                if at_end && self.state.active_pane == ActivePane::Results {
                    self.load_more();
                }
            }
            KeyCode::Char(' ' | 'f') => {
                if let Some(movie) = self.state.selected_movie(results, favorites) {
                    self.toggle_favorite(movie);
                }
            }
            KeyCode::Enter => {
                if let Some(movie) = self.state.selected_movie(results, favorites) {
                    self.request_details(movie.id);
                }
            }
            KeyCode::Char('o') => {
                if let Some(movie) = self.state.selected_movie(results, favorites) {
                    self.open_imdb(&movie.id);
                }
            }
            _ => {}
        }
        false
    }

    /// Fetches the next results page in the background.
    fn load_more(&self) {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            controller.load_more().await;
        });
    }

    /// Toggles a favorite in the background.
    fn toggle_favorite(&self, movie: FavoriteMovie) {
        let store = Arc::clone(&self.favorites);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let title = movie.title.clone();
            let result = store.toggle(movie).await;
            let _ = updates.send(Update::Toggled { title, result });
        });
    }

    /// Opens the detail popup and fetches its content.
    fn request_details(&mut self, id: String) {
        self.state.detail = Some(DetailView::Loading { id: id.clone() });
        let api = Arc::clone(&self.api);
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let result = fetch_details(api.as_ref(), &id).await;
            let _ = updates.send(Update::Detail { id, result });
        });
    }

    /// Opens the IMDb page for `id` in the default browser.
    fn open_imdb(&mut self, id: &str) {
        let url = format!("{IMDB_TITLE_URL}{id}/");
        if let Err(err) = open::that(&url) {
            self.state.notice = Some(format!("Could not open {url}: {err}"));
        }
    }
}
