//! Browser TUI state management.

use cinefav_core::{FavoriteMovie, MovieDetails, SearchResultItem};
use ratatui::widgets::TableState;

/// Currently focused pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Search results (left).
    Results,
    /// Favorites (right).
    Favorites,
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// List navigation; letters are commands.
    Normal,
    /// Letters edit the query.
    Query,
}

/// Detail popup content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Lookup in flight.
    Loading {
        /// Requested id.
        id: String,
    },
    /// Lookup succeeded.
    Loaded(Box<MovieDetails>),
    /// Lookup failed.
    Failed {
        /// Requested id.
        id: String,
        /// User-facing message.
        message: String,
    },
}

impl DetailView {
    /// Id the popup belongs to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Loading { id } | Self::Failed { id, .. } => id,
            Self::Loaded(details) => &details.id,
        }
    }
}

/// State for the browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Query as typed.
    pub query: String,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Currently focused pane.
    pub active_pane: ActivePane,
    /// Table state for the results list.
    pub results_table_state: TableState,
    /// Table state for the favorites list.
    pub favorites_table_state: TableState,
    /// Open detail popup.
    pub detail: Option<DetailView>,
    /// One-line message for the footer (e.g. a failed toggle).
    pub notice: Option<String>,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a table selection inside `0..len`.
fn clamp_selection(table: &mut TableState, len: usize) {
    match (table.selected(), len) {
        (_, 0) => table.select(None),
        (None, _) => table.select(Some(0)),
        (Some(i), _) if i >= len => table.select(Some(len.saturating_sub(1))),
        _ => {}
    }
}

impl BrowserState {
    /// Creates a state ready for typing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: String::new(),
            input_mode: InputMode::Query,
            active_pane: ActivePane::Results,
            results_table_state: TableState::default(),
            favorites_table_state: TableState::default(),
            detail: None,
            notice: None,
        }
    }

    /// Appends a character to the query.
    pub fn query_push(&mut self, ch: char) {
        self.query.push(ch);
        self.results_table_state.select(None);
    }

    /// Removes the last character from the query.
    pub fn query_pop(&mut self) {
        self.query.pop();
        self.results_table_state.select(None);
    }

    /// Empties the query.
    pub fn query_clear(&mut self) {
        self.query.clear();
        self.results_table_state.select(None);
    }

    /// Re-validates both selections against the current list lengths.
    pub fn sync(&mut self, results_len: usize, favorites_len: usize) {
        clamp_selection(&mut self.results_table_state, results_len);
        clamp_selection(&mut self.favorites_table_state, favorites_len);
    }

    fn active_table(&mut self) -> &mut TableState {
        match self.active_pane {
            ActivePane::Results => &mut self.results_table_state,
            ActivePane::Favorites => &mut self.favorites_table_state,
        }
    }

    /// Moves the cursor up.
    pub fn move_up(&mut self) {
        let table = self.active_table();
        if let Some(current) = table.selected() {
            table.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves the cursor down within a list of `len` rows.
    ///
    /// Returns `true` when the cursor sits on the last row afterwards.
    pub fn move_down(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let last = len.saturating_sub(1);
        let table = self.active_table();
        let next = table
            .selected()
            .map_or(0, |current| current.saturating_add(1).min(last));
        table.select(Some(next));
        next == last
    }

    /// Switches between the results and favorites panes.
    pub const fn toggle_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Results => ActivePane::Favorites,
            ActivePane::Favorites => ActivePane::Results,
        };
    }

    /// The movie under the cursor in the active pane.
    #[must_use]
    pub fn selected_movie(
        &self,
        results: &[SearchResultItem],
        favorites: &[FavoriteMovie],
    ) -> Option<FavoriteMovie> {
        match self.active_pane {
            ActivePane::Results => results
                .get(self.results_table_state.selected()?)
                .map(SearchResultItem::to_favorite),
            ActivePane::Favorites => favorites
                .get(self.favorites_table_state.selected()?)
                .cloned(),
        }
    }

    /// Stores a finished detail lookup if its popup is still open.
    pub fn finish_detail(&mut self, id: &str, view: DetailView) {
        if self.detail.as_ref().is_some_and(|open| open.id() == id) {
            self.detail = Some(view);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    fn results(n: usize) -> Vec<SearchResultItem> {
        (0..n)
            .map(|i| SearchResultItem {
                id: format!("tt{i:07}"),
                title: format!("Movie {i}"),
                year: String::from("2001"),
                poster_url: String::from("N/A"),
                kind: None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let state = BrowserState::new();

        // Assert
        assert_eq!(state.input_mode, InputMode::Query);
        assert_eq!(state.active_pane, ActivePane::Results);
        assert!(state.results_table_state.selected().is_none());
    }

    #[test]
    fn test_move_down_reports_end_of_list() {
        // Arrange
        let mut state = BrowserState::new();
        state.sync(3, 0);

        // Act & Assert
        assert!(!state.move_down(3));
        assert!(state.move_down(3));
        assert!(state.move_down(3)); // at end, stays on the last row
        assert_eq!(state.results_table_state.selected(), Some(2));

        state.move_up();
        assert_eq!(state.results_table_state.selected(), Some(1));
    }

    #[test]
    fn test_move_down_on_empty_list() {
        // Arrange
        let mut state = BrowserState::new();

        // Act & Assert
        assert!(!state.move_down(0));
        assert!(state.results_table_state.selected().is_none());
    }

    #[test]
    fn test_sync_clamps_selection() {
        // Arrange
        let mut state = BrowserState::new();
        state.results_table_state.select(Some(9));

        // Act
        state.sync(4, 0);

        // Assert
        assert_eq!(state.results_table_state.selected(), Some(3));
        assert!(state.favorites_table_state.selected().is_none());
    }

    #[test]
    fn test_typing_resets_result_cursor() {
        // Arrange
        let mut state = BrowserState::new();
        state.results_table_state.select(Some(2));

        // Act
        state.query_push('b');
        state.query_push('a');
        state.query_pop();

        // Assert
        assert_eq!(state.query, "b");
        assert!(state.results_table_state.selected().is_none());
    }

    #[test]
    fn test_selected_movie_follows_pane() {
        // Arrange
        let mut state = BrowserState::new();
        let rows = results(2);
        let favorites = vec![rows[1].to_favorite()];
        state.sync(rows.len(), favorites.len());
        state.move_down(rows.len());

        // Act
        let from_results = state.selected_movie(&rows, &favorites).unwrap();
        state.toggle_pane();
        let from_favorites = state.selected_movie(&rows, &favorites).unwrap();

        // Assert
        assert_eq!(from_results.id, "tt0000001");
        assert_eq!(from_favorites.id, "tt0000001");
        assert_eq!(state.active_pane, ActivePane::Favorites);
    }

    #[test]
    fn test_stale_detail_is_ignored() {
        // Arrange
        let mut state = BrowserState::new();
        state.detail = Some(DetailView::Loading {
            id: String::from("tt2"),
        });

        // Act
        state.finish_detail(
            "tt1",
            DetailView::Failed {
                id: String::from("tt1"),
                message: String::from("late"),
            },
        );

        // Assert
        assert_eq!(
            state.detail,
            Some(DetailView::Loading {
                id: String::from("tt2")
            })
        );
    }
}
