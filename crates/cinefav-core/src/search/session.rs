//! Search session state and its transitions.
//!
//! Every transition here is synchronous; the controller calls them while
//! holding the session lock and never across an `.await`.

use std::time::Duration;

use cinefav_api::omdb::MediaType;

use crate::error::FetchError;
use crate::model::SearchResultItem;

/// Default quiet period before a typed query is submitted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default number of results per page (OMDb's fixed page size).
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default query used to pre-populate browse mode.
pub const DEFAULT_SEED_QUERY: &str = "batman";

/// Message shown when the API reports no match without a message.
pub const NO_RESULTS_MESSAGE: &str = "No movies found.";

/// Search controller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a typed query is submitted.
    pub debounce: Duration,
    /// Results per page, used for `has_more` and the browse list length.
    pub page_size: u32,
    /// Query fetched once for browse mode.
    pub seed_query: String,
    /// Media type filter sent with every search.
    pub media_type: Option<MediaType>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
            seed_query: String::from(DEFAULT_SEED_QUERY),
            media_type: Some(MediaType::Movie),
        }
    }
}

/// Loading state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A first page is being fetched.
    LoadingFirstPage,
    /// A follow-up page is being fetched.
    LoadingNextPage,
    /// The last fetch failed; see `SearchSnapshot::error`.
    Error,
}

impl SearchStatus {
    /// Returns `true` while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::LoadingFirstPage | Self::LoadingNextPage)
    }
}

/// Result of one submitted search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The page was merged into the session.
    Loaded {
        /// Page number that was loaded.
        page: u32,
        /// Number of items the page contributed.
        count: usize,
    },
    /// The request failed; the error is also stored in the session.
    Failed(FetchError),
    /// The query was blank; the session was cleared without a request.
    Cleared,
    /// A newer query took over before the response arrived; it was dropped.
    Superseded,
    /// An append was refused without a request: a fetch was in flight or
    /// the query does not match the current result set.
    Skipped,
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSnapshot {
    /// Raw text as typed.
    pub input: String,
    /// Query of the current result set.
    pub query: String,
    /// Last requested page, starting at 1.
    pub page: u32,
    /// Results in arrival order, duplicates included.
    pub items: Vec<SearchResultItem>,
    /// Total reported by the API.
    pub total_available: u32,
    /// Whether another page can be loaded.
    pub has_more: bool,
    /// Loading state.
    pub status: SearchStatus,
    /// Last failure, cleared by the next first-page submission.
    pub error: Option<FetchError>,
    /// Seed results shown while the input is blank.
    pub browse_items: Vec<SearchResultItem>,
    /// Whether the seed fetch is in flight.
    pub loading_seed: bool,
}

impl SearchSnapshot {
    /// Rows to render: the browse list while the input is blank, the
    /// search results otherwise.
    #[must_use]
    pub fn display_items(&self) -> &[SearchResultItem] {
        if self.input.trim().is_empty() {
            &self.browse_items
        } else {
            &self.items
        }
    }

    /// Returns `true` while any fetch shown by this snapshot is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.status.is_loading() || self.loading_seed
    }
}

/// Mutable session state owned by the controller.
#[derive(Debug)]
pub(crate) struct SearchSession {
    view: SearchSnapshot,
    page_size: u32,
    /// Bumped on every first-page submission and every clear.
    generation: u64,
    seed_requested: bool,
}

/// `true` iff `page * page_size < total`.
fn more_pages(page: u32, page_size: u32, total: u32) -> bool {
    u64::from(page)
        .checked_mul(u64::from(page_size))
        .is_some_and(|shown| shown < u64::from(total))
}

impl SearchSession {
    pub(crate) fn new(page_size: u32) -> Self {
        Self {
            view: SearchSnapshot {
                page: 1,
                ..SearchSnapshot::default()
            },
            page_size,
            generation: 0,
            seed_requested: false,
        }
    }

    pub(crate) fn snapshot(&self) -> SearchSnapshot {
        self.view.clone()
    }

    pub(crate) fn set_input(&mut self, text: &str) {
        self.view.input = String::from(text);
    }

    /// Resets the result set and invalidates in-flight responses.
    pub(crate) fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.view.query.clear();
        self.view.page = 1;
        self.view.items.clear();
        self.view.total_available = 0;
        self.view.has_more = false;
        self.view.status = SearchStatus::Idle;
        self.view.error = None;
    }

    /// Starts a new result set for `query`. Returns its generation.
    pub(crate) fn begin_first_page(&mut self, query: &str, page: u32) -> u64 {
        self.clear();
        self.view.query = String::from(query);
        self.view.page = page;
        self.view.status = SearchStatus::LoadingFirstPage;
        self.generation
    }

    /// Marks `page` of `query` as loading under the current generation.
    ///
    /// Returns `None` while another fetch is in flight or when `query` is
    /// not the query of the current result set.
    pub(crate) fn begin_append(&mut self, query: &str, page: u32) -> Option<u64> {
        if self.view.status.is_loading()
            || self.view.query.trim().is_empty()
            || self.view.query != query
        {
            return None;
        }
        self.view.page = page;
        self.view.status = SearchStatus::LoadingNextPage;
        Some(self.generation)
    }

    /// Reserves the next page if loading more is allowed.
    ///
    /// Returns the generation, query and page to fetch.
    pub(crate) fn begin_next_page(&mut self) -> Option<(u64, String, u32)> {
        if !self.view.has_more {
            return None;
        }
        let page = self.view.page.checked_add(1)?;
        let query = self.view.query.clone();
        let generation = self.begin_append(&query, page)?;
        Some((generation, query, page))
    }

    /// Merges `page`, fetched under `generation`.
    pub(crate) fn apply_page(
        &mut self,
        generation: u64,
        page: u32,
        append: bool,
        result: Result<(Vec<SearchResultItem>, u32), FetchError>,
    ) -> SubmitOutcome {
        if generation != self.generation {
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok((items, total)) => {
                let count = items.len();
                if append {
                    self.view.items.extend(items);
                } else {
                    self.view.items = items;
                }
                self.view.page = page;
                self.view.total_available = total;
                self.view.has_more = more_pages(page, self.page_size, total);
                self.view.status = SearchStatus::Idle;
                self.view.error = None;
                SubmitOutcome::Loaded { page, count }
            }
            Err(err) => {
                if !append {
                    self.view.items.clear();
                    self.view.total_available = 0;
                }
                self.view.has_more = false;
                self.view.status = SearchStatus::Error;
                self.view.error = Some(err.clone());
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Claims the one-time seed fetch.
    pub(crate) fn begin_seed(&mut self) -> bool {
        if self.seed_requested {
            return false;
        }
        self.seed_requested = true;
        self.view.loading_seed = true;
        true
    }

    pub(crate) fn finish_seed(&mut self, items: Option<Vec<SearchResultItem>>) {
        self.view.loading_seed = false;
        if let Some(mut items) = items {
            items.truncate(usize::try_from(self.page_size).unwrap_or(usize::MAX));
            self.view.browse_items = items;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn rows(n: usize) -> Vec<SearchResultItem> {
        (0..n)
            .map(|i| SearchResultItem {
                id: format!("tt{i:07}"),
                title: format!("Movie {i}"),
                year: String::from("2000"),
                poster_url: String::from("N/A"),
                kind: Some(String::from("movie")),
            })
            .collect()
    }

    #[test]
    fn test_more_pages_boundaries() {
        assert!(more_pages(1, 10, 25));
        assert!(more_pages(2, 10, 25));
        assert!(!more_pages(3, 10, 25));
        assert!(!more_pages(1, 10, 10));
        assert!(!more_pages(1, 10, 0));
        assert!(!more_pages(u32::MAX, u32::MAX, u32::MAX));
    }

    #[test]
    fn test_new_session_starts_on_page_one() {
        // Arrange & Act
        let session = SearchSession::new(10);

        // Assert
        let view = session.snapshot();
        assert_eq!(view.page, 1);
        assert_eq!(view.status, SearchStatus::Idle);
        assert!(view.items.is_empty());
    }

    #[test]
    fn test_first_page_replaces_items() {
        // Arrange
        let mut session = SearchSession::new(10);
        let generation = session.begin_first_page("batman", 1);
        session.apply_page(generation, 1, false, Ok((rows(10), 25)));
        let generation = session.begin_first_page("superman", 1);

        // Act
        let outcome = session.apply_page(generation, 1, false, Ok((rows(3), 3)));

        // Assert
        assert_eq!(outcome, SubmitOutcome::Loaded { page: 1, count: 3 });
        let view = session.snapshot();
        assert_eq!(view.query, "superman");
        assert_eq!(view.items.len(), 3);
        assert!(!view.has_more);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        // Arrange
        let mut session = SearchSession::new(10);
        let stale = session.begin_first_page("bat", 1);
        let current = session.begin_first_page("batman", 1);
        session.apply_page(current, 1, false, Ok((rows(2), 2)));

        // Act
        let outcome = session.apply_page(stale, 1, false, Ok((rows(10), 99)));

        // Assert
        assert_eq!(outcome, SubmitOutcome::Superseded);
        assert_eq!(session.snapshot().items.len(), 2);
        assert_eq!(session.snapshot().total_available, 2);
    }

    #[test]
    fn test_next_page_requires_idle_more_and_query() {
        // Arrange
        let mut session = SearchSession::new(10);

        // Act & Assert: nothing loaded yet
        assert!(session.begin_next_page().is_none());

        let generation = session.begin_first_page("batman", 1);
        // in flight
        assert!(session.begin_next_page().is_none());

        session.apply_page(generation, 1, false, Ok((rows(10), 25)));
        let (next_generation, query, page) = session.begin_next_page().unwrap();
        assert_eq!(next_generation, generation);
        assert_eq!(query, "batman");
        assert_eq!(page, 2);
        // the reserved page is now in flight
        assert!(session.begin_next_page().is_none());
    }

    #[test]
    fn test_append_refused_while_first_page_loads() {
        // Arrange
        let mut session = SearchSession::new(10);
        let generation = session.begin_first_page("batman", 1);

        // Act
        let during = session.begin_append("batman", 2);
        let first = session.apply_page(generation, 1, false, Ok((rows(10), 25)));

        // Assert
        assert!(during.is_none());
        assert_eq!(first, SubmitOutcome::Loaded { page: 1, count: 10 });
        let view = session.snapshot();
        assert_eq!(view.page, 1);
        assert_eq!(view.items.len(), 10);
        assert!(view.has_more);
    }

    #[test]
    fn test_append_requires_current_query() {
        // Arrange
        let mut session = SearchSession::new(10);
        let generation = session.begin_first_page("batman", 1);
        session.apply_page(generation, 1, false, Ok((rows(10), 25)));

        // Act
        let other = session.begin_append("superman", 2);
        let same = session.begin_append("batman", 2);

        // Assert
        assert!(other.is_none());
        assert_eq!(same, Some(generation));
        assert_eq!(session.snapshot().status, SearchStatus::LoadingNextPage);
    }

    #[test]
    fn test_append_failure_keeps_items() {
        // Arrange
        let mut session = SearchSession::new(10);
        let generation = session.begin_first_page("batman", 1);
        session.apply_page(generation, 1, false, Ok((rows(10), 25)));
        let (generation, _, next) = session.begin_next_page().unwrap();
        let err = FetchError::Transport {
            detail: String::from("timeout"),
        };

        // Act
        let outcome = session.apply_page(generation, next, true, Err(err.clone()));

        // Assert
        assert_eq!(outcome, SubmitOutcome::Failed(err.clone()));
        let view = session.snapshot();
        assert_eq!(view.items.len(), 10);
        assert!(!view.has_more);
        assert_eq!(view.status, SearchStatus::Error);
        assert_eq!(view.error, Some(err));
    }

    #[test]
    fn test_first_page_failure_clears_items() {
        // Arrange
        let mut session = SearchSession::new(10);
        let generation = session.begin_first_page("batman", 1);
        session.apply_page(generation, 1, false, Ok((rows(10), 25)));
        let generation = session.begin_first_page("zzzz", 1);

        // Act
        session.apply_page(
            generation,
            1,
            false,
            Err(FetchError::not_found(Some("Movie not found!"), NO_RESULTS_MESSAGE)),
        );

        // Assert
        let view = session.snapshot();
        assert!(view.items.is_empty());
        assert!(!view.has_more);
        assert!(view.error.unwrap().is_not_found());
    }

    #[test]
    fn test_seed_is_claimed_once_and_truncated() {
        // Arrange
        let mut session = SearchSession::new(4);

        // Act
        let first = session.begin_seed();
        session.finish_seed(Some(rows(10)));
        let second = session.begin_seed();

        // Assert
        assert!(first);
        assert!(!second);
        let view = session.snapshot();
        assert_eq!(view.browse_items.len(), 4);
        assert!(!view.loading_seed);
        assert_eq!(view.display_items().len(), 4);
    }

    #[test]
    fn test_display_items_follow_input() {
        // Arrange
        let mut session = SearchSession::new(10);
        session.finish_seed(Some(rows(2)));
        let generation = session.begin_first_page("batman", 1);
        session.apply_page(generation, 1, false, Ok((rows(5), 5)));

        // Act
        let blank = session.snapshot();
        session.set_input("batman");
        let typed = session.snapshot();

        // Assert
        assert_eq!(blank.display_items().len(), 2);
        assert_eq!(typed.display_items().len(), 5);
    }
}
