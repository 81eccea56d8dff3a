//! Paginated, debounced search against OMDb.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cinefav_api::omdb::{OmdbApi, SearchParams};
use tracing::instrument;

use super::debounce::Debouncer;
use super::session::{
    NO_RESULTS_MESSAGE, SearchConfig, SearchSession, SearchSnapshot, SubmitOutcome,
};
use crate::error::FetchError;
use crate::model::SearchResultItem;

struct Shared<A> {
    api: Arc<A>,
    config: SearchConfig,
    session: Mutex<SearchSession>,
    debouncer: Debouncer,
}

/// Owns one search session.
///
/// Clones share the session, so a clone can be moved into a spawned task.
/// Responses are tagged with the generation that issued them and dropped
/// if a newer query took over in the meantime.
#[allow(clippy::module_name_repetitions)]
pub struct SearchController<A> {
    shared: Arc<Shared<A>>,
}

impl<A> Clone for SearchController<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for SearchController<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchController")
            .field("config", &self.shared.config)
            .field("debounce_pending", &self.shared.debouncer.is_pending())
            .finish_non_exhaustive()
    }
}

impl<A: OmdbApi + Send + Sync + 'static> SearchController<A> {
    /// Creates a controller with an idle session.
    #[must_use]
    pub fn new(api: Arc<A>, config: SearchConfig) -> Self {
        let session = SearchSession::new(config.page_size);
        Self {
            shared: Arc::new(Shared {
                api,
                config,
                session: Mutex::new(session),
                debouncer: Debouncer::new(),
            }),
        }
    }

    /// Controller settings.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.shared.config
    }

    fn lock(&self) -> MutexGuard<'_, SearchSession> {
        self.shared
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session state.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.lock().snapshot()
    }

    /// Updates the typed text and schedules a debounced first-page search.
    ///
    /// Blank text clears the session at once without a request. Must be
    /// called from within a Tokio runtime.
    pub fn set_query(&self, text: &str) {
        self.lock().set_input(text);

        if text.trim().is_empty() {
            self.shared.debouncer.cancel();
            self.lock().clear();
            tracing::debug!("query cleared");
            return;
        }

        let this = self.clone();
        let query = String::from(text);
        self.shared
            .debouncer
            .schedule(self.shared.config.debounce, async move {
                this.submit_search(&query, 1, false).await;
            });
    }

    /// Fetches one page of `query`.
    ///
    /// With `append == false` this starts a new result set and supersedes
    /// any response still in flight. With `append == true` the page is added
    /// to the current result set; the call returns [`SubmitOutcome::Skipped`]
    /// without a request while another fetch is in flight or when `query`
    /// differs from the current result set's query.
    #[instrument(skip_all, fields(query = %query, page = page, append = append))]
    pub async fn submit_search(&self, query: &str, page: u32, append: bool) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.shared.debouncer.cancel();
            self.lock().clear();
            return SubmitOutcome::Cleared;
        }

        let generation = if append {
            let reserved = self.lock().begin_append(query, page);
            let Some(generation) = reserved else {
                tracing::debug!(query, page, "append refused, session busy or query changed");
                return SubmitOutcome::Skipped;
            };
            generation
        } else {
            self.lock().begin_first_page(query, page)
        };
        self.run_page(generation, query, page, append).await
    }

    /// Fetches the next page of the current query.
    ///
    /// Returns `None` without a request while a fetch is in flight, when
    /// there are no more pages, or when the query is blank.
    pub async fn load_more(&self) -> Option<SubmitOutcome> {
        let (generation, query, page) = self.lock().begin_next_page()?;
        tracing::debug!(%query, page, "loading next page");
        Some(self.run_page(generation, &query, page, true).await)
    }

    /// Fetches the seed query into the browse list, once per controller.
    ///
    /// Failures are logged and leave the browse list empty. Returns `true`
    /// if this call performed the fetch.
    #[instrument(skip_all)]
    pub async fn load_default(&self) -> bool {
        if !self.lock().begin_seed() {
            return false;
        }

        let seed = self.shared.config.seed_query.clone();
        let items = match self.fetch_page(&seed, 1).await {
            Ok((items, _)) => {
                tracing::debug!(seed = %seed, count = items.len(), "browse list loaded");
                Some(items)
            }
            Err(err) => {
                tracing::warn!(seed = %seed, error = %err, "failed to load browse list");
                None
            }
        };
        self.lock().finish_seed(items);
        true
    }

    async fn run_page(
        &self,
        generation: u64,
        query: &str,
        page: u32,
        append: bool,
    ) -> SubmitOutcome {
        let result = self.fetch_page(query, page).await;
        let outcome = self.lock().apply_page(generation, page, append, result);

        match &outcome {
            SubmitOutcome::Loaded { page, count } => {
                tracing::debug!(query, page, count, "search page loaded");
            }
            SubmitOutcome::Failed(err) => {
                tracing::debug!(query, page, error = %err, "search page failed");
            }
            SubmitOutcome::Superseded => {
                tracing::debug!(query, page, "discarding stale search response");
            }
            SubmitOutcome::Cleared | SubmitOutcome::Skipped => {}
        }
        outcome
    }

    /// One search request, mapped into result rows and the reported total.
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
    ) -> Result<(Vec<SearchResultItem>, u32), FetchError> {
        let mut params = SearchParams::new(query).page(page);
        if let Some(media_type) = self.shared.config.media_type {
            params = params.media_type(media_type);
        }

        let response = self.shared.api.search(&params).await.map_err(|err| {
            tracing::warn!(error = %format!("{err:#}"), "search request failed");
            FetchError::transport(&err)
        })?;

        if !response.is_success() {
            return Err(FetchError::not_found(
                response.error.as_deref(),
                NO_RESULTS_MESSAGE,
            ));
        }

        let total = response.total_results().ok_or_else(|| {
            tracing::warn!(total = ?response.total_results, "unparsable totalResults");
            FetchError::Transport {
                detail: format!("unparsable totalResults: {:?}", response.total_results),
            }
        })?;

        let items = response
            .search
            .into_iter()
            .map(SearchResultItem::from)
            .collect();
        Ok((items, total))
    }
}
