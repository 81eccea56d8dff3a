//! Debounced, paginated search.
//!
//! [`SearchController`] owns one [`SearchSnapshot`]-producing session and
//! talks to any [`cinefav_api::omdb::OmdbApi`].

mod controller;
mod debounce;
mod session;

pub use controller::SearchController;
pub use debounce::Debouncer;
pub use session::{
    DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, DEFAULT_SEED_QUERY, NO_RESULTS_MESSAGE, SearchConfig,
    SearchSnapshot, SearchStatus, SubmitOutcome,
};
