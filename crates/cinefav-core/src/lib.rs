//! Core state for cinefav.
//!
//! Two independent components:
//!
//! - [`FavoritesStore`]: the user's pinned movies, held in memory and
//!   mirrored into a [`cinefav_db::KeyValueStore`].
//! - [`SearchController`]: a debounced, paginated OMDb search session.
//!
//! Neither owns any UI; the presentation layer reads snapshots and calls
//! the mutating operations.

/// Single-title detail lookup.
pub mod details;
/// Error kinds.
pub mod error;
/// Favorites store.
pub mod favorites;
/// Domain records.
pub mod model;
/// Debounced, paginated search.
pub mod search;

#[cfg(test)]
mod testing;

pub use details::fetch_details;
pub use error::{FavoritesError, FetchError};
pub use favorites::{FAVORITES_KEY, FavoritesStore};
pub use model::{FavoriteMovie, MovieDetails, SearchResultItem};
pub use search::{SearchConfig, SearchController, SearchSnapshot, SearchStatus, SubmitOutcome};
