//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb endpoint and retrieves
//! paginated title searches and full title metadata.

mod api;
mod client;
mod params;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_TIMEOUT, OmdbClient, OmdbClientBuilder};
pub use params::{MediaType, PlotLength, SearchParams, TitleParams};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    NOT_AVAILABLE, OmdbErrorResponse, OmdbSearchItem, OmdbSearchResponse, OmdbTitleResponse,
};
