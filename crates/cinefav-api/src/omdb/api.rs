//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::params::{SearchParams, TitleParams};
use super::types::{OmdbSearchResponse, OmdbTitleResponse};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Both methods return the raw OMDb envelope: a `"False"` response is not an
/// error at this layer.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles by free text.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, the HTTP status or JSON parsing fails.
    async fn search(&self, params: &SearchParams) -> Result<OmdbSearchResponse>;

    /// Fetches full metadata for a single title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request, the HTTP status or JSON parsing fails.
    async fn title(&self, params: &TitleParams) -> Result<OmdbTitleResponse>;
}
