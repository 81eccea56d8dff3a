//! Single-title detail lookup.

use std::sync::LazyLock;

use cinefav_api::omdb::{OmdbApi, TitleParams};
use regex::Regex;
use tracing::instrument;

use crate::error::FetchError;
use crate::model::MovieDetails;

/// Message shown when the API reports no match without a message.
pub const NO_DETAILS_MESSAGE: &str = "Movie details not found.";

/// Regex for well-formed IMDb title ids.
#[allow(clippy::expect_used)]
static IMDB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt\d+$").expect("failed to compile IMDb id regex"));

/// Returns `true` if `id` looks like an IMDb title id (`tt` + digits).
#[must_use]
pub fn is_valid_imdb_id(id: &str) -> bool {
    IMDB_ID_RE.is_match(id)
}

/// Fetches full metadata for `id`, with the full plot.
///
/// # Errors
///
/// - `FetchError::InvalidId` if `id` is blank or malformed; no request is made.
/// - `FetchError::NotFound` if OMDb reports no such title.
/// - `FetchError::Transport` on network, HTTP or decoding failures.
#[instrument(skip(api))]
pub async fn fetch_details<A: OmdbApi + Sync>(
    api: &A,
    id: &str,
) -> Result<MovieDetails, FetchError> {
    let id = id.trim();
    if !is_valid_imdb_id(id) {
        return Err(FetchError::InvalidId {
            id: String::from(id),
        });
    }

    let response = api.title(&TitleParams::new(id)).await.map_err(|err| {
        tracing::warn!(error = %format!("{err:#}"), "detail request failed");
        FetchError::transport(&err)
    })?;

    if !response.is_success() {
        return Err(FetchError::not_found(
            response.error.as_deref(),
            NO_DETAILS_MESSAGE,
        ));
    }

    Ok(MovieDetails::from_response(response, id))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use anyhow::anyhow;
    use cinefav_api::omdb::{OmdbTitleResponse, PlotLength};

    use super::*;
    use crate::testing::MockOmdbApi;

    const FIXTURE: &str = include_str!("../../../fixtures/omdb/title_tt0372784.json");

    #[test]
    fn test_imdb_id_shape() {
        assert!(is_valid_imdb_id("tt0372784"));
        assert!(!is_valid_imdb_id(""));
        assert!(!is_valid_imdb_id("tt"));
        assert!(!is_valid_imdb_id("nm0634240"));
        assert!(!is_valid_imdb_id("tt0372784; DROP"));
    }

    #[tokio::test]
    async fn test_fetch_details_success() {
        // Arrange
        let api = MockOmdbApi::titles(|_| Ok(serde_json::from_str(FIXTURE)?));

        // Act
        let details = fetch_details(&api, "tt0372784").await.unwrap();

        // Assert
        assert_eq!(details.title, "Batman Begins");
        assert_eq!(details.director.as_deref(), Some("Christopher Nolan"));
        let calls = api.title_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].imdb_id, "tt0372784");
        assert_eq!(calls[0].plot, PlotLength::Full);
    }

    #[tokio::test]
    async fn test_malformed_id_makes_no_request() {
        // Arrange
        let api = MockOmdbApi::titles(|_| Ok(serde_json::from_str(FIXTURE)?));

        // Act
        let blank = fetch_details(&api, "   ").await;
        let malformed = fetch_details(&api, "batman").await;

        // Assert
        assert!(matches!(blank, Err(FetchError::InvalidId { .. })));
        assert!(matches!(malformed, Err(FetchError::InvalidId { ref id }) if id == "batman"));
        assert!(api.title_calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_and_transport_are_distinct() {
        // Arrange
        let missing = MockOmdbApi::titles(|_| {
            Ok(serde_json::from_str::<OmdbTitleResponse>(
                r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#,
            )?)
        });
        let offline = MockOmdbApi::titles(|_| Err(anyhow!("connection reset")));

        // Act
        let not_found = fetch_details(&missing, "tt9999999").await.unwrap_err();
        let transport = fetch_details(&offline, "tt9999999").await.unwrap_err();

        // Assert
        assert_eq!(
            not_found,
            FetchError::NotFound {
                message: String::from("Incorrect IMDb ID.")
            }
        );
        assert!(transport.is_transport());
        assert_ne!(not_found, transport);
    }
}
