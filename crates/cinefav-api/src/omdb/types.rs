//! OMDb API response types.
//!
//! OMDb signals success with a string `Response` field (`"True"` / `"False"`)
//! instead of an HTTP status. Failed lookups carry a human-readable `Error`.

use serde::Deserialize;

/// Value OMDb uses for a successful `Response` field.
const RESPONSE_TRUE: &str = "True";

/// Placeholder OMDb uses for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

// --- Search ---

/// Response from the `?s=` search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Search results (absent on failure).
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    /// Total number of results, as a decimal string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// Error message when `response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    /// Returns `true` if OMDb reported a successful search.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response == RESPONSE_TRUE
    }

    /// Parses `totalResults`.
    ///
    /// Returns `None` if the field is absent or not a number.
    #[must_use]
    pub fn total_results(&self) -> Option<u32> {
        self.total_results.as_deref()?.trim().parse().ok()
    }
}

/// A single search result summary.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    /// IMDb identifier (e.g. `tt0372784`).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year or year range (e.g. `2005`, `2008–2012`).
    #[serde(rename = "Year")]
    pub year: String,
    /// Media type (`movie`, `series`, `episode`).
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    /// Poster URL or `N/A`.
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

// --- Title lookup ---

/// Response from the `?i=` title lookup endpoint.
///
/// Every metadata field is optional because a failed lookup only carries
/// `Response` and `Error`.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbTitleResponse {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Error message when `response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    /// IMDb identifier.
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    /// Title.
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    /// Release year.
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    /// Content rating (e.g. `PG-13`).
    #[serde(rename = "Rated", default)]
    pub rated: Option<String>,
    /// Release date.
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
    /// Runtime (e.g. `140 min`).
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    /// Comma-separated genres.
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    /// Director(s).
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    /// Writer(s).
    #[serde(rename = "Writer", default)]
    pub writer: Option<String>,
    /// Main cast.
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
    /// Plot summary.
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    /// Poster URL or `N/A`.
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    /// IMDb rating out of 10.
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    /// Box office gross.
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
    /// Media type.
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

impl OmdbTitleResponse {
    /// Returns `true` if OMDb reported a successful lookup.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response == RESPONSE_TRUE
    }
}

// --- Errors ---

/// Error body OMDb sends alongside non-2xx statuses (e.g. invalid API key).
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbErrorResponse {
    /// Always `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Error message.
    #[serde(rename = "Error")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_search_not_found_has_no_results() {
        // Arrange
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;

        // Act
        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!response.is_success());
        assert!(response.search.is_empty());
        assert_eq!(response.total_results(), None);
        assert_eq!(response.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_total_results_rejects_garbage() {
        // Arrange
        let json = r#"{"Response":"True","Search":[],"totalResults":"lots"}"#;

        // Act
        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.is_success());
        assert_eq!(response.total_results(), None);
    }

    #[test]
    fn test_title_failure_only_carries_error() {
        // Arrange
        let json = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;

        // Act
        let response: OmdbTitleResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!response.is_success());
        assert!(response.title.is_none());
        assert_eq!(response.error.as_deref(), Some("Incorrect IMDb ID."));
    }
}
