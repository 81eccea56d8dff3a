//! Domain records shared by the favorites store and the search controller.

use cinefav_api::omdb::{NOT_AVAILABLE, OmdbSearchItem, OmdbTitleResponse};
use serde::{Deserialize, Serialize};

/// Treats blank strings and OMDb's `N/A` placeholder as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != NOT_AVAILABLE)
}

/// Returns the poster URL if it points somewhere.
fn poster_of(url: &str) -> Option<&str> {
    (!url.trim().is_empty() && url != NOT_AVAILABLE).then_some(url)
}

/// A user-pinned movie record.
///
/// Serialized with the OMDb field names so collections written by earlier
/// clients of the same storage key stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    /// IMDb identifier, unique within the collection.
    #[serde(rename = "imdbID")]
    pub id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year")]
    pub year: String,
    /// Poster URL or `N/A`.
    #[serde(rename = "Poster")]
    pub poster_url: String,
    /// Media type, when known.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl FavoriteMovie {
    /// Returns the poster URL, or `None` when OMDb has no poster.
    #[must_use]
    pub fn poster(&self) -> Option<&str> {
        poster_of(&self.poster_url)
    }
}

/// A transient search result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// IMDb identifier. Not unique: OMDb pages can repeat entries.
    pub id: String,
    /// Title.
    pub title: String,
    /// Release year or range.
    pub year: String,
    /// Poster URL or `N/A`.
    pub poster_url: String,
    /// Media type.
    pub kind: Option<String>,
}

impl SearchResultItem {
    /// Returns the poster URL, or `None` when OMDb has no poster.
    #[must_use]
    pub fn poster(&self) -> Option<&str> {
        poster_of(&self.poster_url)
    }

    /// Copies the fields kept for a favorite.
    #[must_use]
    pub fn to_favorite(&self) -> FavoriteMovie {
        FavoriteMovie {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url: self.poster_url.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl From<OmdbSearchItem> for SearchResultItem {
    fn from(item: OmdbSearchItem) -> Self {
        Self {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: item.poster.unwrap_or_else(|| String::from(NOT_AVAILABLE)),
            kind: item.kind,
        }
    }
}

/// Full metadata for one title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieDetails {
    /// IMDb identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Content rating.
    pub rated: Option<String>,
    /// Release date.
    pub released: Option<String>,
    /// Runtime.
    pub runtime: Option<String>,
    /// Genres.
    pub genre: Option<String>,
    /// Director(s).
    pub director: Option<String>,
    /// Writer(s).
    pub writer: Option<String>,
    /// Main cast.
    pub actors: Option<String>,
    /// Plot summary.
    pub plot: Option<String>,
    /// Poster URL.
    pub poster_url: Option<String>,
    /// IMDb rating out of 10.
    pub imdb_rating: Option<String>,
    /// Box office gross.
    pub box_office: Option<String>,
    /// Media type.
    pub kind: Option<String>,
}

impl MovieDetails {
    /// Builds details from a successful title lookup.
    ///
    /// `requested_id` fills in the id when OMDb omits it.
    #[must_use]
    pub fn from_response(response: OmdbTitleResponse, requested_id: &str) -> Self {
        Self {
            id: present(response.imdb_id).unwrap_or_else(|| String::from(requested_id)),
            title: present(response.title).unwrap_or_default(),
            year: present(response.year).unwrap_or_default(),
            rated: present(response.rated),
            released: present(response.released),
            runtime: present(response.runtime),
            genre: present(response.genre),
            director: present(response.director),
            writer: present(response.writer),
            actors: present(response.actors),
            plot: present(response.plot),
            poster_url: present(response.poster),
            imdb_rating: present(response.imdb_rating),
            box_office: present(response.box_office),
            kind: present(response.kind),
        }
    }

    /// Copies the fields kept for a favorite.
    #[must_use]
    pub fn to_favorite(&self) -> FavoriteMovie {
        FavoriteMovie {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            poster_url: self
                .poster_url
                .clone()
                .unwrap_or_else(|| String::from(NOT_AVAILABLE)),
            kind: self.kind.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_favorite_uses_omdb_field_names() {
        // Arrange
        let favorite = FavoriteMovie {
            id: String::from("tt0372784"),
            title: String::from("Batman Begins"),
            year: String::from("2005"),
            poster_url: String::from("N/A"),
            kind: None,
        };

        // Act
        let json = serde_json::to_string(&favorite).unwrap();

        // Assert
        assert_eq!(
            json,
            r#"{"imdbID":"tt0372784","Title":"Batman Begins","Year":"2005","Poster":"N/A"}"#
        );
        assert!(favorite.poster().is_none());
    }

    #[test]
    fn test_favorite_reads_legacy_type_field() {
        // Arrange
        let json = r#"{"imdbID":"tt1","Title":"T","Year":"1999","Poster":"http://p","Type":"movie"}"#;

        // Act
        let favorite: FavoriteMovie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(favorite.kind.as_deref(), Some("movie"));
        assert_eq!(favorite.poster(), Some("http://p"));
    }

    #[test]
    fn test_details_drop_placeholders() {
        // Arrange
        let json = include_str!("../../../fixtures/omdb/title_tt0372784.json");
        let response: OmdbTitleResponse = serde_json::from_str(json).unwrap();

        // Act
        let details = MovieDetails::from_response(response, "tt0372784");
        let favorite = details.to_favorite();

        // Assert
        assert_eq!(details.title, "Batman Begins");
        assert_eq!(details.runtime.as_deref(), Some("140 min"));
        assert_eq!(favorite.id, "tt0372784");
        assert!(favorite.poster().is_some());
    }

    #[test]
    fn test_search_item_without_poster() {
        // Arrange
        let item = OmdbSearchItem {
            imdb_id: String::from("tt0060153"),
            title: String::from("Batman: The Movie"),
            year: String::from("1966"),
            kind: Some(String::from("movie")),
            poster: None,
        };

        // Act
        let row = SearchResultItem::from(item);

        // Assert
        assert_eq!(row.poster_url, "N/A");
        assert!(row.poster().is_none());
        assert_eq!(row.to_favorite().title, "Batman: The Movie");
    }
}
