//! Request parameters for OMDb endpoints.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// Media type filter (`type=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// Feature films.
    #[default]
    Movie,
    /// TV series.
    Series,
    /// Single TV episodes.
    Episode,
}

impl MediaType {
    /// Returns the OMDb query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            "episode" => Ok(Self::Episode),
            other => bail!("unknown media type: {other} (expected movie, series or episode)"),
        }
    }
}

/// Plot length for title lookups (`plot=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotLength {
    /// One-paragraph summary.
    Short,
    /// Full plot.
    #[default]
    Full,
}

impl PlotLength {
    /// Returns the OMDb query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// Parameters for the `?s=` search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text title query (required).
    pub query: String,
    /// Result page (1-100, default: 1). OMDb returns 10 results per page.
    pub page: u32,
    /// Media type filter.
    pub media_type: Option<MediaType>,
    /// Release year filter.
    pub year: Option<u32>,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            media_type: None,
            year: None,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the media type filter.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Builds the query pairs (without the API key).
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("s", self.query.clone()), ("page", self.page.to_string())];
        if let Some(media_type) = self.media_type {
            query.push(("type", String::from(media_type.as_str())));
        }
        if let Some(year) = self.year {
            query.push(("y", year.to_string()));
        }
        query
    }
}

/// Parameters for the `?i=` title lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParams {
    /// IMDb identifier (required).
    pub imdb_id: String,
    /// Plot length.
    pub plot: PlotLength,
}

impl TitleParams {
    /// Creates new lookup params for the given IMDb id with the full plot.
    pub fn new(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            plot: PlotLength::Full,
        }
    }

    /// Sets the plot length.
    #[must_use]
    pub const fn plot(mut self, plot: PlotLength) -> Self {
        self.plot = plot;
        self
    }

    /// Builds the query pairs (without the API key).
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("i", self.imdb_id.clone()),
            ("plot", String::from(self.plot.as_str())),
        ]
    }
}
