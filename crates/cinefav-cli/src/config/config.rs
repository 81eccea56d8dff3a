//! Settings file: `[omdb]` client options and `[search]` tuning.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cinefav_api::omdb::{DEFAULT_TIMEOUT, MediaType};
use cinefav_core::search::{DEFAULT_PAGE_SIZE, DEFAULT_SEED_QUERY};
use cinefav_core::SearchConfig;
use serde::{Deserialize, Serialize};

/// Everything read from `config.toml`.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
    /// Search behavior.
    #[serde(default)]
    pub search: SearchSettings,
}

/// OMDb connection settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OmdbConfig {
    /// API key. `OMDB_API_KEY` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
    /// Minimum interval between requests in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            min_interval_ms: 100,
        }
    }
}

impl OmdbConfig {
    /// Picks the API key: a non-blank `env_value` wins over the file.
    #[must_use]
    pub fn api_key(&self, env_value: Option<String>) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        env_value
            .filter(present)
            .or_else(|| self.api_key.clone().filter(present))
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Minimum interval between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Parses a media type filter; `all` means no filter.
///
/// # Errors
///
/// Returns an error if `value` is neither `all` nor a known media type.
pub fn parse_media_type(value: &str) -> Result<Option<MediaType>> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value.parse::<MediaType>().map(Some)
}

/// Search behavior settings.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period before a typed query is submitted, in milliseconds.
    pub debounce_ms: u64,
    /// Results per page.
    pub page_size: u32,
    /// Query shown while nothing has been typed.
    pub seed_query: String,
    /// `movie`, `series`, `episode`, or `all` for no filter.
    pub media_type: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            page_size: DEFAULT_PAGE_SIZE,
            seed_query: String::from(DEFAULT_SEED_QUERY),
            media_type: String::from("movie"),
        }
    }
}

impl SearchSettings {
    /// Builds the controller settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero, `seed_query` is blank, or
    /// `media_type` is unknown.
    pub fn to_search_config(&self) -> Result<SearchConfig> {
        if self.page_size == 0 {
            bail!("search.page_size must be at least 1");
        }
        if self.seed_query.trim().is_empty() {
            bail!("search.seed_query must not be blank");
        }
        let media_type =
            parse_media_type(&self.media_type).context("invalid search.media_type")?;

        Ok(SearchConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            page_size: self.page_size,
            seed_query: String::from(self.seed_query.trim()),
            media_type,
        })
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Writes the settings to `path` as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
