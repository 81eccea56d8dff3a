//! Application configuration module.
//!
//! Manages the TOML config file holding the OMDb credentials and the
//! search behavior settings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, OmdbConfig, SearchSettings, parse_media_type};
pub use paths::resolve_config_path;
