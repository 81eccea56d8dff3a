//! Error kinds surfaced to the presentation layer.

use thiserror::Error;

/// Failure of a search page or detail lookup.
///
/// Cloneable so it can live inside session snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network, timeout, HTTP status or decoding failure. Retryable.
    #[error("request failed, check your connection")]
    Transport {
        /// Underlying error chain, for logs.
        detail: String,
    },

    /// The API answered with an explicit no-match status.
    #[error("{message}")]
    NotFound {
        /// Human-readable message from the API (e.g. `Movie not found!`).
        message: String,
    },

    /// The identifier is not a well-formed IMDb id.
    #[error("invalid movie id: {id:?}")]
    InvalidId {
        /// The rejected identifier.
        id: String,
    },
}

impl FetchError {
    /// Wraps a transport-level error, keeping the full context chain.
    #[must_use]
    pub fn transport(err: &anyhow::Error) -> Self {
        Self::Transport {
            detail: format!("{err:#}"),
        }
    }

    /// Builds a not-found error, falling back to `default` when the API sent
    /// no message.
    #[must_use]
    pub fn not_found(message: Option<&str>, default: &str) -> Self {
        Self::NotFound {
            message: String::from(message.unwrap_or(default)),
        }
    }

    /// Returns `true` for transport failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` for explicit no-match responses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure of a favorites store operation.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// The key-value store could not be read or written.
    #[error("favorites storage failed: {0:#}")]
    Persistence(anyhow::Error),

    /// The persisted collection is not valid JSON of the expected shape.
    #[error("persisted favorites are corrupt: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The store has not been loaded yet, or has been closed.
    #[error("favorites store is not ready")]
    NotReady,
}
