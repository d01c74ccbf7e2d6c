//! Error types for the cardbox-scryfall crate.

use thiserror::Error;

/// The error type for Scryfall operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP/network error from reqwest.
    ///
    /// For connection issues, see [`Error::ConnectionRefused`].
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Scryfall returned an error payload.
    #[error("Scryfall error: {0}")]
    Api(String),

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection refused. The API host is unreachable, or a custom base URL
    /// points at nothing.
    #[error("could not connect to Scryfall")]
    ConnectionRefused,
}

/// A specialized Result type for Scryfall operations.
pub type Result<T> = std::result::Result<T, Error>;
