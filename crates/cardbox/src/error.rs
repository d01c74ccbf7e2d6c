//! Error types for the cardbox crate.

use thiserror::Error;

/// The error type for storage and domain operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A lookup that must succeed found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A lookup that must return at most one row found several.
    ///
    /// This indicates a broken structural invariant (e.g. two usage rows for
    /// the same deck/card pair) and is treated as fatal, not user-facing.
    #[error("multiple rows found for {0}")]
    MultipleFound(String),

    /// A mutation asked for more copies than the target row holds.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An underlying SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for cardbox operations.
pub type Result<T> = std::result::Result<T, Error>;
