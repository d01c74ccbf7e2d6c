//! Error types for cardbox-engine.
//!
//! Engine errors fall into three categories:
//!
//! 1. **Storage errors**, wrapped from [`cardbox::Error`]
//! 2. **Data conflicts**: import data that cannot be reconciled with the
//!    current inventory (unknown vocabulary, malformed rows)
//! 3. **Cancellation**: the operator declined at an interactive prompt
//!
//! Any error raised during the analysis phase aborts the whole import before
//! a single write happens. Errors during the apply phase are collected per
//! item into the report instead; see [`crate::apply`].

use thiserror::Error;

/// Result type for cardbox-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during engine workflows.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying store.
    #[error(transparent)]
    Store(#[from] cardbox::Error),

    /// Import data cannot be reconciled with the inventory's vocabulary or
    /// shape. Aborts the import before any mutation.
    #[error("import conflict: {0}")]
    Conflict(String),

    /// The operator cancelled an interactive flow. The enclosing operation
    /// is abandoned entirely; no partial mutations are produced.
    #[error("cancelled by operator")]
    Cancelled,

    /// An unknown edition code could not be resolved through the reference
    /// data service.
    #[error("could not resolve edition '{code}': {reason}")]
    EditionLookup { code: String, reason: String },

    /// A CSV read error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
