//! Edition (set) reference data.

use serde::{Deserialize, Serialize};

/// A known edition. Registered from the metadata service the first time an
/// import references its code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
    /// Set code, e.g. `"lea"`. Stored lowercase.
    pub code: String,
    /// Full set name.
    pub name: String,
    /// Release date (`YYYY-MM-DD`) when the metadata service reports one.
    pub released_at: Option<String>,
}
