//! Async Scryfall client for card edition reference data.
//!
//! The inventory only needs one slice of Scryfall: the set (edition) list,
//! used to register reference rows for edition codes an import mentions for
//! the first time. This crate wraps those endpoints with a polite client-side
//! request gap and an explicit [`EditionCache`] for the full list.
//!
//! # Example
//!
//! ```no_run
//! use cardbox_scryfall::ScryfallClient;
//!
//! # async fn example() -> cardbox_scryfall::Result<()> {
//! let client = ScryfallClient::new();
//!
//! let set = client.set("m20").await?;
//! println!("{} released {}", set.name, set.released_at.as_deref().unwrap_or("?"));
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod error;

pub use cache::EditionCache;
pub use client::{ClientBuilder, ScryfallClient, Set};
pub use error::{Error, Result};
