//! Domain types and relational storage for a trading-card inventory.
//!
//! This crate is the substrate for the `cardbox` tool family. It defines the
//! inventory data model ([`Card`], [`Deck`], [`Usage`], [`CardEntry`]), the
//! printing-identity key used everywhere cards are matched against each other
//! ([`IdentityKey`]), and the [`Store`] contract with two implementations:
//! [`SqliteStore`] for the on-disk collection and [`MemoryStore`] for tests
//! and dry runs.
//!
//! Higher-level workflows (bulk import reconciliation, duplicate merging)
//! live in the `cardbox-engine` crate.
//!
//! # Example
//!
//! ```no_run
//! use cardbox::{Card, SqliteStore, Store};
//!
//! # fn example() -> cardbox::Result<()> {
//! let store = SqliteStore::open("collection.db")?;
//!
//! let card = Card::new("Llanowar Elves", "lea").with_count(4);
//! store.insert_cards(&[card])?;
//!
//! for entry in store.all_cards()? {
//!     println!("{} x{}", entry.card.display_name(), entry.card.count);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod store;
mod types;

pub use error::{Error, Result};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;
pub use store::Store;
pub use types::card::{Card, IdentityKey, PrintFlags};
pub use types::deck::{CardEntry, Deck, DeckState, InUseStates, Usage};
pub use types::edition::Edition;
