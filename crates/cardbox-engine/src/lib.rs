//! Reconciliation workflows for a card inventory.
//!
//! This crate builds the high-level workflows on top of the [`cardbox`]
//! storage layer: importing a vendor CSV export and reconciling it with the
//! current inventory, merging duplicate inventory rows, and single-card
//! adjustments. While `cardbox` answers "what is in the collection",
//! `cardbox-engine` answers "what has to change".
//!
//! All analysis is side-effect-free until an explicit commit; interactive
//! decisions flow through the [`DecisionProvider`] port, so the workflows
//! run the same against a terminal or a scripted test double.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cardbox::SqliteStore;
//! use cardbox_engine::{DecisionProvider, EditionResolver, Engine};
//!
//! # fn example(
//! #     resolver: &dyn EditionResolver,
//! #     prompter: &dyn DecisionProvider,
//! # ) -> cardbox_engine::Result<()> {
//! let store = SqliteStore::open(Path::new("collection.db"))?;
//! let engine = Engine::new(store);
//!
//! if let Some(report) = engine
//!     .import()
//!     .run(Path::new("export.csv"), resolver, prompter)?
//! {
//!     println!("created {} cards", report.created);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub mod analyze;
pub mod apply;
pub mod dedupe;
pub mod import;
pub mod inventory;
pub mod maintain;
pub mod parse;
pub mod prompt;
pub mod resolve;

pub use analyze::{analyze, ChangePreview, ChangeSet, CountUpdate, DeckChange, ScryfallIdUpdate};
pub use apply::{apply, ApplyFailure, ApplyReport};
pub use dedupe::dedupe;
pub use error::{Error, Result};
pub use import::{EditionResolver, ImportEngine};
pub use inventory::{AddOutcome, InventoryEngine, RemoveOutcome};
pub use maintain::{MaintenanceEngine, MergePlan, MergeReport};
pub use parse::{read_csv, read_csv_file};
pub use prompt::DecisionProvider;
pub use resolve::{resolve_decrease, resolve_increase, DecreaseResolution};

use cardbox::Store;

/// High-level workflow engine over one store.
///
/// The engine owns the store and hands out workflow sub-engines that borrow
/// it for the duration of one operation.
///
/// # Example
///
/// ```no_run
/// use cardbox::MemoryStore;
/// use cardbox_engine::Engine;
///
/// # fn example() -> cardbox_engine::Result<()> {
/// let engine = Engine::new(MemoryStore::new());
///
/// let plan = engine.maintenance().plan()?;
/// if plan.is_empty() {
///     println!("no duplicate rows");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Engine<S: Store> {
    store: S,
}

impl<S: Store> Engine<S> {
    /// Create an engine over a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The CSV import workflow.
    pub fn import(&self) -> ImportEngine<'_, S> {
        ImportEngine::new(&self.store)
    }

    /// The duplicate-row maintenance workflow.
    pub fn maintenance(&self) -> MaintenanceEngine<'_, S> {
        MaintenanceEngine::new(&self.store)
    }

    /// Single-card adjustments.
    pub fn inventory(&self) -> InventoryEngine<'_, S> {
        InventoryEngine::new(&self.store)
    }

    /// Direct store access when the workflows do not fit.
    pub fn store(&self) -> &S {
        &self.store
    }
}
