//! The CSV import workflow.
//!
//! This module strings the pipeline together: parse the vendor export,
//! resolve edition codes the inventory has never seen, collapse duplicate
//! rows, analyze against the current inventory, and (after an operator
//! confirmation) apply the resulting change set.
//!
//! # Example
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
//! let outcome = engine
//!     .import()
//!     .run(Path::new("export.csv"), resolver, prompter)?;
//! match outcome {
//!     Some(report) => println!("created {} cards", report.created),
//!     None => println!("nothing to do"),
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use cardbox::{Card, Edition, Store};
use tracing::{debug, info};

use crate::analyze::{analyze, ChangeSet};
use crate::apply::{apply, ApplyReport};
use crate::dedupe::dedupe;
use crate::error::{Error, Result};
use crate::parse::read_csv_file;
use crate::prompt::DecisionProvider;

/// Resolver for edition codes the inventory does not know yet.
///
/// An import may reference editions that have never been registered. Rather
/// than minting reference rows from a bare code, the engine asks this
/// collaborator for the full edition record. Failures surface as
/// [`Error::EditionLookup`] and abort the import before any write.
pub trait EditionResolver {
    fn resolve(&self, code: &str) -> Result<Edition>;
}

/// Import workflow engine.
#[derive(Debug)]
pub struct ImportEngine<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> ImportEngine<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Compute the change set for already-parsed cards without writing
    /// anything.
    ///
    /// Unknown edition codes are resolved and registered first; that is the
    /// one mutation this phase performs, since reference data must exist
    /// before cards referencing it can. Deck-allocation conflicts are
    /// resolved through `decisions` as they surface.
    pub fn plan(
        &self,
        cards: Vec<Card>,
        resolver: &dyn EditionResolver,
        decisions: &dyn DecisionProvider,
    ) -> Result<ChangeSet> {
        self.ensure_editions(&cards, resolver)?;

        let deduped = dedupe(cards);
        let existing = self.store.all_cards()?;
        debug!(
            imported = deduped.len(),
            existing = existing.len(),
            "analyzing import"
        );
        analyze(&deduped, &existing, decisions)
    }

    /// Apply a previously computed change set.
    pub fn commit(&self, changes: &ChangeSet) -> Result<ApplyReport> {
        apply(self.store, changes)
    }

    /// Run the full import: parse, plan, preview, confirm, commit.
    ///
    /// Returns `Ok(None)` when the import requires no changes. Declining the
    /// confirmation is a cancellation, so nothing is written and the caller
    /// sees [`Error::Cancelled`].
    pub fn run(
        &self,
        path: &Path,
        resolver: &dyn EditionResolver,
        decisions: &dyn DecisionProvider,
    ) -> Result<Option<ApplyReport>> {
        let cards = read_csv_file(path)?;
        if cards.is_empty() {
            info!(path = %path.display(), "export contains no rows");
            return Ok(None);
        }

        let changes = self.plan(cards, resolver, decisions)?;
        if changes.is_empty() {
            info!("inventory already matches the export");
            return Ok(None);
        }

        let proceed = decisions.confirm(&format!("Apply changes? {}", changes.preview()))?;
        if !proceed {
            return Err(Error::Cancelled);
        }

        let report = self.commit(&changes)?;
        info!(
            created = report.created,
            counts_updated = report.counts_updated,
            failures = report.failures.len(),
            "import applied"
        );
        Ok(Some(report))
    }

    /// Register every edition code the cards reference that the store does
    /// not know yet.
    fn ensure_editions(&self, cards: &[Card], resolver: &dyn EditionResolver) -> Result<()> {
        let known: BTreeSet<String> = self
            .store
            .editions()?
            .into_iter()
            .map(|e| e.code)
            .collect();

        let referenced: BTreeSet<String> = cards
            .iter()
            .map(|c| c.edition.to_lowercase())
            .collect();

        for code in referenced.difference(&known) {
            debug!(%code, "resolving unknown edition");
            let edition = resolver.resolve(code)?;
            self.store.register_edition(&edition)?;
        }
        Ok(())
    }
}
