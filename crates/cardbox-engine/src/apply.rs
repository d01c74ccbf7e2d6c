//! Applying a computed change set to the store.

use cardbox::Store;
use serde::Serialize;
use tracing::{debug, warn};

use crate::analyze::ChangeSet;
use crate::error::Result;

/// Post-commit summary of what was actually persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    /// Inventory rows created.
    pub created: usize,
    /// Owned counts updated.
    pub counts_updated: usize,
    /// Metadata references updated.
    pub ids_updated: usize,
    /// Owned copies removed from decks.
    pub removed_from_decks: usize,
    /// Owned copies converted to wishlisted.
    pub moved_to_wishlist: usize,
    /// Wishlisted copies converted to owned.
    pub moved_to_owned: usize,
    /// Mutations that failed; everything else was still applied.
    pub failures: Vec<ApplyFailure>,
}

/// One mutation that could not be applied.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyFailure {
    /// Description of the failed mutation.
    pub operation: String,
    /// The storage error message.
    pub error: String,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execute a [`ChangeSet`] as best-effort batches.
///
/// Lists run in dependency order: deck removals and wishlist conversions
/// before count decreases (so committed copies never exceed the owned count
/// mid-apply), wishlist-to-owned moves after count updates (they consume the
/// raised count). Individual failures are recorded and skipped; no
/// atomicity is promised across the lists, since every row they target was
/// identified before the first write.
pub fn apply<S: Store>(store: &S, changes: &ChangeSet) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    if !changes.inserts.is_empty() {
        match store.insert_cards(&changes.inserts) {
            Ok(ids) => report.created = ids.len(),
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!("insert {} cards", changes.inserts.len()),
                error: e.to_string(),
            }),
        }
    }

    for change in &changes.deck_removals {
        match store.remove_deck_usage(change.deck_id, change.card_id, change.amount) {
            Ok(()) => report.removed_from_decks += 1,
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!(
                    "remove {} {} from '{}'",
                    change.amount, change.card_name, change.deck_name
                ),
                error: e.to_string(),
            }),
        }
    }

    for change in &changes.to_wishlist {
        match store.move_owned_to_wishlist(change.deck_id, change.card_id, change.amount) {
            Ok(()) => report.moved_to_wishlist += 1,
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!(
                    "wishlist {} {} in '{}'",
                    change.amount, change.card_name, change.deck_name
                ),
                error: e.to_string(),
            }),
        }
    }

    for update in &changes.count_updates {
        match store.update_counts(&[(update.card_id, update.new_count)]) {
            Ok(()) => report.counts_updated += 1,
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!(
                    "set count of {} to {}",
                    update.card_name, update.new_count
                ),
                error: e.to_string(),
            }),
        }
    }

    for change in &changes.to_owned {
        match store.move_wishlist_to_owned(change.deck_id, change.card_id, change.amount) {
            Ok(()) => report.moved_to_owned += 1,
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!(
                    "acquire {} wishlisted {} in '{}'",
                    change.amount, change.card_name, change.deck_name
                ),
                error: e.to_string(),
            }),
        }
    }

    for update in &changes.id_updates {
        match store.update_scryfall_ids(&[(update.card_id, update.scryfall_id.clone())]) {
            Ok(()) => report.ids_updated += 1,
            Err(e) => report.failures.push(ApplyFailure {
                operation: format!("update metadata reference of {}", update.card_name),
                error: e.to_string(),
            }),
        }
    }

    if report.failures.is_empty() {
        debug!(
            created = report.created,
            counts = report.counts_updated,
            "change set applied"
        );
    } else {
        warn!(failures = report.failures.len(), "change set partially applied");
    }

    Ok(report)
}
