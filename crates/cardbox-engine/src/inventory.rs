//! Direct single-card adjustments outside the import flow.

use cardbox::{Card, Store};
use tracing::debug;

use crate::analyze::card_row_id;
use crate::error::Result;
use crate::prompt::DecisionProvider;
use crate::resolve::resolve_decrease;

/// What `add` did with the incoming card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// No existing row matched the printing; one was created.
    Created { card_id: i64 },
    /// An existing row matched; its count was raised.
    Incremented { card_id: i64, new_count: u32 },
}

/// Outcome of removing copies from an inventory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub card_id: i64,
    pub new_count: u32,
    /// True when the row is at zero copies with no deck usages left. The
    /// caller decides whether to actually delete it.
    pub deletable: bool,
}

/// Single-card workflow engine.
#[derive(Debug)]
pub struct InventoryEngine<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> InventoryEngine<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add copies of one card, merging into an existing row when the
    /// printing already exists.
    pub fn add(&self, card: Card) -> Result<AddOutcome> {
        let existing = self.store.all_cards()?;
        if let Some(entry) = existing.iter().find(|e| e.card.same_printing(&card)) {
            let card_id = card_row_id(&entry.card)?;
            let new_count = entry.card.count + card.count;
            self.store.update_counts(&[(card_id, new_count)])?;
            debug!(card = %card.display_name(), new_count, "raised existing row");
            return Ok(AddOutcome::Incremented { card_id, new_count });
        }

        let ids = self.store.insert_cards(std::slice::from_ref(&card))?;
        let card_id = ids.first().copied().ok_or_else(|| {
            cardbox::Error::NotFound(format!("no row created for {}", card.display_name()))
        })?;
        debug!(card = %card.display_name(), card_id, "created inventory row");
        Ok(AddOutcome::Created { card_id })
    }

    /// Remove `amount` owned copies from a row.
    ///
    /// When the removal undercuts existing deck commitments, the same
    /// decrease resolution as the import flow runs first, so decks never
    /// claim more copies than the inventory owns.
    pub fn remove_copies(
        &self,
        card_id: i64,
        amount: u32,
        decisions: &dyn DecisionProvider,
    ) -> Result<RemoveOutcome> {
        let entry = self.store.card(card_id)?;
        let new_count = entry.card.count.saturating_sub(amount);

        if entry.total_used_in_decks() > new_count {
            let resolution = resolve_decrease(&entry, new_count, decisions)?;
            for change in &resolution.removals {
                self.store
                    .remove_deck_usage(change.deck_id, change.card_id, change.amount)?;
            }
            for change in &resolution.conversions {
                self.store
                    .move_owned_to_wishlist(change.deck_id, change.card_id, change.amount)?;
            }
        }

        self.store.update_counts(&[(card_id, new_count)])?;

        let entry = self.store.card(card_id)?;
        Ok(RemoveOutcome {
            card_id,
            new_count,
            deletable: entry.is_deletable(),
        })
    }
}
