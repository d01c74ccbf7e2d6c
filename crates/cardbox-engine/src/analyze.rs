//! The inventory matcher and change analyzer.
//!
//! For each deduplicated imported card, the analyzer finds at most one
//! matching inventory record by printing identity and classifies the action
//! required: a pure insert, a count update, a metadata-reference update, or
//! a count decrease that first needs deck-allocation surgery. It never
//! mutates anything itself; it computes a [`ChangeSet`] of intents that a
//! caller previews, confirms, and hands to [`crate::apply`].

use cardbox::{Card, CardEntry};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompt::DecisionProvider;
use crate::resolve::{resolve_decrease, resolve_increase};

/// A pending owned-count change for one inventory row.
#[derive(Debug, Clone, Serialize)]
pub struct CountUpdate {
    pub card_id: i64,
    pub card_name: String,
    pub old_count: u32,
    pub new_count: u32,
}

/// A pending metadata-reference change for one inventory row. `None` clears
/// the reference.
#[derive(Debug, Clone, Serialize)]
pub struct ScryfallIdUpdate {
    pub card_id: i64,
    pub card_name: String,
    pub scryfall_id: Option<String>,
}

/// A pending per-deck change: removing owned copies, converting owned copies
/// to wishlisted, or converting wishlisted copies to owned, depending on
/// which [`ChangeSet`] list it sits in.
#[derive(Debug, Clone, Serialize)]
pub struct DeckChange {
    pub deck_id: i64,
    pub deck_name: String,
    pub card_id: i64,
    pub card_name: String,
    pub amount: u32,
}

/// The full mutation set computed by one analysis pass. Nothing here has
/// been written yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeSet {
    /// Brand-new inventory rows.
    pub inserts: Vec<Card>,
    /// Owned-count updates.
    pub count_updates: Vec<CountUpdate>,
    /// Metadata-reference updates.
    pub id_updates: Vec<ScryfallIdUpdate>,
    /// Owned copies leaving a deck outright.
    pub deck_removals: Vec<DeckChange>,
    /// Owned copies converting to wishlisted within a deck.
    pub to_wishlist: Vec<DeckChange>,
    /// Wishlisted copies converting to owned within a deck.
    pub to_owned: Vec<DeckChange>,
}

impl ChangeSet {
    /// True when the import requires no mutation at all.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
            && self.count_updates.is_empty()
            && self.id_updates.is_empty()
            && self.deck_removals.is_empty()
            && self.to_wishlist.is_empty()
            && self.to_owned.is_empty()
    }

    /// Category counts for the pre-commit preview.
    pub fn preview(&self) -> ChangePreview {
        ChangePreview {
            inserts: self.inserts.len(),
            count_updates: self.count_updates.len(),
            id_updates: self.id_updates.len(),
            deck_removals: self.deck_removals.len(),
            to_wishlist: self.to_wishlist.len(),
            to_owned: self.to_owned.len(),
        }
    }
}

/// Human-readable summary of a [`ChangeSet`], shown before commit.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ChangePreview {
    pub inserts: usize,
    pub count_updates: usize,
    pub id_updates: usize,
    pub deck_removals: usize,
    pub to_wishlist: usize,
    pub to_owned: usize,
}

impl std::fmt::Display for ChangePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new cards, {} count updates, {} metadata updates, \
             {} deck removals, {} moves to wishlist, {} moves to owned",
            self.inserts,
            self.count_updates,
            self.id_updates,
            self.deck_removals,
            self.to_wishlist,
            self.to_owned
        )
    }
}

pub(crate) fn card_row_id(card: &Card) -> Result<i64> {
    card.id.ok_or_else(|| {
        Error::Store(cardbox::Error::NotFound(format!(
            "inventory row for {} has no id",
            card.display_name()
        )))
    })
}

/// Analyze a deduplicated import against the current inventory snapshot.
///
/// Matching is a linear scan with short-circuit field comparisons. That is
/// O(imported x existing) on purpose: a personal collection tops out in the
/// low thousands of rows, and the scan keeps the matcher free of index
/// bookkeeping. An identity-key hash index is a drop-in alternative if that
/// assumption ever breaks.
///
/// Count decreases that undercut existing deck commitments, and count
/// increases that could satisfy wishlisted copies, are resolved through
/// `decisions` mid-analysis; cancellation abandons the whole import.
pub fn analyze(
    imported: &[Card],
    existing: &[CardEntry],
    decisions: &dyn DecisionProvider,
) -> Result<ChangeSet> {
    let mut changes = ChangeSet::default();

    for card in imported {
        let matched = existing.iter().find(|e| e.card.same_printing(card));

        let Some(entry) = matched else {
            debug!(card = %card.display_name(), count = card.count, "new inventory entry");
            changes.inserts.push(card.clone());
            continue;
        };

        let card_id = card_row_id(&entry.card)?;

        if card.count > entry.card.count {
            changes.count_updates.push(CountUpdate {
                card_id,
                card_name: entry.card.name.clone(),
                old_count: entry.card.count,
                new_count: card.count,
            });
            if entry.total_wishlisted() > 0 {
                let increase = card.count - entry.card.count;
                changes
                    .to_owned
                    .extend(resolve_increase(entry, increase, decisions)?);
            }
        } else if card.count < entry.card.count {
            // Deck commitments must be reconciled before the shrink is safe.
            if entry.total_used_in_decks() > card.count {
                let resolution = resolve_decrease(entry, card.count, decisions)?;
                changes.deck_removals.extend(resolution.removals);
                changes.to_wishlist.extend(resolution.conversions);
            }
            changes.count_updates.push(CountUpdate {
                card_id,
                card_name: entry.card.name.clone(),
                old_count: entry.card.count,
                new_count: card.count,
            });
        } else if entry.card.scryfall_id == card.scryfall_id {
            debug!(card = %card.display_name(), "already consistent");
        }

        // Metadata branch, independent of the count branch. An empty
        // imported reference never clears an existing one.
        if let Some(new_ref) = card.scryfall_id.as_deref() {
            if !new_ref.is_empty() && entry.card.scryfall_id.as_deref() != Some(new_ref) {
                changes.id_updates.push(ScryfallIdUpdate {
                    card_id,
                    card_name: entry.card.name.clone(),
                    scryfall_id: Some(new_ref.to_string()),
                });
            }
        }
    }

    Ok(changes)
}
