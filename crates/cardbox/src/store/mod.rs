//! Storage contract and implementations.

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::types::card::Card;
use crate::types::deck::{CardEntry, Deck, DeckState, Usage};
use crate::types::edition::Edition;

/// The storage contract the reconciliation engine drives.
///
/// All operations are synchronous and raise [`crate::Error::NotFound`] /
/// [`crate::Error::Conflict`] instead of returning sentinel values. No
/// atomicity is promised across calls; callers apply their mutation lists as
/// best-effort batches.
pub trait Store {
    /// Full inventory snapshot: every card with its usage list.
    fn all_cards(&self) -> Result<Vec<CardEntry>>;

    /// Fetch one card with its usages.
    fn card(&self, id: i64) -> Result<CardEntry>;

    /// Bulk insert. Returns the new row ids in input order.
    fn insert_cards(&self, cards: &[Card]) -> Result<Vec<i64>>;

    /// Bulk owned-count update, `(card_id, new_count)` pairs.
    fn update_counts(&self, updates: &[(i64, u32)]) -> Result<()>;

    /// Bulk metadata-reference update, `(card_id, new_ref)` pairs; `None`
    /// clears the reference.
    fn update_scryfall_ids(&self, updates: &[(i64, Option<String>)]) -> Result<()>;

    /// Remove `amount` owned copies of a card from a deck's usage. The usage
    /// row is deleted once both of its counts reach zero.
    fn remove_deck_usage(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()>;

    /// Convert `amount` owned copies in a deck to wishlisted copies.
    fn move_owned_to_wishlist(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()>;

    /// Convert `amount` wishlisted copies in a deck to owned copies.
    fn move_wishlist_to_owned(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()>;

    /// Look up the usage for a (deck, card) pair, if any.
    fn usage(&self, deck_id: i64, card_id: i64) -> Result<Option<Usage>>;

    /// Create or overwrite the usage for a (deck, card) pair.
    fn upsert_usage(
        &self,
        deck_id: i64,
        card_id: i64,
        count: u32,
        wishlist_count: u32,
    ) -> Result<()>;

    /// Delete the usage row for a (deck, card) pair.
    fn delete_usage(&self, deck_id: i64, card_id: i64) -> Result<()>;

    /// Fetch one deck.
    fn deck(&self, id: i64) -> Result<Deck>;

    /// All decks.
    fn decks(&self) -> Result<Vec<Deck>>;

    /// Create a deck with a unique name.
    fn create_deck(&self, name: &str, state: DeckState) -> Result<Deck>;

    /// Delete a card row. Callers must retarget or remove its usages first;
    /// see the maintenance scanner's merge ordering.
    fn delete_card(&self, id: i64) -> Result<()>;

    /// All registered editions.
    fn editions(&self) -> Result<Vec<Edition>>;

    /// Register (or refresh) an edition by code.
    fn register_edition(&self, edition: &Edition) -> Result<()>;
}
