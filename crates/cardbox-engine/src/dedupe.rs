//! Collapsing import rows that denote the same printing.
//!
//! A vendor export routinely lists the same printing more than once (one row
//! per purchase batch). Before matching against the inventory, those rows
//! are merged into one card per identity key with the counts summed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use cardbox::{Card, IdentityKey};
use tracing::debug;

/// Merge cards that share an identity key, summing counts.
///
/// Output preserves first-seen order and conserves the total count. Running
/// it on its own output is a no-op. An empty input yields an empty output.
pub fn dedupe(cards: Vec<Card>) -> Vec<Card> {
    let mut out: Vec<Card> = Vec::with_capacity(cards.len());
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();

    for card in cards {
        match index.entry(card.identity()) {
            Entry::Occupied(slot) => {
                let kept = &mut out[*slot.get()];
                debug!(
                    card = %kept.display_name(),
                    kept = kept.count,
                    merged = card.count,
                    "merging duplicate import row"
                );
                kept.count += card.count;
            }
            Entry::Vacant(slot) => {
                slot.insert(out.len());
                out.push(card);
            }
        }
    }

    out
}
