//! Deck-allocation resolution for ambiguous count changes.
//!
//! When an import shrinks a card's owned count below what its decks already
//! hold, the data cannot say which deck gives up copies, or whether a pulled
//! copy should stay on that deck's wishlist. Symmetrically, a count increase
//! can satisfy existing wishlist entries. Both flows walk the operator
//! through the allocation deck by deck via the [`DecisionProvider`] port.

use cardbox::CardEntry;
use tracing::warn;

use crate::analyze::{card_row_id, DeckChange};
use crate::error::Result;
use crate::prompt::DecisionProvider;

/// Outcome of a decrease-mode resolution: copies leaving decks outright and
/// copies converting to wishlisted.
#[derive(Debug, Clone, Default)]
pub struct DecreaseResolution {
    pub removals: Vec<DeckChange>,
    pub conversions: Vec<DeckChange>,
}

/// Resolve an owned-count decrease against existing deck commitments.
///
/// The deficit is `total_used_in_decks() - new_count`. Each round the
/// operator picks one deck that still holds owned copies, chooses how many
/// to remove outright and how many of the remainder to convert to that
/// deck's wishlist. A round that handles zero copies makes no progress and
/// is rejected. Guarantees on return: removals plus conversions sum to
/// exactly the deficit, and no deck's owned usage goes negative.
pub fn resolve_decrease(
    entry: &CardEntry,
    new_count: u32,
    decisions: &dyn DecisionProvider,
) -> Result<DecreaseResolution> {
    let card_id = card_row_id(&entry.card)?;
    let card_name = entry.card.name.clone();
    let mut deficit = entry.total_used_in_decks().saturating_sub(new_count);
    let mut resolution = DecreaseResolution::default();

    let mut candidates: Vec<_> = entry
        .usages
        .iter()
        .filter(|u| u.count > 0)
        .cloned()
        .collect();

    while deficit > 0 {
        let options: Vec<String> = candidates
            .iter()
            .map(|u| format!("{} ({} owned)", u.deck_name, u.count))
            .collect();
        let idx = decisions.select(
            &format!(
                "{} copies of {} exceed the new count of {}; pick a deck to adjust",
                deficit,
                entry.card.display_name(),
                new_count
            ),
            &options,
        )?;
        let usage = &mut candidates[idx];

        let removable = deficit.min(usage.count);
        let remove = decisions.prompt_amount(
            &format!("Copies to remove from '{}'", usage.deck_name),
            0,
            removable,
        )?;
        let remainder = removable - remove;
        let convert = if remainder > 0 {
            decisions.prompt_amount(
                &format!("Copies to move to the '{}' wishlist", usage.deck_name),
                0,
                remainder,
            )?
        } else {
            0
        };

        if remove + convert == 0 {
            // A zero round would loop forever; make the operator pick again.
            warn!(deck = %usage.deck_name, "round handled no copies, asking again");
            continue;
        }

        usage.count -= remove + convert;
        deficit -= remove + convert;

        if remove > 0 {
            resolution.removals.push(DeckChange {
                deck_id: usage.deck_id,
                deck_name: usage.deck_name.clone(),
                card_id,
                card_name: card_name.clone(),
                amount: remove,
            });
        }
        if convert > 0 {
            // The conversion amount, not the removal amount, is what moves
            // onto the wishlist.
            resolution.conversions.push(DeckChange {
                deck_id: usage.deck_id,
                deck_name: usage.deck_name.clone(),
                card_id,
                card_name: card_name.clone(),
                amount: convert,
            });
        }

        if usage.count == 0 {
            candidates.remove(idx);
        }
    }

    Ok(resolution)
}

/// Resolve an owned-count increase against existing wishlist entries.
///
/// With increase `I` and total wishlisted `W`, up to `M = min(I, W)` copies
/// can move from wishlists to owned, gated by one confirmation. Allocation
/// is automatic when only one deck wishlists the card or when the deck
/// wishlists sum to exactly `M`; otherwise the operator is asked deck by
/// deck until the running total is spent. The moved total never exceeds `M`.
pub fn resolve_increase(
    entry: &CardEntry,
    increase: u32,
    decisions: &dyn DecisionProvider,
) -> Result<Vec<DeckChange>> {
    let card_id = card_row_id(&entry.card)?;
    let card_name = entry.card.name.clone();
    let wishlisted = entry.total_wishlisted();
    let target = increase.min(wishlisted);
    if target == 0 {
        return Ok(Vec::new());
    }

    let proceed = decisions.confirm(&format!(
        "{} gained {} copies and has {} wishlisted; move {} to owned?",
        entry.card.display_name(),
        increase,
        wishlisted,
        target
    ))?;
    if !proceed {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<_> = entry
        .usages
        .iter()
        .filter(|u| u.wishlist_count > 0)
        .cloned()
        .collect();

    let deck_change = |usage: &cardbox::Usage, amount: u32| DeckChange {
        deck_id: usage.deck_id,
        deck_name: usage.deck_name.clone(),
        card_id,
        card_name: card_name.clone(),
        amount,
    };

    // One wishlisting deck: it takes the whole move.
    if candidates.len() == 1 {
        return Ok(vec![deck_change(&candidates[0], target)]);
    }

    // Wishlists sum to exactly the move amount: every deck is satisfied in
    // full, nothing to ask.
    if wishlisted == target {
        return Ok(candidates
            .iter()
            .map(|u| deck_change(u, u.wishlist_count))
            .collect());
    }

    // Ambiguous split: ask per deck, cycling until the total is spent.
    let mut moves = Vec::new();
    let mut remaining = target;
    let mut idx = 0;
    while remaining > 0 && !candidates.is_empty() {
        if idx >= candidates.len() {
            idx = 0;
        }
        let usage = &mut candidates[idx];
        let cap = remaining.min(usage.wishlist_count);
        let amount = decisions.prompt_amount(
            &format!(
                "Wishlisted copies to move to owned in '{}' ({} remaining)",
                usage.deck_name, remaining
            ),
            0,
            cap,
        )?;
        if amount > 0 {
            usage.wishlist_count -= amount;
            remaining -= amount;
            moves.push(deck_change(usage, amount));
        }
        if usage.wishlist_count == 0 {
            candidates.remove(idx);
        } else {
            idx += 1;
        }
    }

    Ok(moves)
}
