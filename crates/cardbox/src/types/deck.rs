//! Deck, usage, and inventory-snapshot types.

use serde::{Deserialize, Serialize};

use crate::types::card::Card;

/// Lifecycle state of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeckState {
    /// The deck exists only on paper; its cards sit in the collection.
    BrokenDown,
    /// The deck is partially assembled.
    Partial,
    /// The deck is fully assembled.
    Complete,
}

impl DeckState {
    /// Stable textual form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeckState::BrokenDown => "broken-down",
            DeckState::Partial => "partial",
            DeckState::Complete => "complete",
        }
    }

    /// Parse the database form.
    pub fn parse(s: &str) -> Option<DeckState> {
        match s {
            "broken-down" => Some(DeckState::BrokenDown),
            "partial" => Some(DeckState::Partial),
            "complete" => Some(DeckState::Complete),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of deck states whose owned usages count as "in use" when
/// computing how many copies of a card are free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InUseStates(Vec<DeckState>);

impl InUseStates {
    pub fn new(states: impl Into<Vec<DeckState>>) -> Self {
        Self(states.into())
    }

    pub fn contains(&self, state: DeckState) -> bool {
        self.0.contains(&state)
    }
}

impl Default for InUseStates {
    /// Complete and partial decks hold their cards; broken-down decks are
    /// lists only.
    fn default() -> Self {
        Self(vec![DeckState::Complete, DeckState::Partial])
    }
}

/// A named deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    /// Unique deck name.
    pub name: String,
    pub state: DeckState,
}

/// The relationship between one card and one deck: how many copies are
/// physically assigned (`count`) and how many are desired but not owned
/// (`wishlist_count`). At most one usage exists per (deck, card) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub deck_id: i64,
    /// Deck name, denormalized into the snapshot for display and prompts.
    pub deck_name: String,
    pub deck_state: DeckState,
    pub count: u32,
    pub wishlist_count: u32,
}

/// One card plus all of its deck usages: the unit of an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    pub card: Card,
    pub usages: Vec<Usage>,
}

impl CardEntry {
    /// Total owned copies committed to decks. The store invariant is that
    /// this never exceeds `card.count`; the import reconciliation engine
    /// exists to preserve it when counts shrink.
    pub fn total_used_in_decks(&self) -> u32 {
        self.usages.iter().map(|u| u.count).sum()
    }

    /// Total wishlisted copies across all decks.
    pub fn total_wishlisted(&self) -> u32 {
        self.usages.iter().map(|u| u.wishlist_count).sum()
    }

    /// Owned copies committed to decks in an in-use state.
    pub fn in_use(&self, states: &InUseStates) -> u32 {
        self.usages
            .iter()
            .filter(|u| states.contains(u.deck_state))
            .map(|u| u.count)
            .sum()
    }

    /// Copies not committed to any in-use deck.
    pub fn free(&self, states: &InUseStates) -> u32 {
        self.card.count.saturating_sub(self.in_use(states))
    }

    /// A zero-count card with no remaining usages can be deleted; whether it
    /// actually is remains a caller decision.
    pub fn is_deletable(&self) -> bool {
        self.card.count == 0
            && self
                .usages
                .iter()
                .all(|u| u.count == 0 && u.wishlist_count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CardEntry {
        CardEntry {
            card: Card::new("Counterspell", "7ed").with_count(4),
            usages: vec![
                Usage {
                    deck_id: 1,
                    deck_name: "Control".to_string(),
                    deck_state: DeckState::Complete,
                    count: 3,
                    wishlist_count: 0,
                },
                Usage {
                    deck_id: 2,
                    deck_name: "Budget".to_string(),
                    deck_state: DeckState::BrokenDown,
                    count: 1,
                    wishlist_count: 2,
                },
            ],
        }
    }

    #[test]
    fn usage_totals() {
        let e = entry();
        assert_eq!(e.total_used_in_decks(), 4);
        assert_eq!(e.total_wishlisted(), 2);
    }

    #[test]
    fn free_copies_respect_in_use_states() {
        let e = entry();
        let default = InUseStates::default();
        assert_eq!(e.in_use(&default), 3);
        assert_eq!(e.free(&default), 1);

        let all = InUseStates::new(vec![
            DeckState::BrokenDown,
            DeckState::Partial,
            DeckState::Complete,
        ]);
        assert_eq!(e.free(&all), 0);
    }
}
