//! Common test utilities for cardbox-engine workflow tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use cardbox::{Card, CardEntry, DeckState, Edition, MemoryStore, Store, Usage};
use cardbox_engine::{DecisionProvider, EditionResolver, Error, Result};

/// A scripted [`DecisionProvider`]: answers come from queues loaded up front,
/// and an exhausted queue behaves like the operator walking away.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    confirms: RefCell<VecDeque<bool>>,
    selections: RefCell<VecDeque<usize>>,
    amounts: RefCell<VecDeque<u32>>,
}

#[allow(dead_code)]
impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(self, answer: bool) -> Self {
        self.confirms.borrow_mut().push_back(answer);
        self
    }

    pub fn select(self, index: usize) -> Self {
        self.selections.borrow_mut().push_back(index);
        self
    }

    pub fn amount(self, amount: u32) -> Self {
        self.amounts.borrow_mut().push_back(amount);
        self
    }

    /// True once every scripted answer has been consumed.
    pub fn exhausted(&self) -> bool {
        self.confirms.borrow().is_empty()
            && self.selections.borrow().is_empty()
            && self.amounts.borrow().is_empty()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or(Error::Cancelled)
    }

    fn select(&self, _prompt: &str, options: &[String]) -> Result<usize> {
        let index = self
            .selections
            .borrow_mut()
            .pop_front()
            .ok_or(Error::Cancelled)?;
        assert!(index < options.len(), "scripted selection out of range");
        Ok(index)
    }

    fn prompt_amount(&self, _prompt: &str, min: u32, max: u32) -> Result<u32> {
        let amount = self
            .amounts
            .borrow_mut()
            .pop_front()
            .ok_or(Error::Cancelled)?;
        assert!(
            (min..=max).contains(&amount),
            "scripted amount {amount} outside {min}..={max}"
        );
        Ok(amount)
    }
}

/// A decision provider that should never be consulted.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct NoDecisions;

impl DecisionProvider for NoDecisions {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        panic!("unexpected confirm: {prompt}");
    }

    fn select(&self, prompt: &str, _options: &[String]) -> Result<usize> {
        panic!("unexpected select: {prompt}");
    }

    fn prompt_amount(&self, prompt: &str, _min: u32, _max: u32) -> Result<u32> {
        panic!("unexpected amount prompt: {prompt}");
    }
}

/// An [`EditionResolver`] that fabricates a record for any code.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct AnyEdition;

impl EditionResolver for AnyEdition {
    fn resolve(&self, code: &str) -> Result<Edition> {
        Ok(Edition {
            code: code.to_string(),
            name: format!("Edition {code}"),
            released_at: None,
        })
    }
}

/// A persisted card with a chosen row id, for building snapshots by hand.
#[allow(dead_code)]
pub fn stored_card(id: i64, name: &str, count: u32) -> Card {
    let mut card = Card::new(name, "m20").with_count(count);
    card.id = Some(id);
    card
}

/// A usage row against an in-use deck.
#[allow(dead_code)]
pub fn usage(deck_id: i64, deck_name: &str, count: u32, wishlist_count: u32) -> Usage {
    Usage {
        deck_id,
        deck_name: deck_name.to_string(),
        deck_state: DeckState::Complete,
        count,
        wishlist_count,
    }
}

#[allow(dead_code)]
pub fn entry(card: Card, usages: Vec<Usage>) -> CardEntry {
    CardEntry { card, usages }
}

/// A store seeded with cards and their deck usages.
///
/// `usages` entries are `(deck_name, card_index, count, wishlist_count)`,
/// indexing into `cards`. Decks are created on first mention.
#[allow(dead_code)]
pub fn seeded_store(cards: &[Card], usages: &[(&str, usize, u32, u32)]) -> MemoryStore {
    let store = MemoryStore::new();
    let ids = store.insert_cards(cards).expect("seed cards");

    let mut decks: Vec<(String, i64)> = Vec::new();
    for (deck_name, card_index, count, wishlist_count) in usages {
        let deck_id = match decks.iter().find(|(name, _)| name == deck_name) {
            Some((_, id)) => *id,
            None => {
                let deck = store
                    .create_deck(deck_name, DeckState::Complete)
                    .expect("seed deck");
                decks.push((deck_name.to_string(), deck.id));
                deck.id
            }
        };
        store
            .upsert_usage(deck_id, ids[*card_index], *count, *wishlist_count)
            .expect("seed usage");
    }

    store
}
