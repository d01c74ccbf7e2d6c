//! In-memory store for tests and dry runs.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::card::Card;
use crate::types::deck::{CardEntry, Deck, DeckState, Usage};
use crate::types::edition::Edition;

#[derive(Debug, Default)]
struct Inner {
    cards: Vec<Card>,
    decks: Vec<Deck>,
    // (deck_id, card_id) -> (count, wishlist_count)
    usages: HashMap<(i64, i64), (u32, u32)>,
    editions: Vec<Edition>,
    next_card_id: i64,
    next_deck_id: i64,
}

/// A [`Store`] held entirely in memory. Mirrors the SQLite store's
/// semantics, including usage-row deletion at zero and conflict errors on
/// over-removal.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RefCell<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn deck_of(inner: &Inner, deck_id: i64) -> Result<Deck> {
        inner
            .decks
            .iter()
            .find(|d| d.id == deck_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("deck {deck_id}")))
    }

    fn usages_of(inner: &Inner, card_id: i64) -> Result<Vec<Usage>> {
        let mut usages = Vec::new();
        for (&(deck_id, usage_card_id), &(count, wishlist_count)) in &inner.usages {
            if usage_card_id != card_id {
                continue;
            }
            let deck = Self::deck_of(inner, deck_id)?;
            usages.push(Usage {
                deck_id,
                deck_name: deck.name,
                deck_state: deck.state,
                count,
                wishlist_count,
            });
        }
        usages.sort_by(|a, b| a.deck_name.cmp(&b.deck_name));
        Ok(usages)
    }

    fn adjust_usage(
        &self,
        deck_id: i64,
        card_id: i64,
        owned_delta: i64,
        wishlist_delta: i64,
    ) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let key = (deck_id, card_id);
        let (count, wishlist) = *inner
            .usages
            .get(&key)
            .ok_or_else(|| Error::NotFound(format!("usage (deck {deck_id}, card {card_id})")))?;

        let owned = count as i64 + owned_delta;
        let wishlist = wishlist as i64 + wishlist_delta;
        if owned < 0 || wishlist < 0 {
            return Err(Error::Conflict(format!(
                "usage (deck {deck_id}, card {card_id}) holds too few copies"
            )));
        }

        if owned == 0 && wishlist == 0 {
            inner.usages.remove(&key);
        } else {
            inner.usages.insert(key, (owned as u32, wishlist as u32));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn all_cards(&self) -> Result<Vec<CardEntry>> {
        let inner = self.inner.borrow();
        inner
            .cards
            .iter()
            .map(|card| {
                let id = card.id.unwrap_or_default();
                Ok(CardEntry {
                    card: card.clone(),
                    usages: Self::usages_of(&inner, id)?,
                })
            })
            .collect()
    }

    fn card(&self, id: i64) -> Result<CardEntry> {
        let inner = self.inner.borrow();
        let card = inner
            .cards
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("card {id}")))?;
        Ok(CardEntry {
            card,
            usages: Self::usages_of(&inner, id)?,
        })
    }

    fn insert_cards(&self, cards: &[Card]) -> Result<Vec<i64>> {
        let mut inner = self.inner.borrow_mut();
        let mut ids = Vec::with_capacity(cards.len());
        for card in cards {
            inner.next_card_id += 1;
            let id = inner.next_card_id;
            let mut card = card.clone();
            card.id = Some(id);
            inner.cards.push(card);
            ids.push(id);
        }
        Ok(ids)
    }

    fn update_counts(&self, updates: &[(i64, u32)]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        for (id, count) in updates {
            let card = inner
                .cards
                .iter_mut()
                .find(|c| c.id == Some(*id))
                .ok_or_else(|| Error::NotFound(format!("card {id}")))?;
            card.count = *count;
        }
        Ok(())
    }

    fn update_scryfall_ids(&self, updates: &[(i64, Option<String>)]) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        for (id, scryfall_id) in updates {
            let card = inner
                .cards
                .iter_mut()
                .find(|c| c.id == Some(*id))
                .ok_or_else(|| Error::NotFound(format!("card {id}")))?;
            card.scryfall_id = scryfall_id.clone();
        }
        Ok(())
    }

    fn remove_deck_usage(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()> {
        self.adjust_usage(deck_id, card_id, -(amount as i64), 0)
    }

    fn move_owned_to_wishlist(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()> {
        self.adjust_usage(deck_id, card_id, -(amount as i64), amount as i64)
    }

    fn move_wishlist_to_owned(&self, deck_id: i64, card_id: i64, amount: u32) -> Result<()> {
        self.adjust_usage(deck_id, card_id, amount as i64, -(amount as i64))
    }

    fn usage(&self, deck_id: i64, card_id: i64) -> Result<Option<Usage>> {
        let inner = self.inner.borrow();
        match inner.usages.get(&(deck_id, card_id)) {
            None => Ok(None),
            Some(&(count, wishlist_count)) => {
                let deck = Self::deck_of(&inner, deck_id)?;
                Ok(Some(Usage {
                    deck_id,
                    deck_name: deck.name,
                    deck_state: deck.state,
                    count,
                    wishlist_count,
                }))
            }
        }
    }

    fn upsert_usage(
        &self,
        deck_id: i64,
        card_id: i64,
        count: u32,
        wishlist_count: u32,
    ) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner
            .usages
            .insert((deck_id, card_id), (count, wishlist_count));
        Ok(())
    }

    fn delete_usage(&self, deck_id: i64, card_id: i64) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.usages.remove(&(deck_id, card_id));
        Ok(())
    }

    fn deck(&self, id: i64) -> Result<Deck> {
        Self::deck_of(&self.inner.borrow(), id)
    }

    fn decks(&self) -> Result<Vec<Deck>> {
        let mut decks = self.inner.borrow().decks.clone();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(decks)
    }

    fn create_deck(&self, name: &str, state: DeckState) -> Result<Deck> {
        let mut inner = self.inner.borrow_mut();
        if inner.decks.iter().any(|d| d.name == name) {
            return Err(Error::Conflict(format!("deck '{name}' already exists")));
        }
        inner.next_deck_id += 1;
        let deck = Deck {
            id: inner.next_deck_id,
            name: name.to_string(),
            state,
        };
        inner.decks.push(deck.clone());
        Ok(deck)
    }

    fn delete_card(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let before = inner.cards.len();
        inner.cards.retain(|c| c.id != Some(id));
        if inner.cards.len() == before {
            return Err(Error::NotFound(format!("card {id}")));
        }
        Ok(())
    }

    fn editions(&self) -> Result<Vec<Edition>> {
        Ok(self.inner.borrow().editions.clone())
    }

    fn register_edition(&self, edition: &Edition) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let mut edition = edition.clone();
        edition.code = edition.code.to_lowercase();
        if let Some(existing) = inner.editions.iter_mut().find(|e| e.code == edition.code) {
            *existing = edition;
        } else {
            inner.editions.push(edition);
        }
        Ok(())
    }
}
