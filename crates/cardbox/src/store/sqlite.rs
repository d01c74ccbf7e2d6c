//! SQLite-backed store.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::card::{Card, PrintFlags};
use crate::types::deck::{CardEntry, Deck, DeckState, Usage};
use crate::types::edition::Edition;

/// Database schema. `usages` carries the (deck, card) natural key; the
/// in-use invariant (sum of usage counts <= card count) is maintained by the
/// engine, not by the schema.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cards (
    id              INTEGER PRIMARY KEY,
    name            TEXT NOT NULL,
    edition         TEXT NOT NULL,
    number          TEXT NOT NULL DEFAULT '',
    condition       TEXT NOT NULL DEFAULT 'NM',
    language        TEXT NOT NULL DEFAULT 'en',
    foil            INTEGER NOT NULL DEFAULT 0,
    signed          INTEGER NOT NULL DEFAULT 0,
    artist_proof    INTEGER NOT NULL DEFAULT 0,
    altered_art     INTEGER NOT NULL DEFAULT 0,
    misprint        INTEGER NOT NULL DEFAULT 0,
    promo           INTEGER NOT NULL DEFAULT 0,
    textless        INTEGER NOT NULL DEFAULT 0,
    printing_id     TEXT NOT NULL DEFAULT '',
    printing_note   TEXT NOT NULL DEFAULT '',
    scryfall_id     TEXT,
    count           INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS decks (
    id              INTEGER PRIMARY KEY,
    name            TEXT NOT NULL UNIQUE,
    state           TEXT NOT NULL DEFAULT 'broken-down'
);

CREATE TABLE IF NOT EXISTS usages (
    deck_id         INTEGER NOT NULL REFERENCES decks(id),
    card_id         INTEGER NOT NULL REFERENCES cards(id),
    count           INTEGER NOT NULL DEFAULT 0,
    wishlist_count  INTEGER NOT NULL DEFAULT 0,
    UNIQUE(deck_id, card_id)
);

CREATE TABLE IF NOT EXISTS editions (
    code            TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    released_at     TEXT
);

CREATE INDEX IF NOT EXISTS ix_usages_card ON usages (card_id);
CREATE INDEX IF NOT EXISTS ix_cards_name ON cards (name);
"#;

const CARD_COLUMNS: &str = "id, name, edition, number, condition, language, \
     foil, signed, artist_proof, altered_art, misprint, promo, textless, \
     printing_id, printing_note, scryfall_id, count";

/// A [`Store`] over a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if necessary) a collection database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open a transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
        Ok(Card {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            edition: row.get(2)?,
            number: row.get(3)?,
            condition: row.get(4)?,
            language: row.get(5)?,
            flags: PrintFlags {
                foil: row.get(6)?,
                signed: row.get(7)?,
                artist_proof: row.get(8)?,
                altered_art: row.get(9)?,
                misprint: row.get(10)?,
                promo: row.get(11)?,
                textless: row.get(12)?,
            },
            printing_id: row.get(13)?,
            printing_note: row.get(14)?,
            scryfall_id: row.get(15)?,
            count: row.get::<_, i64>(16)? as u32,
        })
    }

    fn usages_for(&self, card_id: i64) -> Result<Vec<Usage>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.deck_id, d.name, d.state, u.count, u.wishlist_count
             FROM usages u JOIN decks d ON d.id = u.deck_id
             WHERE u.card_id = ? ORDER BY d.name",
        )?;
        let rows = stmt.query_map(params![card_id], Self::usage_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::from)
            .and_then(|raw| raw.into_iter().map(finish_usage).collect())
    }

    fn usage_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUsage> {
        Ok(RawUsage {
            deck_id: row.get(0)?,
            deck_name: row.get(1)?,
            deck_state: row.get(2)?,
            count: row.get::<_, i64>(3)? as u32,
            wishlist_count: row.get::<_, i64>(4)? as u32,
        })
    }

    /// Adjust one usage column by a signed delta, deleting the row when both
    /// counts hit zero.
    fn adjust_usage(
        &self,
        deck_id: i64,
        card_id: i64,
        owned_delta: i64,
        wishlist_delta: i64,
    ) -> Result<()> {
        let usage = self
            .usage(deck_id, card_id)?
            .ok_or_else(|| Error::NotFound(format!("usage (deck {deck_id}, card {card_id})")))?;

        let owned = usage.count as i64 + owned_delta;
        let wishlist = usage.wishlist_count as i64 + wishlist_delta;
        if owned < 0 || wishlist < 0 {
            return Err(Error::Conflict(format!(
                "usage (deck {deck_id}, card {card_id}) holds too few copies"
            )));
        }

        if owned == 0 && wishlist == 0 {
            self.delete_usage(deck_id, card_id)
        } else {
            self.conn.execute(
                "UPDATE usages SET count = ?, wishlist_count = ? WHERE deck_id = ? AND card_id = ?",
                params![owned, wishlist, deck_id, card_id],
            )?;
            Ok(())
        }
    }
}

struct RawUsage {
    deck_id: i64,
    deck_name: String,
    deck_state: String,
    count: u32,
    wishlist_count: u32,
}

fn finish_usage(raw: RawUsage) -> Result<Usage> {
    let deck_state = DeckState::parse(&raw.deck_state)
        .ok_or_else(|| Error::Conflict(format!("unknown deck state '{}'", raw.deck_state)))?;
    Ok(Usage {
        deck_id: raw.deck_id,
        deck_name: raw.deck_name,
        deck_state,
        count: raw.count,
        wishlist_count: raw.wishlist_count,
    })
}

fn finish_deck(id: i64, name: String, state: String) -> Result<Deck> {
    let state = DeckState::parse(&state)
        .ok_or_else(|| Error::Conflict(format!("unknown deck state '{state}'")))?;
    Ok(Deck { id, name, state })
}

impl Store for SqliteStore {
    fn all_cards(&self) -> Result<Vec<CardEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY id"))?;
        let cards = stmt
            .query_map([], Self::card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT u.card_id, u.deck_id, d.name, d.state, u.count, u.wishlist_count
             FROM usages u JOIN decks d ON d.id = u.deck_id ORDER BY d.name",
        )?;
        let usage_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    RawUsage {
                        deck_id: row.get(1)?,
                        deck_name: row.get(2)?,
                        deck_state: row.get(3)?,
                        count: row.get::<_, i64>(4)? as u32,
                        wishlist_count: row.get::<_, i64>(5)? as u32,
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut by_card: HashMap<i64, Vec<Usage>> = HashMap::new();
        for (card_id, raw) in usage_rows {
            by_card.entry(card_id).or_default().push(finish_usage(raw)?);
        }

        Ok(cards
            .into_iter()
            .map(|card| {
                let usages = card
                    .id
                    .and_then(|id| by_card.remove(&id))
                    .unwrap_or_default();
                CardEntry { card, usages }
            })
            .collect())
    }

    fn card(&self, id: i64) -> Result<CardEntry> {
        let card = self
            .conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?"),
                params![id],
                Self::card_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("card {id}")))?;
        let usages = self.usages_for(id)?;
        Ok(CardEntry { card, usages })
    }

    fn insert_cards(&self, cards: &[Card]) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO cards (name, edition, number, condition, language,
                 foil, signed, artist_proof, altered_art, misprint, promo, textless,
                 printing_id, printing_note, scryfall_id, count)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        let mut ids = Vec::with_capacity(cards.len());
        for card in cards {
            stmt.execute(params![
                card.name,
                card.edition,
                card.number,
                card.condition,
                card.language,
                card.flags.foil,
                card.flags.signed,
                card.flags.artist_proof,
                card.flags.altered_art,
                card.flags.misprint,
                card.flags.promo,
                card.flags.textless,
                card.printing_id,
                card.printing_note,
                card.scryfall_id,
                card.count as i64,
            ])?;
            ids.push(self.conn.last_insert_rowid());
        }
        debug!(count = ids.len(), "inserted cards");
        Ok(ids)
    }

    fn update_counts(&self, updates: &[(i64, u32)]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("UPDATE cards SET count = ? WHERE id = ?")?;
        for (id, count) in updates {
            let changed = stmt.execute(params![*count as i64, id])?;
            if changed == 0 {
                return Err(Error::NotFound(format!("card {id}")));
            }
        }
        Ok(())
    }

    fn update_scryfall_ids(&self, updates: &[(i64, Option<String>)]) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("UPDATE cards SET scryfall_id = ? WHERE id = ?")?;
        for (id, scryfall_id) in updates {
            let changed = stmt.execute(params![scryfall_id, id])?;
            if changed == 0 {
                return Err(Error::NotFound(format!("card {id}")));
            }
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
        let raw = self
            .conn
            .query_row(
                "SELECT u.deck_id, d.name, d.state, u.count, u.wishlist_count
                 FROM usages u JOIN decks d ON d.id = u.deck_id
                 WHERE u.deck_id = ? AND u.card_id = ?",
                params![deck_id, card_id],
                Self::usage_from_row,
            )
            .optional()?;
        raw.map(finish_usage).transpose()
    }

    fn upsert_usage(
        &self,
        deck_id: i64,
        card_id: i64,
        count: u32,
        wishlist_count: u32,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO usages (deck_id, card_id, count, wishlist_count)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(deck_id, card_id)
             DO UPDATE SET count = excluded.count, wishlist_count = excluded.wishlist_count",
            params![deck_id, card_id, count as i64, wishlist_count as i64],
        )?;
        Ok(())
    }

    fn delete_usage(&self, deck_id: i64, card_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM usages WHERE deck_id = ? AND card_id = ?",
            params![deck_id, card_id],
        )?;
        Ok(())
    }

    fn deck(&self, id: i64) -> Result<Deck> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, state FROM decks WHERE id = ?",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let (id, name, state): (i64, String, String) =
            row.ok_or_else(|| Error::NotFound(format!("deck {id}")))?;
        finish_deck(id, name, state)
    }

    fn decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, state FROM decks ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(id, name, state)| finish_deck(id, name, state))
            .collect()
    }

    fn create_deck(&self, name: &str, state: DeckState) -> Result<Deck> {
        self.conn.execute(
            "INSERT INTO decks (name, state) VALUES (?, ?)",
            params![name, state.as_str()],
        )?;
        Ok(Deck {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            state,
        })
    }

    fn delete_card(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("card {id}")));
        }
        Ok(())
    }

    fn editions(&self) -> Result<Vec<Edition>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code, name, released_at FROM editions ORDER BY code")?;
        let rows = stmt.query_map([], |row| {
            Ok(Edition {
                code: row.get(0)?,
                name: row.get(1)?,
                released_at: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::from)
    }

    fn register_edition(&self, edition: &Edition) -> Result<()> {
        self.conn.execute(
            "INSERT INTO editions (code, name, released_at) VALUES (?, ?, ?)
             ON CONFLICT(code) DO UPDATE SET name = excluded.name,
                 released_at = excluded.released_at",
            params![
                edition.code.to_lowercase(),
                edition.name,
                edition.released_at
            ],
        )?;
        Ok(())
    }
}
