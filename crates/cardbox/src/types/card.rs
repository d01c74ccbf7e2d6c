//! Card records and the printing-identity key.

use serde::{Deserialize, Serialize};

/// Special-print variant flags for a physical card.
///
/// All flags participate in printing identity: a foil and a non-foil copy of
/// the same card are different inventory rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrintFlags {
    pub foil: bool,
    pub signed: bool,
    pub artist_proof: bool,
    pub altered_art: bool,
    pub misprint: bool,
    pub promo: bool,
    pub textless: bool,
}

impl PrintFlags {
    /// Short human-readable summary, e.g. `"foil, signed"`. Empty when no
    /// flag is set.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.foil {
            parts.push("foil");
        }
        if self.signed {
            parts.push("signed");
        }
        if self.artist_proof {
            parts.push("artist proof");
        }
        if self.altered_art {
            parts.push("altered");
        }
        if self.misprint {
            parts.push("misprint");
        }
        if self.promo {
            parts.push("promo");
        }
        if self.textless {
            parts.push("textless");
        }
        parts.join(", ")
    }
}

/// A single printing-level inventory record.
///
/// Two cards with identical printing attributes but different counts are the
/// same card in different quantity; see [`Card::identity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Row id; `None` until the card has been persisted.
    pub id: Option<i64>,
    /// Card name.
    pub name: String,
    /// Edition (set) code, e.g. `"lea"`.
    pub edition: String,
    /// Collector number within the edition.
    pub number: String,
    /// Condition code (`"NM"`, `"LP"`, ...).
    pub condition: String,
    /// Language code (`"en"`, `"ja"`, ...).
    pub language: String,
    /// Special-print flags.
    pub flags: PrintFlags,
    /// Opaque id for print variants not representable by the other fields.
    pub printing_id: String,
    /// Free-form note for print variants.
    pub printing_note: String,
    /// External metadata reference (Scryfall id), if known.
    pub scryfall_id: Option<String>,
    /// Number of owned copies.
    pub count: u32,
}

impl Card {
    /// Create a card with defaults suitable for building up in tests and
    /// single-card CLI operations.
    pub fn new(name: impl Into<String>, edition: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            edition: edition.into(),
            number: String::new(),
            condition: "NM".to_string(),
            language: "en".to_string(),
            flags: PrintFlags::default(),
            printing_id: String::new(),
            printing_note: String::new(),
            scryfall_id: None,
            count: 1,
        }
    }

    /// Set the owned count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the collector number.
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    /// Set the condition code.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    /// Project this card onto its printing-identity key.
    ///
    /// The key covers every attribute that distinguishes one physical
    /// printing from another and excludes `id`, `count`, and `scryfall_id`.
    /// String fields other than the collector number and printing id are
    /// case-folded.
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            name: fold(&self.name),
            edition: fold(&self.edition),
            number: self.number.clone(),
            condition: fold(&self.condition),
            language: fold(&self.language),
            flags: self.flags,
            printing_id: self.printing_id.clone(),
            printing_note: fold(&self.printing_note),
        }
    }

    /// Field-by-field identity comparison, cheapest discriminators first,
    /// so a scan over the inventory rejects non-matches early without
    /// building keys.
    pub fn same_printing(&self, other: &Card) -> bool {
        fold_eq(&self.name, &other.name)
            && fold_eq(&self.edition, &other.edition)
            && self.number == other.number
            && fold_eq(&self.condition, &other.condition)
            && fold_eq(&self.language, &other.language)
            && self.flags == other.flags
            && self.printing_id == other.printing_id
            && fold_eq(&self.printing_note, &other.printing_note)
    }

    /// Human-readable one-liner for previews and prompts,
    /// e.g. `"Llanowar Elves [LEA 210] (NM, en) foil"`.
    pub fn display_name(&self) -> String {
        let mut s = format!("{} [{}", self.name, self.edition.to_uppercase());
        if !self.number.is_empty() {
            s.push(' ');
            s.push_str(&self.number);
        }
        s.push_str(&format!("] ({}, {})", self.condition, self.language));
        let flags = self.flags.summary();
        if !flags.is_empty() {
            s.push(' ');
            s.push_str(&flags);
        }
        if !self.printing_note.is_empty() {
            s.push_str(&format!(" \"{}\"", self.printing_note));
        }
        s
    }
}

/// Composite equality key over a card's printing attributes.
///
/// Two [`Card`] records denote the same physical printing iff their keys are
/// equal. Record id, owned count, and the external metadata reference never
/// influence the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    name: String,
    edition: String,
    number: String,
    condition: String,
    language: String,
    flags: PrintFlags,
    printing_id: String,
    printing_note: String,
}

// Full Unicode lowercasing: accented card names ("Lim-Dûl's Vault") must not
// split into distinct identities depending on how the source cased them.
fn fold(s: &str) -> String {
    s.to_lowercase()
}

fn fold_eq(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}
