//! Reading vendor CSV exports into cards.
//!
//! The input format is the card vendor's "collection export" CSV: one row per
//! purchase line, headers in the vendor's title-case vocabulary, counts as
//! plain integers and print flags as truthy strings. Rows are normalized into
//! [`Card`] values here; unknown condition or language vocabulary is a hard
//! error, since a silently-passed typo would mint a new printing identity.

use std::io::Read;
use std::path::Path;

use cardbox::{Card, PrintFlags};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// One raw row of the vendor export.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Count")]
    count: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Edition")]
    edition: String,
    #[serde(rename = "Card Number", default)]
    number: String,
    #[serde(rename = "Condition", default)]
    condition: String,
    #[serde(rename = "Language", default)]
    language: String,
    #[serde(rename = "Foil", default)]
    foil: String,
    #[serde(rename = "Signed", default)]
    signed: String,
    #[serde(rename = "Artist Proof", default)]
    artist_proof: String,
    #[serde(rename = "Altered Art", default)]
    altered_art: String,
    #[serde(rename = "Misprint", default)]
    misprint: String,
    #[serde(rename = "Promo", default)]
    promo: String,
    #[serde(rename = "Textless", default)]
    textless: String,
    #[serde(rename = "Printing Id", default)]
    printing_id: String,
    #[serde(rename = "Printing Note", default)]
    printing_note: String,
    #[serde(rename = "Scryfall ID", default)]
    scryfall_id: String,
}

/// Parse a vendor export file into cards, in row order.
pub fn read_csv_file(path: &Path) -> Result<Vec<Card>> {
    debug!(path = %path.display(), "reading vendor export");
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Parse a vendor export from any reader into cards, in row order.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Card>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cards = Vec::new();
    for (i, row) in csv_reader.deserialize::<ImportRow>().enumerate() {
        let row = row?;
        let card = card_from_row(row).map_err(|e| match e {
            Error::Conflict(msg) => Error::Conflict(format!("row {}: {msg}", i + 2)),
            other => other,
        })?;
        cards.push(card);
    }

    debug!(rows = cards.len(), "vendor export parsed");
    Ok(cards)
}

fn card_from_row(row: ImportRow) -> Result<Card> {
    let mut card = Card::new(&row.name, &row.edition).with_count(row.count);
    card.number = row.number;
    card.condition = normalize_condition(&row.condition)?;
    card.language = normalize_language(&row.language)?;
    card.flags = PrintFlags {
        foil: truthy(&row.foil),
        signed: truthy(&row.signed),
        artist_proof: truthy(&row.artist_proof),
        altered_art: truthy(&row.altered_art),
        misprint: truthy(&row.misprint),
        promo: truthy(&row.promo),
        textless: truthy(&row.textless),
    };
    card.printing_id = row.printing_id;
    card.printing_note = row.printing_note;
    card.scryfall_id = match row.scryfall_id.as_str() {
        "" => None,
        id => Some(id.to_string()),
    };
    Ok(card)
}

/// Map the vendor's condition vocabulary to the stored short codes.
fn normalize_condition(raw: &str) -> Result<String> {
    let code = match raw.to_lowercase().as_str() {
        "" => return Ok(String::new()),
        "mint" | "m" => "M",
        "near mint" | "nm" => "NM",
        "slightly played" | "sp" => "SP",
        "moderately played" | "mp" => "MP",
        "heavily played" | "hp" => "HP",
        "damaged" | "dmg" => "DMG",
        _ => return Err(Error::Conflict(format!("unknown condition '{raw}'"))),
    };
    Ok(code.to_string())
}

/// Map the vendor's language names to two-letter codes.
fn normalize_language(raw: &str) -> Result<String> {
    let code = match raw.to_lowercase().as_str() {
        "" => return Ok(String::new()),
        "english" | "en" => "en",
        "german" | "de" => "de",
        "french" | "fr" => "fr",
        "italian" | "it" => "it",
        "spanish" | "es" => "es",
        "portuguese" | "pt" => "pt",
        "japanese" | "ja" => "ja",
        "korean" | "ko" => "ko",
        "russian" | "ru" => "ru",
        "chinese simplified" | "zhs" => "zhs",
        "chinese traditional" | "zht" => "zht",
        _ => return Err(Error::Conflict(format!("unknown language '{raw}'"))),
    };
    Ok(code.to_string())
}

fn truthy(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "yes" | "1" | "x")
}
