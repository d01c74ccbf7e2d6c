//! Tests for the matcher and change analyzer.

mod common;

use cardbox::Card;
use cardbox_engine::{analyze, Error};
use common::{entry, stored_card, usage, NoDecisions, ScriptedDecisions};

#[test]
fn unmatched_imports_become_inserts() {
    let existing = vec![entry(stored_card(1, "Shock", 4), vec![])];
    let imported = vec![Card::new("Opt", "dom").with_count(2)];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();

    assert_eq!(changes.inserts.len(), 1);
    assert_eq!(changes.inserts[0].name, "Opt");
    assert!(changes.count_updates.is_empty());
    assert!(changes.id_updates.is_empty());
}

#[test]
fn identical_counts_are_no_ops() {
    let existing = vec![entry(stored_card(1, "Shock", 4), vec![])];
    let imported = vec![Card::new("Shock", "m20").with_count(4)];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();
    assert!(changes.is_empty());
}

#[test]
fn count_increase_without_wishlists_needs_no_decisions() {
    let existing = vec![entry(stored_card(1, "Shock", 2), vec![])];
    let imported = vec![Card::new("Shock", "m20").with_count(6)];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();

    assert_eq!(changes.count_updates.len(), 1);
    assert_eq!(changes.count_updates[0].old_count, 2);
    assert_eq!(changes.count_updates[0].new_count, 6);
    assert!(changes.to_owned.is_empty());
}

#[test]
fn count_decrease_within_free_copies_needs_no_decisions() {
    // 2 committed, shrink to 3: deck commitments still fit.
    let existing = vec![entry(
        stored_card(1, "Shock", 6),
        vec![usage(10, "Burn", 2, 0)],
    )];
    let imported = vec![Card::new("Shock", "m20").with_count(3)];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();

    assert_eq!(changes.count_updates.len(), 1);
    assert_eq!(changes.count_updates[0].new_count, 3);
    assert!(changes.deck_removals.is_empty());
    assert!(changes.to_wishlist.is_empty());
}

#[test]
fn count_decrease_below_commitments_resolves_against_decks() {
    // Shrink 4 -> 2 with 3 owned in Deck A: deficit of 1.
    let existing = vec![entry(
        stored_card(1, "Shock", 4),
        vec![usage(10, "Deck A", 3, 0)],
    )];
    let imported = vec![Card::new("Shock", "m20").with_count(2)];
    let decisions = ScriptedDecisions::new().select(0).amount(1);

    let changes = analyze(&imported, &existing, &decisions).unwrap();

    assert_eq!(changes.count_updates.len(), 1);
    assert_eq!(changes.count_updates[0].new_count, 2);
    assert_eq!(changes.deck_removals.len(), 1);
    assert_eq!(changes.deck_removals[0].deck_name, "Deck A");
    assert_eq!(changes.deck_removals[0].amount, 1);
    assert!(decisions.exhausted());
}

#[test]
fn count_increase_against_wishlists_moves_copies() {
    // 1 -> 3 with 2 wishlisted in one deck: exact-sum, both copies move.
    let existing = vec![entry(
        stored_card(1, "Shock", 1),
        vec![usage(10, "Burn", 0, 2)],
    )];
    let imported = vec![Card::new("Shock", "m20").with_count(3)];
    let decisions = ScriptedDecisions::new().confirm(true);

    let changes = analyze(&imported, &existing, &decisions).unwrap();

    assert_eq!(changes.count_updates.len(), 1);
    assert_eq!(changes.to_owned.len(), 1);
    assert_eq!(changes.to_owned[0].amount, 2);
    assert!(decisions.exhausted());
}

#[test]
fn metadata_updates_are_independent_of_counts() {
    let existing = vec![entry(stored_card(1, "Shock", 4), vec![])];
    let mut imported_card = Card::new("Shock", "m20").with_count(4);
    imported_card.scryfall_id = Some("new-ref".to_string());

    let changes = analyze(&[imported_card], &existing, &NoDecisions).unwrap();

    assert!(changes.count_updates.is_empty());
    assert_eq!(changes.id_updates.len(), 1);
    assert_eq!(changes.id_updates[0].scryfall_id.as_deref(), Some("new-ref"));
}

#[test]
fn empty_imported_reference_never_clears() {
    let mut card = stored_card(1, "Shock", 4);
    card.scryfall_id = Some("kept-ref".to_string());
    let existing = vec![entry(card, vec![])];
    let imported = vec![Card::new("Shock", "m20").with_count(4)];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();
    assert!(changes.id_updates.is_empty());
}

#[test]
fn every_import_lands_in_exactly_one_category() {
    // Insert, increase, decrease, metadata-only, no-op in one pass.
    let mut with_ref = stored_card(4, "Duress", 2);
    with_ref.scryfall_id = Some("old".to_string());
    let existing = vec![
        entry(stored_card(1, "Shock", 2), vec![]),
        entry(stored_card(2, "Opt", 3), vec![]),
        entry(with_ref, vec![]),
    ];
    let mut duress = Card::new("Duress", "m20").with_count(2);
    duress.scryfall_id = Some("new".to_string());
    let imported = vec![
        Card::new("Bolt", "m20").with_count(1),
        Card::new("Shock", "m20").with_count(5),
        Card::new("Opt", "m20").with_count(1),
        duress,
    ];

    let changes = analyze(&imported, &existing, &NoDecisions).unwrap();

    assert_eq!(changes.inserts.len(), 1);
    assert_eq!(changes.count_updates.len(), 2);
    assert_eq!(changes.id_updates.len(), 1);
    let total = changes.inserts.len() + changes.count_updates.len() + changes.id_updates.len();
    assert_eq!(total, imported.len());
}

#[test]
fn cancellation_during_resolution_aborts_the_analysis() {
    let existing = vec![entry(
        stored_card(1, "Shock", 4),
        vec![usage(10, "Deck A", 3, 0)],
    )];
    let imported = vec![Card::new("Shock", "m20").with_count(2)];
    // No scripted answers: the first prompt cancels.
    let decisions = ScriptedDecisions::new();

    let err = analyze(&imported, &existing, &decisions).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
