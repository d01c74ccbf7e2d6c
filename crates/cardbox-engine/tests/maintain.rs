//! Tests for the duplicate-entry maintenance scanner.

mod common;

use cardbox::{Card, Store};
use cardbox_engine::maintain::{find_duplicate_groups, plan_merges};
use cardbox_engine::Engine;
use common::{entry, seeded_store, stored_card, usage};

fn shock(count: u32) -> Card {
    Card::new("Shock", "m20").with_count(count)
}

#[test]
fn distinct_printings_form_no_groups() {
    let entries = vec![
        entry(stored_card(1, "Shock", 2), vec![]),
        entry(stored_card(2, "Opt", 1), vec![]),
    ];
    assert!(find_duplicate_groups(&entries).is_empty());
}

#[test]
fn first_seen_row_is_canonical_and_counts_sum() {
    let entries = vec![
        entry(stored_card(1, "Shock", 2), vec![]),
        entry(stored_card(2, "Opt", 1), vec![]),
        entry(stored_card(3, "Shock", 3), vec![]),
    ];

    let plan = plan_merges(&entries).unwrap();

    assert_eq!(plan.merges.len(), 1);
    let merge = &plan.merges[0];
    assert_eq!(merge.canonical_id, 1);
    assert_eq!(merge.new_count, Some(5));
    assert_eq!(merge.delete_ids, vec![3]);
}

#[test]
fn single_distinct_reference_wins() {
    let mut dup = stored_card(2, "Shock", 1);
    dup.scryfall_id = Some("the-ref".to_string());
    let entries = vec![entry(stored_card(1, "Shock", 2), vec![]), entry(dup, vec![])];

    let plan = plan_merges(&entries).unwrap();
    assert_eq!(
        plan.merges[0].scryfall_id,
        Some(Some("the-ref".to_string()))
    );
}

#[test]
fn conflicting_references_clear_the_canonical() {
    let mut first = stored_card(1, "Shock", 2);
    first.scryfall_id = Some("ref-a".to_string());
    let mut second = stored_card(2, "Shock", 1);
    second.scryfall_id = Some("ref-b".to_string());

    let plan = plan_merges(&[entry(first, vec![]), entry(second, vec![])]).unwrap();
    assert_eq!(plan.merges[0].scryfall_id, Some(None));
}

#[test]
fn usages_of_stale_rows_are_planned_for_retargeting() {
    let entries = vec![
        entry(stored_card(1, "Shock", 2), vec![]),
        entry(stored_card(2, "Shock", 3), vec![usage(10, "Burn", 2, 1)]),
    ];

    let plan = plan_merges(&entries).unwrap();

    let merge = &plan.merges[0];
    assert_eq!(merge.retargets.len(), 1);
    assert_eq!(merge.retargets[0].from_card_id, 2);
    assert_eq!(merge.retargets[0].count, 2);
    assert_eq!(merge.retargets[0].wishlist_count, 1);
}

#[test]
fn merge_conserves_counts_and_deletes_stale_rows() {
    let store = seeded_store(&[shock(2), shock(3)], &[("Burn", 1, 2, 1)]);
    let engine = Engine::new(store);

    let plan = engine.maintenance().plan().unwrap();
    let report = engine.maintenance().merge(&plan).unwrap();

    assert_eq!(report.groups_merged, 1);
    assert_eq!(report.cards_deleted, 1);
    assert_eq!(report.usages_retargeted, 1);
    assert!(report.failures.is_empty());

    let entries = engine.store().all_cards().unwrap();
    assert_eq!(entries.len(), 1);
    let survivor = &entries[0];
    assert_eq!(survivor.card.count, 5);
    assert_eq!(survivor.usages.len(), 1);
    assert_eq!(survivor.usages[0].count, 2);
    assert_eq!(survivor.usages[0].wishlist_count, 1);
}

#[test]
fn retargeted_usages_sum_with_existing_canonical_usages() {
    // Both rows are committed to the same deck; the merged usage sums.
    let store = seeded_store(&[shock(2), shock(3)], &[("Burn", 0, 1, 0), ("Burn", 1, 2, 1)]);
    let engine = Engine::new(store);

    let plan = engine.maintenance().plan().unwrap();
    engine.maintenance().merge(&plan).unwrap();

    let entries = engine.store().all_cards().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].usages.len(), 1);
    assert_eq!(entries[0].usages[0].count, 3);
    assert_eq!(entries[0].usages[0].wishlist_count, 1);
}

#[test]
fn clean_inventory_plans_nothing() {
    let store = seeded_store(&[shock(2), Card::new("Opt", "dom").with_count(1)], &[]);
    let engine = Engine::new(store);

    let plan = engine.maintenance().plan().unwrap();
    assert!(plan.is_empty());
}
