//! End-to-end tests for the CSV import workflow.

mod common;

use std::path::PathBuf;

use cardbox::{Edition, MemoryStore, Store};
use cardbox_engine::{EditionResolver, Engine, Error, Result};
use common::{seeded_store, AnyEdition, NoDecisions, ScriptedDecisions};

/// Write a CSV export into a temp dir and return its path.
fn export_file(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("export.csv");
    std::fs::write(&path, contents).expect("write export");
    path
}

struct UnreachableEditions;

impl EditionResolver for UnreachableEditions {
    fn resolve(&self, code: &str) -> Result<Edition> {
        Err(Error::EditionLookup {
            code: code.to_string(),
            reason: "service unavailable".to_string(),
        })
    }
}

#[test]
fn duplicate_rows_import_as_one_card() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(
        &dir,
        "Count,Name,Edition\n\
         2,Shock,m20\n\
         3,Shock,m20\n",
    );
    let engine = Engine::new(MemoryStore::new());
    let decisions = ScriptedDecisions::new().confirm(true);

    let report = engine
        .import()
        .run(&path, &AnyEdition, &decisions)
        .unwrap()
        .expect("changes applied");

    assert_eq!(report.created, 1);
    assert!(report.is_clean());

    let entries = engine.store().all_cards().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].card.count, 5);
}

#[test]
fn referenced_editions_are_registered() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n1,Shock,M20\n");
    let engine = Engine::new(MemoryStore::new());
    let decisions = ScriptedDecisions::new().confirm(true);

    engine.import().run(&path, &AnyEdition, &decisions).unwrap();

    let editions = engine.store().editions().unwrap();
    assert_eq!(editions.len(), 1);
    assert_eq!(editions[0].code, "m20");
}

#[test]
fn matching_inventory_means_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n2,Shock,m20\n");
    let store = seeded_store(&[cardbox::Card::new("Shock", "m20").with_count(2)], &[]);
    store
        .register_edition(&Edition {
            code: "m20".to_string(),
            name: "Core Set 2020".to_string(),
            released_at: None,
        })
        .unwrap();
    let engine = Engine::new(store);

    // No confirmation may be asked when there is nothing to apply.
    let outcome = engine.import().run(&path, &AnyEdition, &NoDecisions).unwrap();
    assert!(outcome.is_none());
}

#[test]
fn empty_export_is_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n");
    let engine = Engine::new(MemoryStore::new());

    let outcome = engine.import().run(&path, &AnyEdition, &NoDecisions).unwrap();
    assert!(outcome.is_none());
}

#[test]
fn declining_the_preview_cancels_without_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n2,Shock,m20\n");
    let engine = Engine::new(MemoryStore::new());
    let decisions = ScriptedDecisions::new().confirm(false);

    let err = engine
        .import()
        .run(&path, &AnyEdition, &decisions)
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(engine.store().all_cards().unwrap().is_empty());
}

#[test]
fn unresolvable_edition_aborts_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n2,Shock,xyz\n");
    let engine = Engine::new(MemoryStore::new());

    let err = engine
        .import()
        .run(&path, &UnreachableEditions, &NoDecisions)
        .unwrap_err();

    assert!(matches!(err, Error::EditionLookup { .. }));
    assert!(engine.store().all_cards().unwrap().is_empty());
    assert!(engine.store().editions().unwrap().is_empty());
}

#[test]
fn count_changes_update_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_file(&dir, "Count,Name,Edition\n4,Shock,m20\n");
    let store = seeded_store(&[cardbox::Card::new("Shock", "m20").with_count(2)], &[]);
    let engine = Engine::new(store);
    let decisions = ScriptedDecisions::new().confirm(true);

    let report = engine
        .import()
        .run(&path, &AnyEdition, &decisions)
        .unwrap()
        .expect("changes applied");

    assert_eq!(report.counts_updated, 1);
    assert_eq!(report.created, 0);

    let entries = engine.store().all_cards().unwrap();
    assert_eq!(entries[0].card.count, 4);
}
