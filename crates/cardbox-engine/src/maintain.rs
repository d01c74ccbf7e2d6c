//! Duplicate-entry maintenance for inventories that predate identity
//! matching.
//!
//! Older imports could leave several inventory rows for the same printing.
//! The scanner groups the current snapshot by identity key, plans a merge
//! into each group's first-seen row, and applies it: counts summed onto the
//! canonical row, metadata references reconciled, deck usages retargeted,
//! and only then the stale rows deleted.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use cardbox::{CardEntry, IdentityKey, Store};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyze::card_row_id;
use crate::apply::ApplyFailure;
use crate::error::Result;

/// A deck usage moving from a stale row to the canonical row.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRetarget {
    pub deck_id: i64,
    pub deck_name: String,
    pub from_card_id: i64,
    pub count: u32,
    pub wishlist_count: u32,
}

/// The merge planned for one duplicate group.
#[derive(Debug, Clone, Serialize)]
pub struct CardMerge {
    /// The surviving row (first seen in snapshot order).
    pub canonical_id: i64,
    pub name: String,
    /// Summed owned count, when it differs from the canonical row's.
    pub new_count: Option<u32>,
    /// Reconciled metadata reference. Outer `None` means leave it alone;
    /// `Some(None)` clears an ambiguous reference.
    pub scryfall_id: Option<Option<String>>,
    pub retargets: Vec<UsageRetarget>,
    /// Stale rows to delete once their usages are moved.
    pub delete_ids: Vec<i64>,
}

/// A full maintenance pass, computed without writing anything.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergePlan {
    pub merges: Vec<CardMerge>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }
}

/// Summary of an applied merge plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub groups_merged: usize,
    pub usages_retargeted: usize,
    pub cards_deleted: usize,
    /// Groups that failed mid-merge. A failed group keeps its stale rows so
    /// no usage is orphaned.
    pub failures: Vec<ApplyFailure>,
}

/// Group a snapshot by identity key, first-seen order, keeping only groups
/// with more than one row.
pub fn find_duplicate_groups(entries: &[CardEntry]) -> Vec<Vec<CardEntry>> {
    let mut groups: Vec<Vec<CardEntry>> = Vec::new();
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();

    for entry in entries {
        match index.entry(entry.card.identity()) {
            Entry::Occupied(slot) => groups[*slot.get()].push(entry.clone()),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(vec![entry.clone()]);
            }
        }
    }

    groups.retain(|g| g.len() > 1);
    groups
}

/// Plan merges for every duplicate group in a snapshot.
///
/// Metadata reconciliation follows the distinct non-empty references within
/// the group: none leaves the canonical row untouched, exactly one wins,
/// more than one is ambiguous and clears the reference.
pub fn plan_merges(entries: &[CardEntry]) -> Result<MergePlan> {
    let mut plan = MergePlan::default();

    for group in find_duplicate_groups(entries) {
        let canonical = &group[0];
        let canonical_id = card_row_id(&canonical.card)?;

        let total: u32 = group.iter().map(|e| e.card.count).sum();
        let new_count = (total != canonical.card.count).then_some(total);

        let refs: BTreeSet<&str> = group
            .iter()
            .filter_map(|e| e.card.scryfall_id.as_deref())
            .filter(|r| !r.is_empty())
            .collect();
        let scryfall_id = match refs.len() {
            0 => None,
            1 => {
                let winner = refs.iter().next().copied().unwrap_or_default();
                (canonical.card.scryfall_id.as_deref() != Some(winner))
                    .then(|| Some(winner.to_string()))
            }
            _ => canonical.card.scryfall_id.is_some().then_some(None),
        };

        let mut retargets = Vec::new();
        let mut delete_ids = Vec::new();
        for stale in &group[1..] {
            let stale_id = card_row_id(&stale.card)?;
            for usage in &stale.usages {
                retargets.push(UsageRetarget {
                    deck_id: usage.deck_id,
                    deck_name: usage.deck_name.clone(),
                    from_card_id: stale_id,
                    count: usage.count,
                    wishlist_count: usage.wishlist_count,
                });
            }
            delete_ids.push(stale_id);
        }

        debug!(
            card = %canonical.card.display_name(),
            rows = group.len(),
            retargets = retargets.len(),
            "planned duplicate merge"
        );
        plan.merges.push(CardMerge {
            canonical_id,
            name: canonical.card.name.clone(),
            new_count,
            scryfall_id,
            retargets,
            delete_ids,
        });
    }

    Ok(plan)
}

/// Maintenance workflow engine.
#[derive(Debug)]
pub struct MaintenanceEngine<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> MaintenanceEngine<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Scan the current inventory and plan merges, writing nothing.
    pub fn plan(&self) -> Result<MergePlan> {
        let entries = self.store.all_cards()?;
        plan_merges(&entries)
    }

    /// Apply a merge plan, group by group.
    ///
    /// Within a group, usages move to the canonical row before any stale row
    /// is deleted. A group that fails mid-merge is recorded and skipped
    /// whole, and later groups still run.
    pub fn merge(&self, plan: &MergePlan) -> Result<MergeReport> {
        let mut report = MergeReport::default();

        for merge in &plan.merges {
            match self.merge_group(merge, &mut report) {
                Ok(()) => report.groups_merged += 1,
                Err(e) => {
                    warn!(card = %merge.name, error = %e, "merge group failed");
                    report.failures.push(ApplyFailure {
                        operation: format!("merge duplicate rows of {}", merge.name),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            groups = report.groups_merged,
            deleted = report.cards_deleted,
            failures = report.failures.len(),
            "maintenance pass applied"
        );
        Ok(report)
    }

    fn merge_group(&self, merge: &CardMerge, report: &mut MergeReport) -> Result<()> {
        if let Some(new_count) = merge.new_count {
            self.store
                .update_counts(&[(merge.canonical_id, new_count)])?;
        }
        if let Some(reference) = &merge.scryfall_id {
            self.store
                .update_scryfall_ids(&[(merge.canonical_id, reference.clone())])?;
        }

        for retarget in &merge.retargets {
            let (count, wishlist_count) =
                match self.store.usage(retarget.deck_id, merge.canonical_id)? {
                    Some(existing) => (
                        existing.count + retarget.count,
                        existing.wishlist_count + retarget.wishlist_count,
                    ),
                    None => (retarget.count, retarget.wishlist_count),
                };
            self.store.upsert_usage(
                retarget.deck_id,
                merge.canonical_id,
                count,
                wishlist_count,
            )?;
            self.store
                .delete_usage(retarget.deck_id, retarget.from_card_id)?;
            report.usages_retargeted += 1;
        }

        // Usages are gone; the stale rows are now safe to drop.
        for id in &merge.delete_ids {
            self.store.delete_card(*id)?;
            report.cards_deleted += 1;
        }
        Ok(())
    }
}
