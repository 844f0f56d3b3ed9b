use std::collections::HashSet;
use tracing::info;

use super::report::push_warning;
use super::{derive_pairs, ChangeKind, Reconciliation, RowChange, ShipRef, Target, Warning};
use crate::lookup::NameIndex;
use crate::tables::{DefenseRecord, DefenseRow, TableError, DEFENSES};

/// A defense of the reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefenseRef {
    pub name: String,
    pub id: i64,
}

/// Convert table rows, failing on the first row without a usable id
pub fn defense_refs(records: &[DefenseRecord]) -> Result<Vec<DefenseRef>, TableError> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| match record.resolved_id() {
            Some(id) => Ok(DefenseRef {
                name: record.name.clone(),
                id,
            }),
            // Header is line 1
            None => Err(TableError::Parse {
                table: DEFENSES.name,
                line: idx + 2,
                message: format!(
                    "defense '{}' has no integer defense_id or id",
                    record.name
                ),
            }),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefenseEntry {
    pub id: i64,
}

impl Target for DefenseEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Index defenses by name. A missing "Unknown" entry is reported, not added.
pub fn build_defense_index(
    defenses: &[DefenseRef],
    warnings: &mut Vec<Warning>,
) -> NameIndex<DefenseEntry> {
    let mut index = NameIndex::new();
    for defense in defenses {
        index.insert(&defense.name, DefenseEntry { id: defense.id });
    }

    if !index.has_sentinel() {
        push_warning(warnings, Warning::SentinelMissing { kind: "defense" });
    }

    index
}

/// Rebuild the ship/defense table and diff it against `existing`.
///
/// Defense rows carry no tunables, so nothing is ever reported as updated.
pub fn reconcile_defenses(
    defenses: &[DefenseRef],
    ships: &[ShipRef],
    existing: Option<&[DefenseRow]>,
) -> Reconciliation<DefenseRow> {
    let mut warnings = Vec::new();
    let index = build_defense_index(defenses, &mut warnings);
    let derived = derive_pairs("defense", ships, &index, &mut warnings);

    let existing = existing.unwrap_or_default();
    let previous: HashSet<(i64, i64)> = existing
        .iter()
        .map(|r| (r.ship_id, r.defense_id))
        .collect();
    let mut result = Reconciliation::new(warnings);

    for pair in &derived {
        let key = pair.key();
        let kind = if previous.contains(&key) {
            ChangeKind::Unchanged
        } else {
            ChangeKind::Added
        };
        let row = DefenseRow {
            ship_id: key.0,
            defense_id: key.1,
        };
        result.record(Some(row), RowChange::new(kind, key));
    }

    let current: HashSet<_> = derived.iter().map(|p| p.key()).collect();
    let mut reported = HashSet::new();
    for row in existing {
        let key = (row.ship_id, row.defense_id);
        if !current.contains(&key) && reported.insert(key) {
            result.record(None, RowChange::new(ChangeKind::Removed, key));
        }
    }

    info!(rows = result.rows.len(), "{}", result.summary);
    result
}
