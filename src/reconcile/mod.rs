//! Derive ship association tables from reference tables and merge them
//! with the previously written table.

pub mod defenses;
pub mod report;
pub mod weapons;

pub use defenses::*;
pub use report::*;
pub use weapons::*;

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::lookup::{NameIndex, Resolution};
use crate::tables::ShipRecord;
use report::push_warning;

/// A ship and the names it references, in listing order
#[derive(Debug, Clone, PartialEq)]
pub struct ShipRef {
    pub id: i64,
    pub label: String,
    pub names: Vec<String>,
}

impl ShipRef {
    pub fn new(id: i64, names: Vec<String>) -> Self {
        Self {
            id,
            label: id.to_string(),
            names,
        }
    }

    pub fn with_weapons(record: &ShipRecord) -> Self {
        Self {
            id: record.ship_id,
            label: record.label(),
            names: record.weapon_names(),
        }
    }

    pub fn with_defenses(record: &ShipRecord) -> Self {
        Self {
            id: record.ship_id,
            label: record.label(),
            names: record.defense_names(),
        }
    }
}

/// Reference entry that an association row points at
pub trait Target {
    fn id(&self) -> i64;
}

/// Result of one reconciliation run
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation<R> {
    pub rows: Vec<R>,
    pub changes: Vec<RowChange>,
    pub summary: ChangeSummary,
    pub warnings: Vec<Warning>,
}

impl<R> Reconciliation<R> {
    fn new(warnings: Vec<Warning>) -> Self {
        Self {
            rows: Vec::new(),
            changes: Vec::new(),
            summary: ChangeSummary::default(),
            warnings,
        }
    }

    fn record(&mut self, row: Option<R>, change: RowChange) {
        self.summary.record(change.kind);
        self.changes.push(change);
        if let Some(row) = row {
            self.rows.push(row);
        }
    }
}

/// One resolved (ship, target) pair
pub(crate) struct Derived<'a, T> {
    pub ship_id: i64,
    pub target: &'a T,
}

impl<T: Target> Derived<'_, T> {
    pub fn key(&self) -> (i64, i64) {
        (self.ship_id, self.target.id())
    }
}

/// Resolve every ship's names against `index`, in ship then name order.
///
/// Misses fall back to the sentinel, or are skipped when there is none.
/// Repeated keys on a ship keep their first occurrence.
pub(crate) fn derive_pairs<'a, T: Target>(
    kind: &'static str,
    ships: &[ShipRef],
    index: &'a NameIndex<T>,
    warnings: &mut Vec<Warning>,
) -> Vec<Derived<'a, T>> {
    let mut seen = HashSet::new();
    let mut derived = Vec::new();

    for ship in ships {
        for name in &ship.names {
            let target = match index.resolve(name) {
                Resolution::Found(target) => target,
                Resolution::Fallback(sentinel) => {
                    push_warning(
                        warnings,
                        Warning::Unresolved {
                            kind,
                            ship_id: ship.id,
                            ship: ship.label.clone(),
                            name: name.clone(),
                            fallback_id: Some(sentinel.id()),
                        },
                    );
                    sentinel
                }
                Resolution::Unresolved => {
                    push_warning(
                        warnings,
                        Warning::Unresolved {
                            kind,
                            ship_id: ship.id,
                            ship: ship.label.clone(),
                            name: name.clone(),
                            fallback_id: None,
                        },
                    );
                    continue;
                }
            };

            let entry = Derived {
                ship_id: ship.id,
                target,
            };
            if !seen.insert(entry.key()) {
                push_warning(
                    warnings,
                    Warning::Duplicate {
                        kind,
                        ship_id: ship.id,
                        target_id: target.id(),
                        name: name.clone(),
                    },
                );
                continue;
            }
            derived.push(entry);
        }
    }

    debug!(kind, ships = ships.len(), pairs = derived.len(), "derived associations");
    derived
}
