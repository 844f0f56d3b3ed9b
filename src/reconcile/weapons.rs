use std::collections::{HashMap, HashSet};
use tracing::info;

use super::report::push_warning;
use super::{derive_pairs, ChangeKind, Reconciliation, RowChange, ShipRef, Target, Warning};
use crate::config::Defaults;
use crate::lookup::{NameIndex, SENTINEL_NAME};
use crate::tables::{StoredWeaponRow, WeaponRecord, WeaponRow};

/// Usage limit given to a synthesized "Unknown" weapon
const SENTINEL_USAGE_LIMIT: &str = "0";

/// A weapon of the reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponRef {
    pub name: String,
    pub id: i64,
    /// `None` means the generic default applies
    pub usage_limit: Option<String>,
}

impl WeaponRef {
    pub fn new(name: impl Into<String>, id: i64, usage_limit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            id,
            usage_limit: usage_limit
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

impl From<&WeaponRecord> for WeaponRef {
    fn from(record: &WeaponRecord) -> Self {
        Self::new(&record.name, record.weapon_id, record.usage_limit.as_deref())
    }
}

/// Lookup value for a weapon name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponEntry {
    pub id: i64,
    pub usage_limit: Option<String>,
}

impl WeaponEntry {
    /// Value for a blank `max_usage` cell
    pub fn max_usage<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        self.usage_limit.as_deref().unwrap_or(&defaults.max_usage)
    }
}

impl Target for WeaponEntry {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Index weapons by name, adding an "Unknown" entry when the table lacks one
pub fn build_weapon_index(
    weapons: &[WeaponRef],
    warnings: &mut Vec<Warning>,
) -> NameIndex<WeaponEntry> {
    let mut index = NameIndex::new();
    for weapon in weapons {
        index.insert(
            &weapon.name,
            WeaponEntry {
                id: weapon.id,
                usage_limit: weapon.usage_limit.clone(),
            },
        );
    }

    if !index.has_sentinel() {
        let id = index.values().map(|w| w.id).max().unwrap_or(0) + 1;
        index.insert(
            SENTINEL_NAME,
            WeaponEntry {
                id,
                usage_limit: Some(SENTINEL_USAGE_LIMIT.to_string()),
            },
        );
        push_warning(warnings, Warning::SentinelSynthesized { kind: "weapon", id });
    }

    index
}

/// Reconcile the ship/weapon table.
///
/// Rows come out in ship then weapon order. Rows already in `existing` keep
/// every non-blank tunable; blank ones are filled from `defaults`.
pub fn reconcile_weapons(
    weapons: &[WeaponRef],
    ships: &[ShipRef],
    existing: Option<&[StoredWeaponRow]>,
    defaults: &Defaults,
) -> Reconciliation<WeaponRow> {
    let mut warnings = Vec::new();
    let index = build_weapon_index(weapons, &mut warnings);
    let derived = derive_pairs("weapon", ships, &index, &mut warnings);

    let (existing_rows, existing_order) = index_existing(existing.unwrap_or_default());
    let mut result = Reconciliation::new(warnings);

    for pair in &derived {
        let key = pair.key();
        let weapon = pair.target;

        match existing_rows.get(&key) {
            Some(stored) => {
                let mut change = RowChange::new(ChangeKind::Unchanged, key);
                let row = merge_row(stored, weapon, defaults, &mut change.filled);
                if !change.filled.is_empty() {
                    change.kind = ChangeKind::Updated;
                }
                result.record(Some(row), change);
            }
            None => {
                let row = WeaponRow {
                    ship_id: key.0,
                    weapon_id: key.1,
                    damage_multiplier: defaults.damage_multiplier.clone(),
                    max_per_turn: defaults.max_per_turn.clone(),
                    cooldown_turns: defaults.cooldown_turns.clone(),
                    max_usage: weapon.max_usage(defaults).to_string(),
                };
                result.record(Some(row), RowChange::new(ChangeKind::Added, key));
            }
        }
    }

    let current: HashSet<_> = derived.iter().map(|p| p.key()).collect();
    for key in existing_order {
        if !current.contains(&key) {
            result.record(None, RowChange::new(ChangeKind::Removed, key));
        }
    }

    info!(rows = result.rows.len(), "{}", result.summary);
    result
}

/// Key -> stored row (later duplicates win), plus keys in first-seen order
fn index_existing(
    rows: &[StoredWeaponRow],
) -> (HashMap<(i64, i64), &StoredWeaponRow>, Vec<(i64, i64)>) {
    let mut by_key = HashMap::new();
    let mut order = Vec::new();
    for row in rows {
        if by_key.insert(row.key(), row).is_none() {
            order.push(row.key());
        }
    }
    (by_key, order)
}

fn merge_row(
    stored: &StoredWeaponRow,
    weapon: &WeaponEntry,
    defaults: &Defaults,
    filled: &mut Vec<&'static str>,
) -> WeaponRow {
    let mut fill = |field: &'static str, value: &Option<String>, default: &str| match value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
    {
        Some(v) => v.to_string(),
        None => {
            filled.push(field);
            default.to_string()
        }
    };

    WeaponRow {
        ship_id: stored.ship_id,
        weapon_id: stored.weapon_id,
        damage_multiplier: fill(
            "damage_multiplier",
            &stored.damage_multiplier,
            &defaults.damage_multiplier,
        ),
        max_per_turn: fill("max_per_turn", &stored.max_per_turn, &defaults.max_per_turn),
        cooldown_turns: fill(
            "cooldown_turns",
            &stored.cooldown_turns,
            &defaults.cooldown_turns,
        ),
        max_usage: fill("max_usage", &stored.max_usage, weapon.max_usage(defaults)),
    }
}
