//! Load the tables from disk, reconcile, and write the association table back.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Defaults;
use crate::reconcile::{
    defense_refs, reconcile_defenses, reconcile_weapons, DefenseRef, Reconciliation, ShipRef,
    WeaponRef,
};
use crate::tables::{
    read_optional_table, read_table, write_table, DefenseRecord, DefenseRow, ShipRecord,
    StoredWeaponRow, WeaponRecord, WeaponRow, DEFENSES, SHIP_DEFENSES, SHIP_DEFENSES_SOURCE,
    SHIP_WEAPONS, SHIP_WEAPONS_SOURCE, WEAPONS,
};

/// Input and output locations of one association table
#[derive(Debug, Clone, Copy)]
pub struct JoinPaths<'a> {
    pub ships: &'a Path,
    pub reference: &'a Path,
    pub output: &'a Path,
}

/// Reconcile the ship/weapon table. With `dry_run` the output file is left alone.
pub fn sync_weapons(
    paths: JoinPaths<'_>,
    defaults: &Defaults,
    dry_run: bool,
) -> Result<Reconciliation<WeaponRow>> {
    let weapons: Vec<WeaponRecord> = read_table(paths.reference, &WEAPONS)
        .with_context(|| format!("Failed to load weapons from {:?}", paths.reference))?;
    let ships: Vec<ShipRecord> = read_table(paths.ships, &SHIP_WEAPONS_SOURCE)
        .with_context(|| format!("Failed to load ships from {:?}", paths.ships))?;
    let existing: Option<Vec<StoredWeaponRow>> = read_optional_table(paths.output, &SHIP_WEAPONS)
        .with_context(|| format!("Failed to load existing table {:?}", paths.output))?;

    let weapons: Vec<WeaponRef> = weapons.iter().map(WeaponRef::from).collect();
    let ships: Vec<ShipRef> = ships.iter().map(ShipRef::with_weapons).collect();

    let result = reconcile_weapons(&weapons, &ships, existing.as_deref(), defaults);

    if !dry_run {
        write_table(paths.output, &SHIP_WEAPONS, &result.rows)?;
        info!("{:?} written with {} rows", paths.output, result.rows.len());
    }

    Ok(result)
}

/// Rebuild the ship/defense table. With `dry_run` the output file is left alone.
pub fn sync_defenses(paths: JoinPaths<'_>, dry_run: bool) -> Result<Reconciliation<DefenseRow>> {
    let defenses: Vec<DefenseRecord> = read_table(paths.reference, &DEFENSES)
        .with_context(|| format!("Failed to load defenses from {:?}", paths.reference))?;
    let ships: Vec<ShipRecord> = read_table(paths.ships, &SHIP_DEFENSES_SOURCE)
        .with_context(|| format!("Failed to load ships from {:?}", paths.ships))?;
    let existing: Option<Vec<DefenseRow>> = read_optional_table(paths.output, &SHIP_DEFENSES)
        .with_context(|| format!("Failed to load existing table {:?}", paths.output))?;

    let defenses: Vec<DefenseRef> = defense_refs(&defenses)
        .with_context(|| format!("Failed to load defenses from {:?}", paths.reference))?;
    let ships: Vec<ShipRef> = ships.iter().map(ShipRef::with_defenses).collect();

    let result = reconcile_defenses(&defenses, &ships, existing.as_deref());

    if !dry_run {
        write_table(paths.output, &SHIP_DEFENSES, &result.rows)?;
        info!("{:?} written with {} rows", paths.output, result.rows.len());
    }

    Ok(result)
}
