use serde::{Deserialize, Serialize};

/// A row of the weapon reference table
#[derive(Debug, Clone, Deserialize)]
pub struct WeaponRecord {
    pub name: String,
    pub weapon_id: i64,
    /// Blank means "use the generic max_usage default"
    #[serde(default)]
    pub usage_limit: Option<String>,
}

/// A row of the defense reference table.
///
/// The id lives in `defense_id`, or in `id` for tables without one. Both
/// columns may be present; `defense_id` wins.
#[derive(Debug, Clone, Deserialize)]
pub struct DefenseRecord {
    pub name: String,
    #[serde(default)]
    pub defense_id: Option<i64>,
    #[serde(default)]
    pub id: Option<String>,
}

impl DefenseRecord {
    pub fn resolved_id(&self) -> Option<i64> {
        self.defense_id
            .or_else(|| self.id.as_deref().and_then(|id| id.parse().ok()))
    }
}

/// A row of the ship table. Only the columns this tool reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipRecord {
    pub ship_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated weapon names
    #[serde(default)]
    pub weapons: Option<String>,
    /// Comma-separated defense names
    #[serde(default)]
    pub defenses: Option<String>,
}

impl ShipRecord {
    pub fn weapon_names(&self) -> Vec<String> {
        split_name_list(self.weapons.as_deref())
    }

    pub fn defense_names(&self) -> Vec<String> {
        split_name_list(self.defenses.as_deref())
    }

    /// Display label used in warnings
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.ship_id, name),
            None => self.ship_id.to_string(),
        }
    }
}

/// A persisted ship/weapon association as read back from disk.
/// Empty cells deserialize to `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredWeaponRow {
    pub ship_id: i64,
    pub weapon_id: i64,
    pub damage_multiplier: Option<String>,
    pub max_per_turn: Option<String>,
    pub cooldown_turns: Option<String>,
    pub max_usage: Option<String>,
}

impl StoredWeaponRow {
    pub fn key(&self) -> (i64, i64) {
        (self.ship_id, self.weapon_id)
    }
}

/// Output row of the ship/weapon table. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeaponRow {
    pub ship_id: i64,
    pub weapon_id: i64,
    pub damage_multiplier: String,
    pub max_per_turn: String,
    pub cooldown_turns: String,
    pub max_usage: String,
}

/// Row of the ship/defense table, used both for reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefenseRow {
    pub ship_id: i64,
    pub defense_id: i64,
}

/// Split a denormalized `"A, B,,C"` list into trimmed, non-empty names
pub fn split_name_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name_list() {
        assert_eq!(
            split_name_list(Some(" Laser, Plasma ,, Ion Cannon,")),
            vec!["Laser", "Plasma", "Ion Cannon"]
        );
        assert!(split_name_list(None).is_empty());
        assert!(split_name_list(Some(" , ")).is_empty());
    }

    #[test]
    fn test_defense_id_preferred_over_id() {
        let record = DefenseRecord {
            name: "Shield".into(),
            defense_id: Some(4),
            id: Some("a91f".into()),
        };
        assert_eq!(record.resolved_id(), Some(4));

        let fallback = DefenseRecord {
            defense_id: None,
            id: Some("12".into()),
            ..record
        };
        assert_eq!(fallback.resolved_id(), Some(12));
    }

    #[test]
    fn test_ship_label() {
        let ship = ShipRecord {
            ship_id: 4,
            name: Some("Corvette".into()),
            weapons: None,
            defenses: None,
        };
        assert_eq!(ship.label(), "4 (Corvette)");
    }
}
