use csv::StringRecord;

use super::TableError;

/// Column a table must carry.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    /// Alternative header accepted in place of `name`
    pub alias: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str) -> Self {
        Self { name, alias: None }
    }

    /// Also accept `alias` as the header for this column
    pub const fn or(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    fn matches(&self, header: &str) -> bool {
        header == self.name || self.alias.is_some_and(|a| header == a)
    }
}

/// Required header layout of a CSV table
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub name: &'static str,
    pub required: &'static [Column],
}

impl TableLayout {
    /// Fail with `MissingColumn` for the first required column absent from `headers`
    pub fn check_headers(&self, headers: &StringRecord) -> Result<(), TableError> {
        for col in self.required {
            if !headers.iter().any(|h| col.matches(h)) {
                return Err(TableError::MissingColumn {
                    table: self.name,
                    column: col.name,
                });
            }
        }
        Ok(())
    }
}

pub static WEAPONS: TableLayout = TableLayout {
    name: "weapons",
    required: &[Column::new("name"), Column::new("weapon_id")],
};

pub static DEFENSES: TableLayout = TableLayout {
    name: "defenses",
    required: &[Column::new("name"), Column::new("defense_id").or("id")],
};

pub static SHIP_WEAPONS_SOURCE: TableLayout = TableLayout {
    name: "ships",
    required: &[Column::new("ship_id"), Column::new("weapons")],
};

pub static SHIP_DEFENSES_SOURCE: TableLayout = TableLayout {
    name: "ships",
    required: &[Column::new("ship_id"), Column::new("defenses")],
};

pub static SHIP_WEAPONS: TableLayout = TableLayout {
    name: "ship_weapons",
    required: &[
        Column::new("ship_id"),
        Column::new("weapon_id"),
        Column::new("damage_multiplier"),
        Column::new("max_per_turn"),
        Column::new("cooldown_turns"),
        Column::new("max_usage"),
    ],
};

pub static SHIP_DEFENSES: TableLayout = TableLayout {
    name: "ship_defenses",
    required: &[Column::new("ship_id"), Column::new("defense_id")],
};

pub static IMAGE_SOURCES: TableLayout = TableLayout {
    name: "image_sources",
    required: &[Column::new("name"), Column::new("image_src")],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_headers_accepts_alias() {
        let headers = StringRecord::from(vec!["id", "name", "description"]);
        assert!(DEFENSES.check_headers(&headers).is_ok());
    }

    #[test]
    fn test_check_headers_reports_first_missing() {
        let headers = StringRecord::from(vec!["ship_id", "name"]);
        let err = SHIP_WEAPONS_SOURCE.check_headers(&headers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "table 'ships' is missing required column 'weapons'"
        );
    }
}
