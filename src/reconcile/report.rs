use serde::Serialize;
use std::fmt;
use tracing::warn;

/// What happened to one association key during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowChange {
    pub kind: ChangeKind,
    pub ship_id: i64,
    /// Weapon or defense id
    pub target_id: i64,
    /// Fields filled with defaults (only for `Updated`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filled: Vec<&'static str>,
}

impl RowChange {
    pub fn new(kind: ChangeKind, (ship_id, target_id): (i64, i64)) -> Self {
        Self {
            kind,
            ship_id,
            target_id,
            filled: Vec::new(),
        }
    }
}

impl fmt::Display for RowChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ChangeKind::Added => "Added",
            ChangeKind::Removed => "Removed",
            ChangeKind::Updated => "Updated defaults",
            ChangeKind::Unchanged => "Unchanged",
        };
        write!(f, "{}: ship_id={} id={}", label, self.ship_id, self.target_id)?;
        if !self.filled.is_empty() {
            write!(f, " ({})", self.filled.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ChangeSummary {
    pub fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Updated => self.updated += 1,
            ChangeKind::Unchanged => self.unchanged += 1,
        }
    }
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added={}, Removed={}, Updated={}, Unchanged={}",
            self.added, self.removed, self.updated, self.unchanged
        )
    }
}

/// Non-fatal problems found while deriving associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// The reference table had no "Unknown" entry, so one was added in memory
    SentinelSynthesized { kind: &'static str, id: i64 },
    /// The reference table has no "Unknown" entry and none is synthesized
    SentinelMissing { kind: &'static str },
    /// A ship references a name missing from the reference table
    Unresolved {
        kind: &'static str,
        ship_id: i64,
        ship: String,
        name: String,
        /// Sentinel id used instead, if any
        fallback_id: Option<i64>,
    },
    /// A ship resolves to the same target more than once
    Duplicate {
        kind: &'static str,
        ship_id: i64,
        target_id: i64,
        name: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SentinelSynthesized { kind, id } => {
                write!(f, "No 'Unknown' {kind} in reference table. Added as id={id}.")
            }
            Warning::SentinelMissing { kind } => write!(
                f,
                "No 'Unknown' {kind} in reference table; unresolved {kind}s will be skipped"
            ),
            Warning::Unresolved {
                kind,
                ship,
                name,
                fallback_id: Some(id),
                ..
            } => write!(
                f,
                "{kind} '{name}' not found for ship {ship}. Using 'Unknown' (id={id})."
            ),
            Warning::Unresolved {
                kind,
                ship,
                name,
                fallback_id: None,
                ..
            } => write!(f, "{kind} '{name}' not found for ship {ship}. Skipped."),
            Warning::Duplicate {
                kind,
                ship_id,
                target_id,
                name,
            } => write!(
                f,
                "ship_id={ship_id} already has {kind} id={target_id}; ignoring repeated '{name}'"
            ),
        }
    }
}

/// Log `warning` and keep it for the report
pub(crate) fn push_warning(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!("{}", warning);
    warnings.push(warning);
}
