//! Constraint workspace: ledger editing against the active exclusions

#![allow(clippy::result_large_err)]

use std::collections::BTreeSet;

use chrono::Local;
use examgrid_core::context::ContextStore;
use examgrid_core::errors::ExError;
use examgrid_core::ledger::{default_constraint_name, ConstraintLedger};
use examgrid_core::model::{
    ConstraintCategory, ConstraintEntry, ConstraintItems, ConstraintSnapshotRecord,
};
use examgrid_core::policy::{ops, ActorPolicy};
use examgrid_core_types::RequestContext;
use examgrid_store::constraints::{self, CategoryWarning};
use examgrid_store::errors::Result;
use examgrid_store::exclusions::load_active_exclusion;
use rusqlite::Connection;

use super::calendar::period_mapping;
use super::{authorize, logged};

/// Periods no constraint may select for a topology
///
/// The active snapshot is loaded with the current locks folded in; without
/// one, only the system-locked periods are off limits.
pub fn excluded_periods(conn: &Connection, topology_id: i64) -> Result<BTreeSet<u32>> {
    match load_active_exclusion(conn, topology_id)? {
        Some(snapshot) => Ok(snapshot.excluded_periods),
        None => Ok(period_mapping(conn, topology_id)?.system_locked_indices()),
    }
}

/// Where to start editing from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSource {
    /// A specific stored snapshot
    Snapshot(i64),
    /// The newest stored snapshot, or empty when there is none
    Latest,
    Empty,
}

#[derive(Debug, Clone)]
pub struct ConstraintWorkspace {
    ledger: ConstraintLedger,
    snapshot_id: Option<i64>,
    excluded: BTreeSet<u32>,
    warnings: Vec<CategoryWarning>,
}

impl ConstraintWorkspace {
    /// `topology_id` selects which exclusions period entries are checked
    /// against; `None` checks against nothing.
    pub fn open(conn: &Connection, source: LedgerSource, topology_id: Option<i64>) -> Result<Self> {
        let excluded = match topology_id {
            Some(id) => excluded_periods(conn, id)?,
            None => BTreeSet::new(),
        };
        let snapshot_id = match source {
            LedgerSource::Snapshot(id) => Some(id),
            LedgerSource::Latest => constraints::latest_constraints(conn)?.map(|r| r.id),
            LedgerSource::Empty => None,
        };
        let (ledger, warnings) = match snapshot_id {
            Some(id) => {
                let loaded = constraints::load_constraint_snapshot(conn, id)?;
                (ConstraintLedger::from_snapshot(&loaded.snapshot), loaded.warnings)
            }
            None => (ConstraintLedger::new(""), Vec::new()),
        };
        Ok(Self {
            ledger,
            snapshot_id,
            excluded,
            warnings,
        })
    }

    pub fn ledger(&self) -> &ConstraintLedger {
        &self.ledger
    }

    /// Stored snapshot the ledger was loaded from
    pub fn snapshot_id(&self) -> Option<i64> {
        self.snapshot_id
    }

    pub fn excluded(&self) -> &BTreeSet<u32> {
        &self.excluded
    }

    /// Segments the codec dropped while loading
    pub fn warnings(&self) -> &[CategoryWarning] {
        &self.warnings
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.ledger.set_name(name);
    }

    pub fn add_entry(&mut self, category: ConstraintCategory, entry: ConstraintEntry) -> Result<()> {
        self.ledger
            .add_entry(category, entry, &self.excluded)
            .map_err(|e| ExError::from(e).with_op("add_constraint_entry"))
    }

    pub fn update_entry(
        &mut self,
        category: ConstraintCategory,
        course_code: &str,
        items: ConstraintItems,
    ) -> Result<()> {
        self.ledger
            .update_entry(category, course_code, items, &self.excluded)
            .map_err(|e| ExError::from(e).with_op("update_constraint_entry"))
    }

    pub fn remove_entry(
        &mut self,
        category: ConstraintCategory,
        course_code: &str,
    ) -> Option<ConstraintEntry> {
        self.ledger.remove_entry(category, course_code)
    }

    /// Persist the ledger as a new snapshot and reload it from the store
    ///
    /// A blank name becomes `Snapshot <date> <time>`. The context's
    /// constraint pointer follows the new snapshot.
    pub fn save(
        &mut self,
        conn: &mut Connection,
        policy: &dyn ActorPolicy,
        rc: &RequestContext,
        context: Option<&mut ContextStore>,
    ) -> Result<ConstraintSnapshotRecord> {
        let name = match self.ledger.name().trim() {
            "" => default_constraint_name(Local::now().naive_local()),
            name => name.to_string(),
        };
        let record = logged(ops::SAVE_CONSTRAINTS, rc, || {
            authorize(policy, rc, ops::SAVE_CONSTRAINTS)?;
            let encoded = self
                .ledger
                .encode_all()
                .map_err(|e| ExError::from(e).with_op(ops::SAVE_CONSTRAINTS))?;
            constraints::save_constraints(conn, &name, &rc.actor, &encoded)
        })?;

        let loaded = constraints::load_constraint_snapshot(conn, record.id)?;
        self.ledger = ConstraintLedger::from_snapshot(&loaded.snapshot);
        self.snapshot_id = Some(record.id);
        self.warnings = loaded.warnings;
        if let Some(context) = context {
            context.set_constraint_snapshot_id(Some(record.id));
        }
        Ok(record)
    }
}
