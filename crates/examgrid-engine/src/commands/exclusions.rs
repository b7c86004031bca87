//! Exclusion workspace
//!
//! Pipeline for every mutation:
//!
//! 1. policy check
//! 2. store write (single transaction)
//! 3. re-fetch the confirmed snapshot
//! 4. replace the working buffer wholesale
//!
//! Local edits (`toggle`, `clear_manual`, `select_all`) touch only the
//! buffer until `save`.

#![allow(clippy::result_large_err)]

use chrono::Local;
use examgrid_core::context::ContextStore;
use examgrid_core::errors::{ExError, GridError};
use examgrid_core::exclusion_buffer::ExclusionBuffer;
use examgrid_core::model::{ExclusionSnapshot, NewExclusionSnapshot, PeriodMapping};
use examgrid_core::policy::{ops, ActorPolicy};
use examgrid_core_types::RequestContext;
use examgrid_store::errors::Result;
use examgrid_store::exclusions;
use rusqlite::Connection;

use super::calendar::period_mapping;
use super::{authorize, logged};

#[derive(Debug, Clone)]
pub struct ExclusionWorkspace {
    topology_id: i64,
    mapping: PeriodMapping,
    buffer: ExclusionBuffer,
    active: Option<ExclusionSnapshot>,
}

impl ExclusionWorkspace {
    /// Open the workspace for a topology
    ///
    /// Seeds from the active snapshot, or a fresh buffer holding only the
    /// system-locked periods under a generated name.
    pub fn open(conn: &Connection, topology_id: i64) -> Result<Self> {
        let mapping = period_mapping(conn, topology_id)?;
        let active = exclusions::load_active_exclusion(conn, topology_id)?;
        let buffer = match &active {
            Some(snapshot) => ExclusionBuffer::from_snapshot(snapshot, &mapping),
            None => ExclusionBuffer::fresh(&mapping, Local::now().naive_local()),
        };
        Ok(Self {
            topology_id,
            mapping,
            buffer,
            active,
        })
    }

    pub fn topology_id(&self) -> i64 {
        self.topology_id
    }

    pub fn mapping(&self) -> &PeriodMapping {
        &self.mapping
    }

    pub fn buffer(&self) -> &ExclusionBuffer {
        &self.buffer
    }

    /// Active snapshot as last confirmed by the store
    pub fn active(&self) -> Option<&ExclusionSnapshot> {
        self.active.as_ref()
    }

    /// Flip one period; locked periods are left alone
    pub fn toggle(&mut self, period_index: u32) -> bool {
        self.buffer.toggle(period_index)
    }

    pub fn clear_manual(&mut self) {
        self.buffer.clear_manual();
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.buffer.set_name(name);
    }

    /// Persist the buffer as a new snapshot
    ///
    /// With `set_active`, the context's exclusion pointer follows the new
    /// snapshot. On failure the buffer is left untouched.
    pub fn save(
        &mut self,
        conn: &mut Connection,
        policy: &dyn ActorPolicy,
        rc: &RequestContext,
        set_active: bool,
        context: Option<&mut ContextStore>,
    ) -> Result<ExclusionSnapshot> {
        let input = NewExclusionSnapshot {
            topology_id: self.topology_id,
            name: self.buffer.name().to_string(),
            excluded_periods: self.buffer.excluded().clone(),
            created_by: rc.actor.clone(),
        };
        let saved = save_exclusion(conn, policy, rc, &input, set_active)?;
        self.refresh(conn)?;
        if !set_active {
            self.buffer.restore(&saved, &self.mapping);
        }
        if let (true, Some(context)) = (set_active, context) {
            context.set_exclusion_snapshot_id(Some(saved.id));
        }
        Ok(saved)
    }

    /// Make a stored snapshot of this topology the active one
    pub fn activate(
        &mut self,
        conn: &mut Connection,
        policy: &dyn ActorPolicy,
        rc: &RequestContext,
        snapshot_id: i64,
        context: Option<&mut ContextStore>,
    ) -> Result<ExclusionSnapshot> {
        let activated = activate_exclusion(conn, policy, rc, self.topology_id, snapshot_id)?;
        self.refresh(conn)?;
        if let Some(context) = context {
            context.set_exclusion_snapshot_id(Some(activated.id));
        }
        Ok(activated)
    }

    /// Snapshots for this topology, newest first
    pub fn history(&self, conn: &Connection) -> Result<Vec<ExclusionSnapshot>> {
        exclusions::exclusion_history(conn, self.topology_id)
    }

    /// Replace local state with what the store holds now
    pub fn refresh(&mut self, conn: &Connection) -> Result<()> {
        *self = Self::open(conn, self.topology_id)?;
        Ok(())
    }
}

/// Save a snapshot
///
/// The store reads the system locks inside the write transaction, so
/// holidays recorded after a workspace was opened are still merged in.
pub fn save_exclusion(
    conn: &mut Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    input: &NewExclusionSnapshot,
    set_active: bool,
) -> Result<ExclusionSnapshot> {
    logged(ops::SAVE_EXCLUSION, rc, || {
        authorize(policy, rc, ops::SAVE_EXCLUSION)?;
        exclusions::save_exclusion(conn, input, set_active)
    })
}

/// Activate a stored snapshot, refusing one owned by another topology
///
/// The returned set includes the topology's current system locks.
pub fn activate_exclusion(
    conn: &mut Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    topology_id: i64,
    snapshot_id: i64,
) -> Result<ExclusionSnapshot> {
    logged(ops::ACTIVATE_EXCLUSION, rc, || {
        authorize(policy, rc, ops::ACTIVATE_EXCLUSION)?;
        let target = exclusions::get_exclusion(conn, snapshot_id)?;
        if target.topology_id != topology_id {
            return Err(ExError::from(GridError::SnapshotNotFound {
                kind: "exclusion".to_string(),
                snapshot_id,
            })
            .with_op(ops::ACTIVATE_EXCLUSION)
            .with_message(format!(
                "exclusion snapshot {snapshot_id} belongs to topology {}",
                target.topology_id
            )));
        }
        exclusions::activate_exclusion(conn, snapshot_id)
    })
}
