//! Exclusion snapshot store
//!
//! Snapshots are append-only. Activation only flips `is_active`; the partial
//! unique index on `(topology_id) WHERE is_active = 1` backs the
//! one-active-per-topology rule for concurrent writers.
//!
//! Holidays can be recorded after a snapshot was written. The active
//! snapshot is therefore always returned with the current system locks
//! folded in; `get_exclusion` and `exclusion_history` return the stored set.

#![allow(clippy::result_large_err)]

use std::collections::BTreeSet;

use examgrid_core::errors::{ExError, GridError};
use examgrid_core::model::exclusion::{decode_period_set, encode_period_set};
use examgrid_core::model::{ExclusionSnapshot, NewExclusionSnapshot};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::columns::{from_millis, now_millis};
use crate::errors::{from_rusqlite, Result};
use crate::holidays::topology_mapping;

const SELECT_COLUMNS: &str = "SELECT id, topology_id, name, excluded_periods, is_active,
        created_at, created_by
     FROM exclusion_snapshots";

struct ExclusionRow {
    id: i64,
    topology_id: i64,
    name: String,
    excluded_periods: String,
    is_active: bool,
    created_at: i64,
    created_by: String,
}

impl ExclusionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            topology_id: row.get(1)?,
            name: row.get(2)?,
            excluded_periods: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
            created_by: row.get(6)?,
        })
    }

    fn into_snapshot(self, op: &str) -> Result<ExclusionSnapshot> {
        Ok(ExclusionSnapshot {
            id: self.id,
            topology_id: self.topology_id,
            name: self.name,
            excluded_periods: decode_period_set(&self.excluded_periods),
            is_active: self.is_active,
            created_at: from_millis(op, "created_at", self.created_at)?,
            created_by: self.created_by,
        })
    }
}

fn not_found(op: &str, snapshot_id: i64) -> ExError {
    ExError::from(GridError::SnapshotNotFound {
        kind: "exclusion".to_string(),
        snapshot_id,
    })
    .with_op(op)
}

/// Persist a new snapshot
///
/// The stored set is the caller's set plus the topology's system-locked
/// indices, read from the holiday table inside the write transaction. With
/// `set_active`, the previous active snapshot for the topology is
/// deactivated in the same transaction.
///
/// # Errors
///
/// - `NotFound` if the topology does not exist
/// - `PeriodOutOfRange` if an index is not in the topology's calendar
/// - `Persistence` on database failure (nothing is written)
pub fn save_exclusion(
    conn: &mut Connection,
    input: &NewExclusionSnapshot,
    set_active: bool,
) -> Result<ExclusionSnapshot> {
    const OP: &str = "save_exclusion";

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mapping = topology_mapping(&tx, input.topology_id).map_err(|e| e.with_op(OP))?;

    if let Some(bad) = input
        .excluded_periods
        .iter()
        .find(|idx| !mapping.contains(**idx))
    {
        return Err(ExError::from(GridError::PeriodOutOfRange {
            period_index: *bad,
            total_periods: mapping.total_periods,
        })
        .with_op(OP));
    }

    let merged: BTreeSet<u32> = input
        .excluded_periods
        .union(&mapping.system_locked_indices())
        .copied()
        .collect();

    if set_active {
        tx.execute(
            "UPDATE exclusion_snapshots SET is_active = 0 WHERE topology_id = ?1 AND is_active = 1",
            [input.topology_id],
        )
        .map_err(from_rusqlite)?;
    }
    tx.execute(
        "INSERT INTO exclusion_snapshots
            (topology_id, name, excluded_periods, is_active, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            input.topology_id,
            input.resolved_name(),
            encode_period_set(&merged),
            set_active as i64,
            now_millis(),
            input.created_by,
        ],
    )
    .map_err(from_rusqlite)?;
    let id = tx.last_insert_rowid();
    tx.commit().map_err(from_rusqlite)?;

    get_exclusion(conn, id)
}

/// Fold the topology's current system locks into a stored snapshot
fn with_current_locks(
    conn: &Connection,
    mut snapshot: ExclusionSnapshot,
) -> Result<ExclusionSnapshot> {
    let locks = topology_mapping(conn, snapshot.topology_id)?.system_locked_indices();
    snapshot.excluded_periods.extend(locks);
    Ok(snapshot)
}

/// Make an existing snapshot the active one for its topology
///
/// The returned set includes locks recorded since the snapshot was saved.
///
/// # Errors
///
/// `NotFound` if the snapshot does not exist.
pub fn activate_exclusion(conn: &mut Connection, snapshot_id: i64) -> Result<ExclusionSnapshot> {
    const OP: &str = "activate_exclusion";

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let topology_id: i64 = tx
        .query_row(
            "SELECT topology_id FROM exclusion_snapshots WHERE id = ?1",
            [snapshot_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| not_found(OP, snapshot_id))?;

    tx.execute(
        "UPDATE exclusion_snapshots SET is_active = 0
         WHERE topology_id = ?1 AND is_active = 1 AND id != ?2",
        [topology_id, snapshot_id],
    )
    .map_err(from_rusqlite)?;
    tx.execute(
        "UPDATE exclusion_snapshots SET is_active = 1 WHERE id = ?1",
        [snapshot_id],
    )
    .map_err(from_rusqlite)?;
    tx.commit().map_err(from_rusqlite)?;

    let activated = get_exclusion(conn, snapshot_id)?;
    with_current_locks(conn, activated)
}

/// Active snapshot for a topology with the current locks folded in
pub fn load_active_exclusion(
    conn: &Connection,
    topology_id: i64,
) -> Result<Option<ExclusionSnapshot>> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE topology_id = ?1 AND is_active = 1"),
            [topology_id],
            ExclusionRow::from_row,
        )
        .optional()
        .map_err(from_rusqlite)?;
    match row {
        Some(r) => {
            let snapshot = r.into_snapshot("load_active_exclusion")?;
            with_current_locks(conn, snapshot).map(Some)
        }
        None => Ok(None),
    }
}

/// Every snapshot for a topology, newest first
pub fn exclusion_history(conn: &Connection, topology_id: i64) -> Result<Vec<ExclusionSnapshot>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE topology_id = ?1 ORDER BY created_at DESC, id DESC"
        ))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([topology_id], ExclusionRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    rows.into_iter()
        .map(|r| r.into_snapshot("exclusion_history"))
        .collect()
}

/// # Errors
///
/// `NotFound` if the snapshot does not exist.
pub fn get_exclusion(conn: &Connection, snapshot_id: i64) -> Result<ExclusionSnapshot> {
    const OP: &str = "get_exclusion";
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [snapshot_id],
            ExclusionRow::from_row,
        )
        .optional()
        .map_err(from_rusqlite)?;
    match row {
        Some(r) => r.into_snapshot(OP),
        None => Err(not_found(OP, snapshot_id)),
    }
}
