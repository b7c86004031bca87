//! Constraint snapshot store
//!
//! A snapshot is one row in `constraint_snapshots` plus one encoded string
//! per category in `constraint_snapshot_entries`. There is no active flag;
//! the institutional context remembers which id is selected.

#![allow(clippy::result_large_err)]

use std::collections::BTreeMap;

use examgrid_core::codec::{self, ParseWarning};
use examgrid_core::errors::{ExError, ExErrorKind, GridError};
use examgrid_core::model::{ConstraintCategory, ConstraintSnapshot, ConstraintSnapshotRecord};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::columns::{from_millis, now_millis};
use crate::errors::{from_rusqlite, Result};

/// A dropped segment, tagged with the category it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWarning {
    pub category: ConstraintCategory,
    pub warning: ParseWarning,
}

/// Decoded snapshot plus anything the codec had to drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConstraints {
    pub snapshot: ConstraintSnapshot,
    pub warnings: Vec<CategoryWarning>,
}

/// Persist a new constraint snapshot
///
/// Categories missing from `encoded` are stored as empty strings. Each
/// string must decode cleanly with unique course codes.
///
/// # Errors
///
/// - `InvalidInput` for a blank name or a string that does not decode
/// - `DuplicateCourseCode` for a repeated code within a category
/// - `Persistence` on database failure (nothing is written)
pub fn save_constraints(
    conn: &mut Connection,
    name: &str,
    created_by: &str,
    encoded: &BTreeMap<ConstraintCategory, String>,
) -> Result<ConstraintSnapshotRecord> {
    const OP: &str = "save_constraints";

    let name = name.trim();
    if name.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op(OP)
            .with_message("constraint snapshot name is required"));
    }
    for (category, raw) in encoded {
        check_encoded(*category, raw).map_err(|e| e.with_op(OP))?;
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute(
        "INSERT INTO constraint_snapshots (name, created_at, created_by) VALUES (?1, ?2, ?3)",
        rusqlite::params![name, now_millis(), created_by],
    )
    .map_err(from_rusqlite)?;
    let id = tx.last_insert_rowid();
    for category in ConstraintCategory::ALL {
        let value = encoded.get(&category).map(String::as_str).unwrap_or("");
        tx.execute(
            "INSERT INTO constraint_snapshot_entries (snapshot_id, category_key, encoded)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![id, category.wire_key(), value],
        )
        .map_err(from_rusqlite)?;
    }
    tx.commit().map_err(from_rusqlite)?;

    get_constraints(conn, id)
}

fn check_encoded(category: ConstraintCategory, raw: &str) -> Result<()> {
    let decoded = codec::decode(raw, category.kind());
    let Some(w) = decoded.warnings.first() else {
        return Ok(());
    };
    if w.reason == codec::REASON_DUPLICATE {
        let course_code = codec::decode(&w.segment, category.kind())
            .entries
            .into_iter()
            .next()
            .map(|e| e.course_code)
            .unwrap_or_else(|| w.segment.clone());
        return Err(GridError::DuplicateCourseCode {
            category: category.slug().to_string(),
            course_code,
        }
        .into());
    }
    Err(ExError::new(ExErrorKind::InvalidInput)
        .with_entity_id(category.wire_key())
        .with_message(format!("cannot decode '{}': {}", w.segment, w.reason)))
}

/// Newest snapshot, if any
pub fn latest_constraints(conn: &Connection) -> Result<Option<ConstraintSnapshotRecord>> {
    let head: Option<(i64, String, i64, String)> = conn
        .query_row(
            "SELECT id, name, created_at, created_by FROM constraint_snapshots
             ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()
        .map_err(from_rusqlite)?;
    head.map(|h| build_record(conn, h)).transpose()
}

/// Every snapshot, newest first
pub fn constraint_history(conn: &Connection) -> Result<Vec<ConstraintSnapshotRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, created_at, created_by FROM constraint_snapshots
             ORDER BY created_at DESC, id DESC",
        )
        .map_err(from_rusqlite)?;
    let heads = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<(i64, String, i64, String)>, _>>()
        .map_err(from_rusqlite)?;
    heads.into_iter().map(|h| build_record(conn, h)).collect()
}

/// # Errors
///
/// `NotFound` if the snapshot does not exist.
pub fn get_constraints(conn: &Connection, snapshot_id: i64) -> Result<ConstraintSnapshotRecord> {
    let head: Option<(i64, String, i64, String)> = conn
        .query_row(
            "SELECT id, name, created_at, created_by FROM constraint_snapshots WHERE id = ?1",
            [snapshot_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()
        .map_err(from_rusqlite)?;
    match head {
        Some(h) => build_record(conn, h),
        None => Err(ExError::from(GridError::SnapshotNotFound {
            kind: "constraint".to_string(),
            snapshot_id,
        })
        .with_op("get_constraints")),
    }
}

pub fn constraint_snapshot_exists(conn: &Connection, snapshot_id: i64) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM constraint_snapshots WHERE id = ?1",
            [snapshot_id],
            |_| Ok(()),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}

/// Load a snapshot and decode every category
pub fn load_constraint_snapshot(conn: &Connection, snapshot_id: i64) -> Result<LoadedConstraints> {
    let record = get_constraints(conn, snapshot_id)?;
    let mut entries = BTreeMap::new();
    let mut warnings = Vec::new();
    for (category, raw) in &record.encoded {
        let decoded = codec::decode(raw, category.kind());
        warnings.extend(decoded.warnings.into_iter().map(|warning| CategoryWarning {
            category: *category,
            warning,
        }));
        entries.insert(*category, decoded.entries);
    }
    Ok(LoadedConstraints {
        snapshot: ConstraintSnapshot {
            id: record.id,
            name: record.name,
            date: record.date,
            created_by: record.created_by,
            entries,
        },
        warnings,
    })
}

fn build_record(
    conn: &Connection,
    (id, name, created_at, created_by): (i64, String, i64, String),
) -> Result<ConstraintSnapshotRecord> {
    let mut stmt = conn
        .prepare(
            "SELECT category_key, encoded FROM constraint_snapshot_entries WHERE snapshot_id = ?1",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([id], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    let mut encoded = BTreeMap::new();
    for (key, value) in rows {
        match ConstraintCategory::from_wire_key(&key) {
            Some(category) => {
                encoded.insert(category, value);
            }
            None => tracing::warn!(snapshot_id = id, category_key = %key, "unknown constraint category"),
        }
    }

    Ok(ConstraintSnapshotRecord {
        id,
        name,
        date: from_millis("load_constraints", "created_at", created_at)?,
        created_by,
        encoded,
    })
}
