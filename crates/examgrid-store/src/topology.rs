//! Session settings repository (the topology provider)
//!
//! Append-only: every save creates a new version; the newest version is the
//! current topology.

#![allow(clippy::result_large_err)]

use examgrid_core::errors::{ExError, GridError};
use examgrid_core::model::{NewSessionSettings, SessionSettings, Topology};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::columns::{format_date, from_millis, now_millis, parse_date};
use crate::errors::{from_rusqlite, Result};

const SELECT_COLUMNS: &str = "SELECT id, description, session, semester, days_per_week,
        periods_per_day, start_date, end_date, created_at
     FROM session_settings";

struct SessionRow {
    id: i64,
    description: Option<String>,
    session: Option<String>,
    semester: Option<u8>,
    days_per_week: u8,
    periods_per_day: u32,
    start_date: String,
    end_date: String,
    created_at: i64,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            session: row.get(2)?,
            semester: row.get(3)?,
            days_per_week: row.get(4)?,
            periods_per_day: row.get(5)?,
            start_date: row.get(6)?,
            end_date: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    /// `exam_weeks` is recomputed from the stored dates
    fn into_settings(self) -> Result<SessionSettings> {
        const OP: &str = "load_topology";
        let start_date = parse_date(OP, "start_date", &self.start_date)?;
        let end_date = parse_date(OP, "end_date", &self.end_date)?;
        Ok(SessionSettings {
            id: self.id,
            description: self.description,
            session: self.session,
            semester: self.semester,
            topology: Topology::new(
                self.days_per_week,
                self.periods_per_day,
                start_date,
                end_date,
            ),
            created_at: from_millis(OP, "created_at", self.created_at)?,
        })
    }
}

/// Persist a new topology version
///
/// # Errors
///
/// - `InvalidTopology` if the dates or grid dimensions are invalid
/// - `Persistence` on database failure
pub fn save_topology(conn: &Connection, input: &NewSessionSettings) -> Result<SessionSettings> {
    let topology = input.topology();
    topology
        .validate()
        .map_err(|e| ExError::from(e).with_op("save_topology"))?;

    conn.execute(
        "INSERT INTO session_settings (description, session, semester, days_per_week,
            periods_per_day, exam_weeks, start_date, end_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            input.description,
            input.session,
            input.semester,
            topology.days_per_week,
            topology.periods_per_day,
            topology.exam_weeks,
            format_date(topology.start_date),
            format_date(topology.end_date),
            now_millis(),
        ],
    )
    .map_err(from_rusqlite)?;

    get_topology(conn, conn.last_insert_rowid())
}

/// Newest topology version, if any
pub fn current_topology(conn: &Connection) -> Result<Option<SessionSettings>> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT 1"),
            [],
            SessionRow::from_row,
        )
        .optional()
        .map_err(from_rusqlite)?;
    row.map(SessionRow::into_settings).transpose()
}

/// All topology versions, newest first
pub fn topology_history(conn: &Connection) -> Result<Vec<SessionSettings>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC"))
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], SessionRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    rows.into_iter().map(SessionRow::into_settings).collect()
}

/// # Errors
///
/// `NotFound` when no version has this id.
pub fn get_topology(conn: &Connection, id: i64) -> Result<SessionSettings> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id],
            SessionRow::from_row,
        )
        .optional()
        .map_err(from_rusqlite)?;
    match row {
        Some(row) => row.into_settings(),
        None => Err(ExError::from(GridError::TopologyNotFound { topology_id: id })
            .with_op("get_topology")),
    }
}

pub fn topology_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM session_settings WHERE id = ?1",
            [id],
            |_| Ok(()),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}
