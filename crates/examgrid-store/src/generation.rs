//! Generation request outbox
//!
//! The scheduler picks queued rows up out of process; recording the row is
//! the whole of the hand-off from this side.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use examgrid_core::errors::ExError;
use examgrid_core::generation::{GenerationAck, GenerationRequest, GenerationStatus, GenerationTrigger};
use rusqlite::Connection;
use serde::Serialize;

use crate::columns::{from_millis, now_millis};
use crate::errors::{from_rusqlite, Result};

/// A stored generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRecord {
    pub request_id: String,
    pub topology_id: i64,
    pub constraint_snapshot_id: i64,
    pub exclusion_snapshot_id: i64,
    pub requested_by: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Trigger that queues requests in `generation_requests`
pub struct SqliteGenerationQueue<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteGenerationQueue<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl GenerationTrigger for SqliteGenerationQueue<'_> {
    fn trigger(&self, request: &GenerationRequest) -> std::result::Result<GenerationAck, ExError> {
        let request_id = uuid::Uuid::now_v7().to_string();
        let status = GenerationStatus::Queued;
        self.conn
            .execute(
                "INSERT INTO generation_requests (request_id, topology_id, constraint_snapshot_id,
                    exclusion_snapshot_id, requested_by, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    request_id,
                    request.topology_id,
                    request.constraint_snapshot_id,
                    request.exclusion_snapshot_id,
                    request.requested_by,
                    status.as_str(),
                    now_millis(),
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("trigger_generation"))?;

        tracing::info!(request_id = %request_id, topology_id = request.topology_id, "generation queued");
        Ok(GenerationAck { request_id, status })
    }
}

/// Recorded requests, newest first
pub fn list_generation_requests(conn: &Connection) -> Result<Vec<GenerationRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT request_id, topology_id, constraint_snapshot_id, exclusion_snapshot_id,
                requested_by, status, created_at
             FROM generation_requests ORDER BY created_at DESC, rowid DESC",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter()
        .map(|(request_id, topology_id, constraint_snapshot_id, exclusion_snapshot_id, requested_by, status, created_at)| {
            Ok(GenerationRecord {
                request_id,
                topology_id,
                constraint_snapshot_id,
                exclusion_snapshot_id,
                requested_by,
                status,
                created_at: from_millis("list_generation_requests", "created_at", created_at)?,
            })
        })
        .collect()
}
