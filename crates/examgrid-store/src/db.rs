//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::{Duration, Instant};

use examgrid_core::errors::{ExError, ExErrorKind};
use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path
///
/// Missing parent directories are created.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ExError::new(ExErrorKind::Persistence)
                .with_op("db_open")
                .with_entity_id(parent.display().to_string())
                .with_message(e.to_string())
        })?;
    }
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with optimal settings
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON")
        .map_err(from_rusqlite)?;

    // journal_mode returns a row, so it goes through query_row
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Connectivity probe with a bounded wait
///
/// Runs a trivial read with `timeout` as the busy timeout. A locked or
/// unreachable database yields `Timeout` / `NetworkFailure` instead of
/// blocking.
///
/// # Errors
///
/// - `Timeout` when the probe took longer than `timeout`
/// - `NetworkFailure` when the database is busy or cannot be opened
pub fn probe(conn: &Connection, timeout: Duration) -> Result<Duration> {
    conn.busy_timeout(timeout).map_err(from_rusqlite)?;
    let started = Instant::now();
    let result = conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    });
    let elapsed = started.elapsed();

    match result {
        Ok(_) if elapsed > timeout => Err(ExError::new(ExErrorKind::Timeout)
            .with_op("probe")
            .with_message(format!("probe took {}ms", elapsed.as_millis()))),
        Ok(_) => Ok(elapsed),
        Err(e) => {
            let err = from_rusqlite(e);
            if err.kind() == ExErrorKind::Persistence {
                Err(ExError::new(ExErrorKind::NetworkFailure)
                    .with_op("probe")
                    .with_message(err.message().to_string()))
            } else {
                Err(err.with_op("probe"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_in_memory() {
        let conn = open_in_memory().unwrap();
        let elapsed = probe(&conn, Duration::from_millis(500)).unwrap();
        assert!(elapsed < Duration::from_millis(500));
    }
}
