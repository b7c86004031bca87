//! Institutional holiday calendar (source of system-locked periods)

#![allow(clippy::result_large_err)]

use chrono::NaiveDate;
use examgrid_core::calendar::{compute_mapping, HolidayCalendar};
use examgrid_core::errors::{ExError, ExErrorKind};
use examgrid_core::model::{PeriodMapping, SessionSettings};
use rusqlite::Connection;
use serde::Serialize;

use crate::columns::{format_date, parse_date};
use crate::errors::{from_rusqlite, Result};
use crate::topology::get_topology;

/// One closure; `period_of_day = None` closes the whole day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub period_of_day: Option<u32>,
    pub label: Option<String>,
}

/// Record a closure. Re-adding an existing closure only updates its label.
pub fn add_holiday(conn: &Connection, holiday: &Holiday) -> Result<()> {
    if holiday.period_of_day == Some(0) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("add_holiday")
            .with_message("period of day is one-based"));
    }
    let date = format_date(holiday.date);
    // NULLs never conflict in a UNIQUE index, so whole-day rows are checked by hand
    let updated = conn
        .execute(
            "UPDATE institutional_holidays SET label = ?3
             WHERE holiday_date = ?1 AND period_of_day IS ?2",
            rusqlite::params![date, holiday.period_of_day, holiday.label],
        )
        .map_err(from_rusqlite)?;
    if updated == 0 {
        conn.execute(
            "INSERT INTO institutional_holidays (holiday_date, period_of_day, label)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![date, holiday.period_of_day, holiday.label],
        )
        .map_err(from_rusqlite)?;
    }
    Ok(())
}

/// All closures ordered by date then period (whole-day first)
pub fn list_holidays(conn: &Connection) -> Result<Vec<Holiday>> {
    let mut stmt = conn
        .prepare(
            "SELECT holiday_date, period_of_day, label FROM institutional_holidays
             ORDER BY holiday_date, period_of_day",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<u32>>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter()
        .map(|(date, period_of_day, label)| {
            Ok(Holiday {
                date: parse_date("list_holidays", "holiday_date", &date)?,
                period_of_day,
                label,
            })
        })
        .collect()
}

/// Build the lock provider handed to the period mapper
pub fn load_holiday_calendar(conn: &Connection) -> Result<HolidayCalendar> {
    Ok(list_holidays(conn)?
        .into_iter()
        .fold(HolidayCalendar::new(), |calendar, h| match h.period_of_day {
            None => calendar.close_day(h.date),
            Some(p) => calendar.close_slot(h.date, p),
        }))
}

/// Mapping for a session with the holidays recorded now
///
/// # Errors
///
/// `InvalidTopology` if the stored topology cannot produce a calendar.
pub fn settings_mapping(conn: &Connection, settings: &SessionSettings) -> Result<PeriodMapping> {
    let locks = load_holiday_calendar(conn)?;
    compute_mapping(&settings.topology, &locks)
        .map_err(|e| ExError::from(e).with_op("period_mapping"))
}

/// Mapping for a stored topology with the holidays recorded now
///
/// # Errors
///
/// `NotFound` if the topology does not exist.
pub fn topology_mapping(conn: &Connection, topology_id: i64) -> Result<PeriodMapping> {
    let settings = get_topology(conn, topology_id)?;
    settings_mapping(conn, &settings)
}
