//! Conversions between stored column values and domain types

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{bad_column, Result};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(op: &str, column: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| bad_column(op, column, e))
}

pub(crate) fn from_millis(op: &str, column: &str, ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| bad_column(op, column, format!("timestamp {ms} out of range")))
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
