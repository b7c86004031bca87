//! Exclusion snapshots: named sets of period indices closed to examination

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when a snapshot is saved without one
pub const UNTITLED_SNAPSHOT_NAME: &str = "Untitled Snapshot";

/// A persisted exclusion snapshot
///
/// `excluded_periods` always contains the system-locked indices that were
/// known when the snapshot was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionSnapshot {
    pub id: i64,
    pub topology_id: i64,
    pub name: String,
    pub excluded_periods: BTreeSet<u32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// Input for appending a new exclusion snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExclusionSnapshot {
    pub topology_id: i64,
    pub name: String,
    pub excluded_periods: BTreeSet<u32>,
    pub created_by: String,
}

impl NewExclusionSnapshot {
    /// Blank names fall back to [`UNTITLED_SNAPSHOT_NAME`]
    pub fn resolved_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            UNTITLED_SNAPSHOT_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Comma-separated storage form, ascending
pub fn encode_period_set(periods: &BTreeSet<u32>) -> String {
    periods
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the storage form, skipping blank or non-numeric items
pub fn decode_period_set(raw: &str) -> BTreeSet<u32> {
    raw.split(',')
        .filter_map(|item| item.trim().parse::<u32>().ok())
        .collect()
}
