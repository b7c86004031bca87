//! In-memory working copy of an exclusion snapshot
//!
//! The buffer always contains the mapping's system-locked indices; no
//! operation here can remove them.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::model::{ExclusionSnapshot, PeriodMapping};

/// Default name for a buffer that was not loaded from a snapshot
pub fn default_exclusion_name(now: NaiveDateTime) -> String {
    format!("Exclusion Snapshot {}", now.format("%Y-%m-%d %H:%M"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionBuffer {
    name: String,
    excluded: BTreeSet<u32>,
    locked: BTreeSet<u32>,
    known: BTreeSet<u32>,
    source_snapshot_id: Option<i64>,
}

impl ExclusionBuffer {
    /// Buffer holding only the system-locked indices
    pub fn fresh(mapping: &PeriodMapping, now: NaiveDateTime) -> Self {
        let locked = mapping.system_locked_indices();
        Self {
            name: default_exclusion_name(now),
            excluded: locked.clone(),
            locked,
            known: mapping.all_indices(),
            source_snapshot_id: None,
        }
    }

    /// Buffer seeded from a stored snapshot, merged with current locks
    ///
    /// Stored indices that no longer exist in the mapping are dropped.
    pub fn from_snapshot(snapshot: &ExclusionSnapshot, mapping: &PeriodMapping) -> Self {
        let locked = mapping.system_locked_indices();
        let known = mapping.all_indices();
        let excluded = snapshot
            .excluded_periods
            .iter()
            .copied()
            .filter(|idx| known.contains(idx))
            .chain(locked.iter().copied())
            .collect();
        Self {
            name: snapshot.name.clone(),
            excluded,
            locked,
            known,
            source_snapshot_id: Some(snapshot.id),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn excluded(&self) -> &BTreeSet<u32> {
        &self.excluded
    }

    pub fn locked(&self) -> &BTreeSet<u32> {
        &self.locked
    }

    /// Exclusions chosen by the user, i.e. excluded minus locked
    pub fn manual(&self) -> BTreeSet<u32> {
        self.excluded.difference(&self.locked).copied().collect()
    }

    pub fn is_excluded(&self, period_index: u32) -> bool {
        self.excluded.contains(&period_index)
    }

    pub fn source_snapshot_id(&self) -> Option<i64> {
        self.source_snapshot_id
    }

    /// Flip one period. Returns whether anything changed.
    ///
    /// Locked or unknown indices are left alone.
    pub fn toggle(&mut self, period_index: u32) -> bool {
        if self.locked.contains(&period_index) || !self.known.contains(&period_index) {
            return false;
        }
        if !self.excluded.remove(&period_index) {
            self.excluded.insert(period_index);
        }
        true
    }

    /// Discard manual exclusions, keep locks
    pub fn clear_manual(&mut self) {
        self.excluded = self.locked.clone();
    }

    /// Exclude every known period
    pub fn select_all(&mut self) {
        self.excluded = self.known.clone();
    }

    /// Replace the contents with a confirmed snapshot
    pub fn restore(&mut self, snapshot: &ExclusionSnapshot, mapping: &PeriodMapping) {
        *self = Self::from_snapshot(snapshot, mapping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PeriodSlot;
    use chrono::{NaiveDate, Utc, Weekday};

    fn mapping(total: u32, locked: &[u32]) -> PeriodMapping {
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        PeriodMapping {
            total_periods: total,
            periods: (0..total)
                .map(|i| PeriodSlot {
                    period_index: i,
                    display_index: i + 1,
                    date,
                    week_number: 1,
                    day_of_week: Weekday::Mon,
                    period_of_day: i + 1,
                    is_system_locked: locked.contains(&i),
                })
                .collect(),
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_fresh_buffer_holds_only_locks() {
        let buffer = ExclusionBuffer::fresh(&mapping(6, &[0, 1]), now());
        assert_eq!(buffer.name(), "Exclusion Snapshot 2025-01-06 09:30");
        assert_eq!(buffer.excluded(), &BTreeSet::from([0, 1]));
        assert!(buffer.manual().is_empty());
    }

    #[test]
    fn test_toggle_ignores_locked_and_unknown() {
        let mut buffer = ExclusionBuffer::fresh(&mapping(6, &[0]), now());
        assert!(!buffer.toggle(0));
        assert!(!buffer.toggle(42));
        assert!(buffer.toggle(3));
        assert!(buffer.is_excluded(3));
        assert!(buffer.toggle(3));
        assert!(!buffer.is_excluded(3));
        assert!(buffer.is_excluded(0));
    }

    #[test]
    fn test_clear_and_select_all_keep_locks() {
        let mut buffer = ExclusionBuffer::fresh(&mapping(4, &[2]), now());
        buffer.select_all();
        assert_eq!(buffer.excluded(), &BTreeSet::from([0, 1, 2, 3]));
        buffer.clear_manual();
        assert_eq!(buffer.excluded(), &BTreeSet::from([2]));
    }

    #[test]
    fn test_from_snapshot_merges_locks_and_drops_stale_indices() {
        let snapshot = ExclusionSnapshot {
            id: 9,
            topology_id: 1,
            name: "v1".to_string(),
            excluded_periods: BTreeSet::from([3, 99]),
            is_active: true,
            created_at: Utc::now(),
            created_by: "admin".to_string(),
        };
        let buffer = ExclusionBuffer::from_snapshot(&snapshot, &mapping(6, &[0, 1]));
        assert_eq!(buffer.excluded(), &BTreeSet::from([0, 1, 3]));
        assert_eq!(buffer.source_snapshot_id(), Some(9));
        assert_eq!(buffer.name(), "v1");
    }
}
