//! Calendar slots produced by the period mapper

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One examinable (date, period-of-day) slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSlot {
    /// Zero-based position in the mapping; the identity used by exclusions
    pub period_index: u32,
    /// One-based label shown to users
    pub display_index: u32,
    pub date: NaiveDate,
    /// One-based week counted from the session start date
    pub week_number: u32,
    pub day_of_week: Weekday,
    /// One-based period within the day
    pub period_of_day: u32,
    pub is_system_locked: bool,
}

/// Ordered, gap-free list of slots for one topology
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMapping {
    pub total_periods: u32,
    pub periods: Vec<PeriodSlot>,
}

impl PeriodMapping {
    pub fn get(&self, period_index: u32) -> Option<&PeriodSlot> {
        self.periods.get(period_index as usize)
    }

    pub fn contains(&self, period_index: u32) -> bool {
        period_index < self.total_periods
    }

    pub fn all_indices(&self) -> BTreeSet<u32> {
        (0..self.total_periods).collect()
    }

    /// Indices the institution has closed
    pub fn system_locked_indices(&self) -> BTreeSet<u32> {
        self.periods
            .iter()
            .filter(|p| p.is_system_locked)
            .map(|p| p.period_index)
            .collect()
    }

    /// Slots grouped by week number, each group in mapping order
    pub fn by_week(&self) -> BTreeMap<u32, Vec<&PeriodSlot>> {
        let mut weeks: BTreeMap<u32, Vec<&PeriodSlot>> = BTreeMap::new();
        for slot in &self.periods {
            weeks.entry(slot.week_number).or_default().push(slot);
        }
        weeks
    }
}
