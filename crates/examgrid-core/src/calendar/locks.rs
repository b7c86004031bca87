//! Sources of system-locked slots (public holidays, closures)

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Decides whether a calendar slot is closed by the institution
pub trait SystemLockProvider {
    fn is_locked(&self, date: NaiveDate, period_of_day: u32) -> bool;
}

/// Lock source with no closures
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSystemLocks;

impl SystemLockProvider for NoSystemLocks {
    fn is_locked(&self, _date: NaiveDate, _period_of_day: u32) -> bool {
        false
    }
}

/// Closures declared per day or per slot
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use examgrid_core::calendar::{HolidayCalendar, SystemLockProvider};
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
/// let calendar = HolidayCalendar::new().close_slot(day, 2);
///
/// assert!(calendar.is_locked(day, 2));
/// assert!(!calendar.is_locked(day, 1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    closed_days: BTreeSet<NaiveDate>,
    closed_slots: BTreeSet<(NaiveDate, u32)>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every period on `date`
    pub fn close_day(mut self, date: NaiveDate) -> Self {
        self.closed_days.insert(date);
        self
    }

    /// Lock one period (one-based) on `date`
    pub fn close_slot(mut self, date: NaiveDate, period_of_day: u32) -> Self {
        self.closed_slots.insert((date, period_of_day));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.closed_days.is_empty() && self.closed_slots.is_empty()
    }
}

impl SystemLockProvider for HolidayCalendar {
    fn is_locked(&self, date: NaiveDate, period_of_day: u32) -> bool {
        self.closed_days.contains(&date) || self.closed_slots.contains(&(date, period_of_day))
    }
}
