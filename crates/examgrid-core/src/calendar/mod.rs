//! Period mapper
//!
//! Expands a session topology into the ordered list of examinable slots.
//! Slot identity is the zero-based `period_index`, so the same topology
//! and lock source must always yield the same mapping.

pub mod locks;

pub use locks::{HolidayCalendar, NoSystemLocks, SystemLockProvider};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::errors::Result;
use crate::model::{PeriodMapping, PeriodSlot, Topology};

/// Weekdays examined for a given `days_per_week`, Monday first
///
/// `days_per_week` values above 7 are clamped.
pub fn active_weekdays(days_per_week: u8) -> Vec<Weekday> {
    let mut day = Weekday::Mon;
    let mut out = Vec::with_capacity(days_per_week.min(7) as usize);
    for _ in 0..days_per_week.min(7) {
        out.push(day);
        day = day.succ();
    }
    out
}

/// Compute the period mapping for a topology
///
/// Slots are ordered by (week number, weekday Monday-first, period of day).
/// Week numbers count seven-day blocks from `start_date`, so when the
/// session starts on a Monday the order is plain chronological order.
///
/// # Errors
///
/// `InvalidTopology` when the topology fails validation, including a
/// calendar larger than `MAX_CALENDAR_SLOTS`. Nothing is allocated first.
pub fn compute_mapping(
    topology: &Topology,
    locks: &dyn SystemLockProvider,
) -> Result<PeriodMapping> {
    topology.validate()?;

    let active = active_weekdays(topology.days_per_week);
    let mut days: Vec<(u32, u32, NaiveDate)> = topology
        .start_date
        .iter_days()
        .take_while(|d| *d <= topology.end_date)
        .filter(|d| active.contains(&d.weekday()))
        .map(|d| {
            let offset = (d - topology.start_date).num_days();
            let week_number = (offset / 7) as u32 + 1;
            (week_number, d.weekday().num_days_from_monday(), d)
        })
        .collect();
    days.sort();

    // bounded by MAX_CALENDAR_SLOTS in validate
    let total_periods = days.len() as u32 * topology.periods_per_day;

    let mut periods = Vec::with_capacity(total_periods as usize);
    for (week_number, _, date) in days {
        for period_of_day in 1..=topology.periods_per_day {
            let period_index = periods.len() as u32;
            periods.push(PeriodSlot {
                period_index,
                display_index: period_index + 1,
                date,
                week_number,
                day_of_week: date.weekday(),
                period_of_day,
                is_system_locked: locks.is_locked(date, period_of_day),
            });
        }
    }

    Ok(PeriodMapping {
        total_periods,
        periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_active_weekdays_monday_first() {
        assert_eq!(
            active_weekdays(5),
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
        assert_eq!(active_weekdays(7).len(), 7);
        assert!(active_weekdays(0).is_empty());
    }

    #[test]
    fn test_mid_week_start_orders_within_week_by_weekday() {
        // Wednesday 8th to Tuesday 14th is a single seven-day block
        let topology = Topology::new(5, 1, date(2025, 1, 8), date(2025, 1, 14));
        let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();
        let days: Vec<_> = mapping.periods.iter().map(|p| p.day_of_week).collect();
        assert_eq!(
            days,
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri
            ]
        );
        assert!(mapping.periods.iter().all(|p| p.week_number == 1));
    }

    #[test]
    fn test_weekend_only_range_is_empty() {
        let topology = Topology::new(5, 3, date(2025, 1, 11), date(2025, 1, 12));
        let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();
        assert_eq!(mapping.total_periods, 0);
        assert!(mapping.periods.is_empty());
    }
}
