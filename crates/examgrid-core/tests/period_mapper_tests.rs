#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Days, NaiveDate, Weekday};
use examgrid_core::calendar::{compute_mapping, HolidayCalendar, NoSystemLocks};
use examgrid_core::errors::GridError;
use examgrid_core::model::Topology;
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_single_week_two_periods_per_day() {
    // GIVEN Mon 2025-01-06 to Fri 2025-01-10, 5 days x 2 periods
    let topology = Topology::new(5, 2, date(2025, 1, 6), date(2025, 1, 10));

    // WHEN computing the mapping
    let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();

    // THEN there are 10 slots in one week, Mon-P1 .. Fri-P2
    assert_eq!(topology.exam_weeks, 1);
    assert_eq!(mapping.total_periods, 10);
    assert!(mapping.periods.iter().all(|p| p.week_number == 1));

    let order: Vec<(Weekday, u32)> = mapping
        .periods
        .iter()
        .map(|p| (p.day_of_week, p.period_of_day))
        .collect();
    assert_eq!(
        order,
        vec![
            (Weekday::Mon, 1),
            (Weekday::Mon, 2),
            (Weekday::Tue, 1),
            (Weekday::Tue, 2),
            (Weekday::Wed, 1),
            (Weekday::Wed, 2),
            (Weekday::Thu, 1),
            (Weekday::Thu, 2),
            (Weekday::Fri, 1),
            (Weekday::Fri, 2),
        ]
    );
    for (i, slot) in mapping.periods.iter().enumerate() {
        assert_eq!(slot.period_index, i as u32);
        assert_eq!(slot.display_index, i as u32 + 1);
    }
}

#[test]
fn test_week_numbers_skip_inactive_days() {
    // Two full weeks; weekends are inactive but still count toward weeks
    let topology = Topology::new(5, 1, date(2025, 1, 6), date(2025, 1, 19));
    let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();

    assert_eq!(mapping.total_periods, 10);
    assert_eq!(mapping.get(4).unwrap().date, date(2025, 1, 10));
    assert_eq!(mapping.get(5).unwrap().date, date(2025, 1, 13));
    assert_eq!(mapping.get(5).unwrap().week_number, 2);
    assert_eq!(mapping.by_week().len(), 2);
}

#[test]
fn test_seven_day_week_includes_weekend() {
    let topology = Topology::new(7, 1, date(2025, 1, 6), date(2025, 1, 12));
    let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();
    assert_eq!(mapping.total_periods, 7);
    assert_eq!(mapping.get(6).unwrap().day_of_week, Weekday::Sun);
}

#[test]
fn test_lock_flags_come_from_provider() {
    let locks = HolidayCalendar::new()
        .close_day(date(2025, 1, 6))
        .close_slot(date(2025, 1, 8), 2);
    let topology = Topology::new(5, 2, date(2025, 1, 6), date(2025, 1, 10));

    let mapping = compute_mapping(&topology, &locks).unwrap();

    assert_eq!(
        mapping.system_locked_indices().into_iter().collect::<Vec<_>>(),
        vec![0, 1, 5]
    );
}

#[test]
fn test_invalid_topologies_are_rejected() {
    let inverted = Topology::new(5, 2, date(2025, 1, 10), date(2025, 1, 6));
    assert!(matches!(
        compute_mapping(&inverted, &NoSystemLocks),
        Err(GridError::InvalidTopology { .. })
    ));

    let no_periods = Topology::new(5, 0, date(2025, 1, 6), date(2025, 1, 10));
    assert!(matches!(
        compute_mapping(&no_periods, &NoSystemLocks),
        Err(GridError::InvalidTopology { .. })
    ));

    let no_days = Topology::new(0, 2, date(2025, 1, 6), date(2025, 1, 10));
    assert!(matches!(
        compute_mapping(&no_days, &NoSystemLocks),
        Err(GridError::InvalidTopology { .. })
    ));
}

#[test]
fn test_single_day_session() {
    let topology = Topology::new(5, 3, date(2025, 1, 7), date(2025, 1, 7));
    let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();
    assert_eq!(mapping.total_periods, 3);
    assert_eq!(topology.exam_weeks, 1);
}

#[test]
fn test_oversized_calendar_rejected_before_expansion() {
    // GIVEN a range of several centuries with many periods per day
    let topology = Topology::new(7, u32::MAX / 2, date(1900, 1, 1), date(2200, 12, 31));

    // WHEN computing the mapping
    let err = compute_mapping(&topology, &NoSystemLocks).unwrap_err();

    // THEN it fails as an invalid topology instead of allocating
    assert!(matches!(err, GridError::InvalidTopology { .. }));
}

fn arb_topology() -> impl Strategy<Value = Topology> {
    (1u8..=7, 1u32..=4, 0u64..400, 0u64..60).prop_map(|(days, periods, offset, len)| {
        let start = date(2024, 9, 1).checked_add_days(Days::new(offset)).unwrap();
        let end = start.checked_add_days(Days::new(len)).unwrap();
        Topology::new(days, periods, start, end)
    })
}

proptest! {
    #[test]
    fn prop_mapping_is_deterministic(topology in arb_topology()) {
        let a = compute_mapping(&topology, &NoSystemLocks).unwrap();
        let b = compute_mapping(&topology, &NoSystemLocks).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_indices_are_dense_and_ordered(topology in arb_topology()) {
        let mapping = compute_mapping(&topology, &NoSystemLocks).unwrap();
        prop_assert_eq!(mapping.periods.len() as u32, mapping.total_periods);
        for (i, slot) in mapping.periods.iter().enumerate() {
            prop_assert_eq!(slot.period_index, i as u32);
        }
        let keys: Vec<_> = mapping
            .periods
            .iter()
            .map(|p| (p.week_number, p.day_of_week.num_days_from_monday(), p.period_of_day))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}
