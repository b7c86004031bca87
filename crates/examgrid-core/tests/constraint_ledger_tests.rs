#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use examgrid_core::errors::{ExError, ExErrorKind, GridError};
use examgrid_core::ledger::ConstraintLedger;
use examgrid_core::model::{ConstraintCategory, ConstraintEntry, ConstraintItems};

fn no_exclusions() -> BTreeSet<u32> {
    BTreeSet::new()
}

#[test]
fn test_duplicate_course_rejected_without_mutation() {
    // GIVEN a ledger with CSC301 in period-inclusive-exam
    let mut ledger = ConstraintLedger::new("draft");
    ledger
        .add_entry(
            ConstraintCategory::PeriodInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![3]),
            &no_exclusions(),
        )
        .unwrap();

    // WHEN adding CSC301 again
    let err = ledger
        .add_entry(
            ConstraintCategory::PeriodInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![7]),
            &no_exclusions(),
        )
        .unwrap_err();

    // THEN the add fails and the ledger is unchanged
    assert!(matches!(err, GridError::DuplicateCourseCode { .. }));
    assert_eq!(
        ledger.entries(ConstraintCategory::PeriodInclusiveExam),
        &[ConstraintEntry::periods("CSC301", vec![3])]
    );
    assert_eq!(
        ExError::from(err).kind(),
        ExErrorKind::DuplicateCourseCode
    );
}

#[test]
fn test_same_course_allowed_in_different_categories() {
    let mut ledger = ConstraintLedger::new("draft");
    ledger
        .add_entry(
            ConstraintCategory::PeriodInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![3]),
            &no_exclusions(),
        )
        .unwrap();
    ledger
        .add_entry(
            ConstraintCategory::PeriodExclusiveExam,
            ConstraintEntry::periods("CSC301", vec![4]),
            &no_exclusions(),
        )
        .unwrap();
    assert!(ledger.validate().is_ok());
}

#[test]
fn test_excluded_periods_conflict() {
    let mut ledger = ConstraintLedger::new("draft");
    let excluded = BTreeSet::from([0, 1, 5]);

    let err = ledger
        .add_entry(
            ConstraintCategory::PeriodInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![1, 2, 5]),
            &excluded,
        )
        .unwrap_err();

    assert_eq!(
        err,
        GridError::PeriodConflict {
            course_code: "CSC301".to_string(),
            periods: vec![1, 5]
        }
    );
    assert!(ledger.is_empty());
}

#[test]
fn test_kind_mismatch_rejected() {
    let mut ledger = ConstraintLedger::new("draft");
    let err = ledger
        .add_entry(
            ConstraintCategory::VenueInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![1]),
            &no_exclusions(),
        )
        .unwrap_err();
    assert!(matches!(err, GridError::KindMismatch { .. }));
}

#[test]
fn test_update_and_remove_entry() {
    let mut ledger = ConstraintLedger::new("draft");
    let category = ConstraintCategory::VenueExclusiveExam;
    ledger
        .add_entry(
            category,
            ConstraintEntry::venues("CSC301", vec!["LT1".to_string()]),
            &no_exclusions(),
        )
        .unwrap();

    ledger
        .update_entry(
            category,
            "CSC301",
            ConstraintItems::Venues(vec!["LT2".to_string()]),
            &no_exclusions(),
        )
        .unwrap();
    assert_eq!(
        ledger.entries(category)[0].items,
        ConstraintItems::Venues(vec!["LT2".to_string()])
    );

    let missing = ledger.update_entry(
        category,
        "MTH101",
        ConstraintItems::Venues(vec![]),
        &no_exclusions(),
    );
    assert!(matches!(missing, Err(GridError::EntryNotFound { .. })));

    assert!(ledger.remove_entry(category, "CSC301").is_some());
    assert!(ledger.remove_entry(category, "CSC301").is_none());
    assert!(ledger.entries(category).is_empty());
}

#[test]
fn test_encode_all_uses_wire_form() {
    let mut ledger = ConstraintLedger::new("draft");
    ledger
        .add_entry(
            ConstraintCategory::PeriodInclusiveExam,
            ConstraintEntry::periods("CSC301", vec![3, 7]),
            &no_exclusions(),
        )
        .unwrap();
    ledger
        .add_entry(
            ConstraintCategory::FrontLoadedExam,
            ConstraintEntry::venues("GST101", vec![]),
            &no_exclusions(),
        )
        .unwrap();

    let encoded = ledger.encode_all().unwrap();
    assert_eq!(encoded[&ConstraintCategory::PeriodInclusiveExam], "CSC301(3,7)");
    assert_eq!(encoded[&ConstraintCategory::FrontLoadedExam], "GST101");
    assert_eq!(encoded[&ConstraintCategory::ExamAfterExam], "");
}
