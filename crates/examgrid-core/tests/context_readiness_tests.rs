#![allow(clippy::unwrap_used, clippy::expect_used)]

use examgrid_core::context::InstitutionalContext;
use examgrid_core::errors::GridError;
use examgrid_core::generation::GenerationRequest;
use examgrid_core::model::TopologyPayload;
use proptest::prelude::*;

fn ready_context() -> InstitutionalContext {
    InstitutionalContext::default()
        .with_active_topology(TopologyPayload {
            id: Some(5),
            session: Some("2024/2025".to_string()),
            semester: Some(1),
            days_per_week: Some(5),
            periods_per_day: Some(3),
            ..Default::default()
        })
        .with_constraint_snapshot(Some(11))
        .with_exclusion_snapshot(Some(22))
}

#[test]
fn test_fully_configured_context_is_ready() {
    let ctx = ready_context();
    assert!(ctx.readiness().is_ready());

    let request = GenerationRequest::from_context(&ctx, "admin").unwrap();
    assert_eq!(request.topology_id, 5);
    assert_eq!(request.constraint_snapshot_id, 11);
    assert_eq!(request.exclusion_snapshot_id, 22);
}

#[test]
fn test_gate_lists_missing_items() {
    let ctx = ready_context().with_exclusion_snapshot(None);
    let err = GenerationRequest::from_context(&ctx, "admin").unwrap_err();
    assert_eq!(
        err,
        GridError::NotReady {
            missing: vec!["exclusions".to_string()]
        }
    );
}

#[test]
fn test_missing_semester_blocks_generation() {
    let mut ctx = ready_context();
    if let Some(payload) = ctx.active_topology.as_mut() {
        payload.semester = None;
    }
    let readiness = ctx.readiness();
    assert!(!readiness.semester);
    assert!(readiness.session);
    assert!(!readiness.is_ready());
}

#[derive(Debug, Clone, Copy)]
enum Pointer {
    Topology,
    Constraint,
    Exclusion,
}

proptest! {
    #[test]
    fn prop_clearing_one_pointer_flips_only_its_item(
        pointer in prop_oneof![
            Just(Pointer::Topology),
            Just(Pointer::Constraint),
            Just(Pointer::Exclusion)
        ]
    ) {
        let before = ready_context().readiness();
        let ctx = match pointer {
            Pointer::Topology => ready_context().with_selected_topology(None),
            Pointer::Constraint => ready_context().with_constraint_snapshot(None),
            Pointer::Exclusion => ready_context().with_exclusion_snapshot(None),
        };
        let after = ctx.readiness();

        let changed: Vec<&str> = before
            .items()
            .iter()
            .zip(after.items().iter())
            .filter(|(b, a)| b.1 != a.1)
            .map(|(b, _)| b.0)
            .collect();
        let expected = match pointer {
            Pointer::Topology => "grid",
            Pointer::Constraint => "constraints",
            Pointer::Exclusion => "exclusions",
        };
        prop_assert_eq!(changed, vec![expected]);
    }
}
