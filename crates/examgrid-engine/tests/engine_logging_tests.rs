#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{admin, session_with_context, setup_test_env};
use examgrid_core::logging_facility::test_capture::init_test_capture;
use examgrid_core::policy::{ops, AllowAllPolicy, DenyAllPolicy};
use examgrid_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use examgrid_engine::commands::exclusions::ExclusionWorkspace;

#[test]
fn test_save_logs_start_and_end_with_request_id() {
    let capture = init_test_capture();
    let (_tmp, mut conn) = setup_test_env();
    let (session, _) = session_with_context(&conn);
    let mut ws = ExclusionWorkspace::open(&conn, session.id).unwrap();
    let rc = admin();

    ws.save(&mut conn, &AllowAllPolicy, &rc, true, None).unwrap();

    // captured events are shared across tests; keep only this request's
    let request_id = rc.request_id.to_string();
    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(ops::SAVE_EXCLUSION)
            && e.event.as_deref() == Some(EVENT_START)
            && e.field("request_id") == Some(request_id.as_str())
    });
    assert_eq!(starts, 1);
    capture.assert_event_exists(ops::SAVE_EXCLUSION, EVENT_END);
}

#[test]
fn test_denied_activation_logs_error_code() {
    let capture = init_test_capture();
    let (_tmp, mut conn) = setup_test_env();
    let (session, _) = session_with_context(&conn);
    let mut ws = ExclusionWorkspace::open(&conn, session.id).unwrap();

    ws.activate(&mut conn, &DenyAllPolicy, &admin(), 1, None)
        .unwrap_err();

    let errors: Vec<_> = capture
        .events_for_op(ops::ACTIVATE_EXCLUSION)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert!(errors
        .iter()
        .any(|e| e.field("err_code") == Some("ERR_POLICY_DENIED")));
}
