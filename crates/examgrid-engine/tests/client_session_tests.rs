#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{session_with_context, setup_test_env};
use examgrid_core::context::InstitutionalContext;
use examgrid_engine::commands::client::ClientSession;
use examgrid_engine::commands::topology::hydrate_context;
use examgrid_store::client_state::{legacy_keys, put_raw, ClientStateMigration};

#[test]
fn test_open_initializes_then_persists() {
    // GIVEN an empty database
    let (_tmp, mut conn) = setup_test_env();

    // WHEN a session opens, logs in and saves
    let (mut session, migration) = ClientSession::open(&mut conn).unwrap();
    assert_eq!(migration, ClientStateMigration::Initialized);
    assert!(session.username().is_none());
    session.login("registrar", Some("tok".to_string()));
    session.context_mut().set_constraint_snapshot_id(Some(12));
    session.save(&conn).unwrap();

    // THEN the next open sees the same state
    let (reopened, migration) = ClientSession::open(&mut conn).unwrap();
    assert_eq!(migration, ClientStateMigration::Current);
    assert_eq!(reopened.username(), Some("registrar"));
    assert_eq!(
        reopened.context().current().selected_constraint_snapshot_id,
        Some(12)
    );
}

#[test]
fn test_open_migrates_legacy_context() {
    let (_tmp, mut conn) = setup_test_env();
    put_raw(
        &conn,
        legacy_keys::INSTITUTIONAL_CONTEXT,
        r#"{"state":{"selectedGsId":1,"selectedExclusionId":4},"version":0}"#,
    )
    .unwrap();

    let (session, migration) = ClientSession::open(&mut conn).unwrap();

    assert!(matches!(migration, ClientStateMigration::Migrated { .. }));
    assert_eq!(session.context().current().selected_topology_id, Some(1));
    assert_eq!(
        session.context().current().selected_exclusion_snapshot_id,
        Some(4)
    );
}

#[test]
fn test_logout_clears_pointers_and_auth() {
    let (_tmp, mut conn) = setup_test_env();
    let (mut session, _) = ClientSession::open(&mut conn).unwrap();
    session.login("registrar", None);
    session.context_mut().select_topology(Some(2));
    session.context_mut().set_exclusion_snapshot_id(Some(3));

    session.logout();
    session.save(&conn).unwrap();

    let (reopened, _) = ClientSession::open(&mut conn).unwrap();
    assert!(reopened.auth().is_none());
    let context = reopened.context().current();
    assert_eq!(context.selected_topology_id, None);
    assert_eq!(context.selected_exclusion_snapshot_id, None);
    assert_eq!(context.topology, InstitutionalContext::default().topology);
}

#[test]
fn test_hydrate_prefers_selected_topology() {
    // GIVEN two topology versions with the older one selected
    let (_tmp, mut conn) = setup_test_env();
    let (first, _) = session_with_context(&conn);
    let (second, _) = session_with_context(&conn);
    let (mut session, _) = ClientSession::open(&mut conn).unwrap();
    session.context_mut().select_topology(Some(first.id));

    // WHEN the context is hydrated
    let hydrated = hydrate_context(&conn, session.context_mut()).unwrap();

    // THEN the selected version wins over the newest one
    assert_eq!(hydrated.map(|s| s.id), Some(first.id));
    let context = session.context().current();
    assert_eq!(context.selected_topology_id, Some(first.id));
    assert_eq!(
        context.active_topology.as_ref().and_then(|p| p.id),
        Some(first.id)
    );
    assert_ne!(first.id, second.id);
}

#[test]
fn test_hydrate_without_selection_adopts_newest() {
    let (_tmp, mut conn) = setup_test_env();
    session_with_context(&conn);
    let (newest, _) = session_with_context(&conn);
    let (mut session, _) = ClientSession::open(&mut conn).unwrap();

    hydrate_context(&conn, session.context_mut()).unwrap();

    assert_eq!(session.context().current().selected_topology_id, Some(newest.id));
    assert!(session.context().readiness().session);
}
