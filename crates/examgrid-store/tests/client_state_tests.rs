#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::setup_test_env;
use examgrid_core::context::InstitutionalContext;
use examgrid_core_types::Sensitive;
use examgrid_store::client_state::{
    legacy_keys, load_client_state, migrate_client_state, put_raw, save_client_state,
    AuthSession, ClientState, ClientStateMigration, CLIENT_STATE_KEY,
};

fn key_exists(conn: &rusqlite::Connection, key: &str) -> bool {
    conn.query_row(
        "SELECT count(*) FROM client_state WHERE state_key = ?1",
        [key],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        > 0
}

#[test]
fn test_missing_state_loads_defaults() {
    let (_tmp, conn) = setup_test_env();
    let state = load_client_state(&conn).unwrap();
    assert_eq!(state, ClientState::default());
    assert!(state.auth.is_none());
}

#[test]
fn test_corrupt_state_loads_defaults() {
    let (_tmp, conn) = setup_test_env();
    put_raw(&conn, CLIENT_STATE_KEY, "{not json").unwrap();
    assert_eq!(load_client_state(&conn).unwrap(), ClientState::default());

    put_raw(&conn, CLIENT_STATE_KEY, r#"{"schemaVersion": 99}"#).unwrap();
    assert_eq!(load_client_state(&conn).unwrap(), ClientState::default());
}

#[test]
fn test_save_and_load_round_trip() {
    let (_tmp, conn) = setup_test_env();
    let state = ClientState {
        context: InstitutionalContext::default().with_constraint_snapshot(Some(4)),
        auth: Some(AuthSession {
            username: "registrar".to_string(),
            token: Some(Sensitive::new("secret".to_string())),
        }),
        ..ClientState::default()
    };

    save_client_state(&conn, &state).unwrap();
    assert_eq!(load_client_state(&conn).unwrap(), state);
}

#[test]
fn test_legacy_keys_are_consolidated_once() {
    let (_tmp, mut conn) = setup_test_env();
    put_raw(
        &conn,
        legacy_keys::INSTITUTIONAL_CONTEXT,
        r#"{"state":{"selectedGsId":3,"selectedConstraintId":7,"selectedExclusionId":null,
            "topology":{"daysPerWeek":6,"periodsPerDay":2,"examWeeks":3},
            "activeGS":{"id":3,"session":"2024/2025","semester":2}},"version":0}"#,
    )
    .unwrap();
    put_raw(&conn, legacy_keys::USER_DATA, r#"{"id":"1","username":"registrar","role":"ADMIN"}"#)
        .unwrap();
    put_raw(&conn, legacy_keys::USERNAME, "ignored-when-user-data-present").unwrap();
    put_raw(&conn, legacy_keys::TOKEN, "legacy-token").unwrap();

    let outcome = migrate_client_state(&mut conn).unwrap();

    match outcome {
        ClientStateMigration::Migrated { legacy_keys } => assert_eq!(legacy_keys.len(), 4),
        other => panic!("unexpected outcome {other:?}"),
    }
    let state = load_client_state(&conn).unwrap();
    assert_eq!(state.context.selected_topology_id, Some(3));
    assert_eq!(state.context.selected_constraint_snapshot_id, Some(7));
    assert_eq!(state.context.selected_exclusion_snapshot_id, None);
    assert_eq!(state.context.topology.days_per_week, 6);
    assert_eq!(
        state.context.active_topology.as_ref().and_then(|p| p.semester),
        Some(2)
    );
    let auth = state.auth.unwrap();
    assert_eq!(auth.username, "registrar");
    assert_eq!(auth.token.unwrap().expose(), "legacy-token");

    for key in legacy_keys::ALL {
        assert!(!key_exists(&conn, key), "{key} should be removed");
    }
    assert_eq!(
        migrate_client_state(&mut conn).unwrap(),
        ClientStateMigration::Current
    );
}

#[test]
fn test_corrupt_legacy_context_falls_back() {
    let (_tmp, mut conn) = setup_test_env();
    put_raw(&conn, legacy_keys::INSTITUTIONAL_CONTEXT, "garbage").unwrap();
    put_raw(&conn, legacy_keys::USERNAME, "registrar").unwrap();

    migrate_client_state(&mut conn).unwrap();

    let state = load_client_state(&conn).unwrap();
    assert_eq!(state.context, InstitutionalContext::default());
    assert_eq!(state.auth.map(|a| a.username).as_deref(), Some("registrar"));
}

#[test]
fn test_fresh_install_initializes() {
    let (_tmp, mut conn) = setup_test_env();
    assert_eq!(
        migrate_client_state(&mut conn).unwrap(),
        ClientStateMigration::Initialized
    );
    assert!(key_exists(&conn, CLIENT_STATE_KEY));
}
