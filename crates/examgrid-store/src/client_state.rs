//! Client-persisted state
//!
//! The institutional context and the auth session live in one versioned
//! JSON document under [`CLIENT_STATE_KEY`]. Older installs kept them under
//! several separate keys; [`migrate_client_state`] folds those into the
//! document once and removes them.
//!
//! Corrupt or missing data never fails a load: it falls back to defaults
//! and logs a warning. Only storage failures are errors.

#![allow(clippy::result_large_err)]

use examgrid_core::context::InstitutionalContext;
use examgrid_core::errors::{ExError, ExErrorKind};
use examgrid_core::model::{GridShape, TopologyPayload};
use examgrid_core_types::Sensitive;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::columns::now_millis;
use crate::errors::{from_rusqlite, Result};

pub const CLIENT_STATE_KEY: &str = "examgrid.client_state";
pub const CLIENT_STATE_SCHEMA_VERSION: u32 = 1;

/// Keys written by earlier clients
pub mod legacy_keys {
    pub const INSTITUTIONAL_CONTEXT: &str = "institutional-context";
    pub const USER_DATA: &str = "user_data";
    pub const USERNAME: &str = "username";
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const TOKEN: &str = "token";

    pub const ALL: [&str; 5] = [INSTITUTIONAL_CONTEXT, USER_DATA, USERNAME, AUTH_TOKEN, TOKEN];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub username: String,
    pub token: Option<Sensitive<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    pub schema_version: u32,
    #[serde(default)]
    pub context: InstitutionalContext,
    #[serde(default)]
    pub auth: Option<AuthSession>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            schema_version: CLIENT_STATE_SCHEMA_VERSION,
            context: InstitutionalContext::default(),
            auth: None,
        }
    }
}

/// What the startup migration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientStateMigration {
    /// The versioned document already existed
    Current,
    /// Legacy keys were consolidated and removed
    Migrated { legacy_keys: Vec<String> },
    /// Nothing stored; defaults written
    Initialized,
}

fn get_raw(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM client_state WHERE state_key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Store a raw value under `key`
pub fn put_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO client_state (state_key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(state_key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        rusqlite::params![key, value, now_millis()],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// Load the client state document
///
/// Missing, unparsable or future-versioned documents yield defaults.
pub fn load_client_state(conn: &Connection) -> Result<ClientState> {
    let Some(raw) = get_raw(conn, CLIENT_STATE_KEY)? else {
        return Ok(ClientState::default());
    };
    match serde_json::from_str::<ClientState>(&raw) {
        Ok(state) if state.schema_version == CLIENT_STATE_SCHEMA_VERSION => Ok(state),
        Ok(state) => {
            tracing::warn!(
                schema_version = state.schema_version,
                "unsupported client state version, using defaults"
            );
            Ok(ClientState::default())
        }
        Err(e) => {
            tracing::warn!(error = %e, "corrupt client state, using defaults");
            Ok(ClientState::default())
        }
    }
}

pub fn save_client_state(conn: &Connection, state: &ClientState) -> Result<()> {
    let raw = serde_json::to_string(state).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("save_client_state")
            .with_message(e.to_string())
    })?;
    put_raw(conn, CLIENT_STATE_KEY, &raw)
}

/// Zustand-style envelope used by the old context store
#[derive(Deserialize)]
struct LegacyEnvelope {
    state: LegacyContext,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct LegacyContext {
    selected_gs_id: Option<i64>,
    selected_constraint_id: Option<i64>,
    selected_exclusion_id: Option<i64>,
    topology: Option<GridShape>,
    #[serde(rename = "activeGS")]
    active_gs: Option<TopologyPayload>,
}

impl From<LegacyContext> for InstitutionalContext {
    fn from(legacy: LegacyContext) -> Self {
        InstitutionalContext {
            selected_topology_id: legacy.selected_gs_id,
            selected_constraint_snapshot_id: legacy.selected_constraint_id,
            selected_exclusion_snapshot_id: legacy.selected_exclusion_id,
            topology: legacy.topology.unwrap_or_default(),
            active_topology: legacy.active_gs,
        }
    }
}

#[derive(Deserialize)]
struct LegacyUser {
    username: String,
}

fn legacy_context(raw: &str) -> InstitutionalContext {
    match serde_json::from_str::<LegacyEnvelope>(raw) {
        Ok(envelope) => envelope.state.into(),
        Err(e) => {
            tracing::warn!(error = %e, "corrupt legacy institutional context, using defaults");
            InstitutionalContext::default()
        }
    }
}

fn legacy_auth(
    user_data: Option<String>,
    username: Option<String>,
    token: Option<String>,
) -> Option<AuthSession> {
    let from_user_data = user_data.and_then(|raw| match serde_json::from_str::<LegacyUser>(&raw) {
        Ok(user) => Some(user.username),
        Err(e) => {
            tracing::warn!(error = %e, "corrupt legacy user data, ignoring");
            None
        }
    });
    let username = from_user_data
        .or(username)
        .filter(|u| !u.trim().is_empty())?;
    Some(AuthSession {
        username,
        token: token.filter(|t| !t.is_empty()).map(Sensitive::new),
    })
}

/// Consolidate legacy keys into the versioned document
///
/// Runs once per startup; a no-op when the document already exists.
pub fn migrate_client_state(conn: &mut Connection) -> Result<ClientStateMigration> {
    if get_raw(conn, CLIENT_STATE_KEY)?.is_some() {
        return Ok(ClientStateMigration::Current);
    }

    let mut found = Vec::new();
    let mut read = |key: &str| -> Result<Option<String>> {
        let value = get_raw(conn, key)?;
        if value.is_some() {
            found.push(key.to_string());
        }
        Ok(value)
    };
    let context_raw = read(legacy_keys::INSTITUTIONAL_CONTEXT)?;
    let user_data = read(legacy_keys::USER_DATA)?;
    let username = read(legacy_keys::USERNAME)?;
    let auth_token = read(legacy_keys::AUTH_TOKEN)?;
    let token = read(legacy_keys::TOKEN)?;

    let state = ClientState {
        schema_version: CLIENT_STATE_SCHEMA_VERSION,
        context: context_raw
            .as_deref()
            .map(legacy_context)
            .unwrap_or_default(),
        auth: legacy_auth(user_data, username, auth_token.or(token)),
    };

    let raw = serde_json::to_string(&state).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("migrate_client_state")
            .with_message(e.to_string())
    })?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    put_raw(&tx, CLIENT_STATE_KEY, &raw)?;
    for key in legacy_keys::ALL {
        tx.execute("DELETE FROM client_state WHERE state_key = ?1", [key])
            .map_err(from_rusqlite)?;
    }
    tx.commit().map_err(from_rusqlite)?;

    if found.is_empty() {
        Ok(ClientStateMigration::Initialized)
    } else {
        tracing::info!(legacy_keys = ?found, "migrated legacy client state");
        Ok(ClientStateMigration::Migrated { legacy_keys: found })
    }
}
