//! Topology provider commands

#![allow(clippy::result_large_err)]

use examgrid_core::context::ContextStore;
use examgrid_core::model::{NewSessionSettings, SessionSettings};
use examgrid_core::policy::{ops, ActorPolicy};
use examgrid_core_types::RequestContext;
use examgrid_store::errors::Result;
use examgrid_store::topology;
use rusqlite::Connection;

use super::{authorize, logged};

/// Persist a new topology version and make it the active payload
///
/// The context adopts the new id only if no topology was selected.
pub fn save_topology(
    conn: &Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    input: &NewSessionSettings,
    context: &mut ContextStore,
) -> Result<SessionSettings> {
    logged(ops::SAVE_TOPOLOGY, rc, || {
        authorize(policy, rc, ops::SAVE_TOPOLOGY)?;
        let saved = topology::save_topology(conn, input)?;
        context.set_active_topology(saved.to_payload());
        Ok(saved)
    })
}

/// Explicitly select a stored topology
pub fn select_topology(
    conn: &Connection,
    topology_id: i64,
    context: &mut ContextStore,
) -> Result<SessionSettings> {
    let settings = topology::get_topology(conn, topology_id)?;
    context.select_topology(Some(settings.id));
    context.set_active_topology(settings.to_payload());
    Ok(settings)
}

/// Refresh the active payload from the store
///
/// Uses the selected topology when there is one, otherwise the newest
/// version. A selected id that no longer resolves is left as is; the
/// generation gate reports it.
pub fn hydrate_context(
    conn: &Connection,
    context: &mut ContextStore,
) -> Result<Option<SessionSettings>> {
    let settings = match context.current().selected_topology_id {
        Some(id) => match topology::get_topology(conn, id) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!(topology_id = id, error = %err, "selected topology did not resolve");
                None
            }
        },
        None => topology::current_topology(conn)?,
    };
    if let Some(settings) = &settings {
        context.set_active_topology(settings.to_payload());
    }
    Ok(settings)
}
