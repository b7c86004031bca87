//! Calendar provider: period mapping for a stored topology

#![allow(clippy::result_large_err)]

use examgrid_core::model::{PeriodMapping, SessionSettings};
use examgrid_core::policy::{ops, ActorPolicy};
use examgrid_core_types::RequestContext;
use examgrid_store::errors::Result;
use examgrid_store::holidays::{self, settings_mapping, Holiday};
use examgrid_store::topology::get_topology;
use rusqlite::Connection;

use super::{authorize, logged};

/// Mapping for a session, with locks from the holiday calendar
pub fn mapping_for(conn: &Connection, settings: &SessionSettings) -> Result<PeriodMapping> {
    let mapping = settings_mapping(conn, settings)?;
    tracing::debug!(
        topology_id = settings.id,
        total_periods = mapping.total_periods,
        "computed period mapping"
    );
    Ok(mapping)
}

/// # Errors
///
/// `NotFound` if the topology does not exist, `InvalidTopology` if it
/// cannot produce a calendar.
pub fn period_mapping(conn: &Connection, topology_id: i64) -> Result<PeriodMapping> {
    let settings = get_topology(conn, topology_id)?;
    mapping_for(conn, &settings)
}

/// Record an institutional holiday; locks apply to every later mapping
pub fn add_holiday(
    conn: &Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    holiday: &Holiday,
) -> Result<()> {
    logged(ops::ADD_HOLIDAY, rc, || {
        authorize(policy, rc, ops::ADD_HOLIDAY)?;
        holidays::add_holiday(conn, holiday)
    })
}
