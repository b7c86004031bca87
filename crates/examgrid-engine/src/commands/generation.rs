//! Generation gate
//!
//! Readiness is a pure pointer check; before handing off, the pointers
//! are resolved against live history so a stale id never reaches the
//! scheduler.

#![allow(clippy::result_large_err)]

use examgrid_core::context::InstitutionalContext;
use examgrid_core::errors::{ExError, ExErrorKind, GridError};
use examgrid_core::generation::{GenerationAck, GenerationRequest, GenerationTrigger};
use examgrid_core::policy::{ops, ActorPolicy};
use examgrid_core_types::RequestContext;
use examgrid_store::constraints::constraint_snapshot_exists;
use examgrid_store::errors::Result;
use examgrid_store::exclusions::get_exclusion;
use examgrid_store::topology::topology_exists;
use rusqlite::Connection;

use super::{authorize, logged};

fn stale(kind: &str, snapshot_id: i64) -> ExError {
    ExError::from(GridError::SnapshotNotFound {
        kind: kind.to_string(),
        snapshot_id,
    })
    .with_op(ops::REQUEST_GENERATION)
}

/// Resolve the three pointers against what is stored
///
/// # Errors
///
/// `NotFound` for a topology or snapshot that no longer exists, or an
/// exclusion snapshot that belongs to another topology.
pub fn validate_pointers(conn: &Connection, request: &GenerationRequest) -> Result<()> {
    if !topology_exists(conn, request.topology_id)? {
        return Err(ExError::from(GridError::TopologyNotFound {
            topology_id: request.topology_id,
        })
        .with_op(ops::REQUEST_GENERATION));
    }
    if !constraint_snapshot_exists(conn, request.constraint_snapshot_id)? {
        return Err(stale("constraint", request.constraint_snapshot_id));
    }
    let exclusion = get_exclusion(conn, request.exclusion_snapshot_id)
        .map_err(|e| match e.kind() {
            ExErrorKind::NotFound => stale("exclusion", request.exclusion_snapshot_id),
            _ => e,
        })?;
    if exclusion.topology_id != request.topology_id {
        return Err(stale("exclusion", request.exclusion_snapshot_id));
    }
    Ok(())
}

/// Gate, validate, then hand off to the scheduler
pub fn request_generation(
    conn: &Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    context: &InstitutionalContext,
    trigger: &dyn GenerationTrigger,
) -> Result<GenerationAck> {
    logged(ops::REQUEST_GENERATION, rc, || {
        authorize(policy, rc, ops::REQUEST_GENERATION)?;
        let request = GenerationRequest::from_context(context, &rc.actor)
            .map_err(|e| ExError::from(e).with_op(ops::REQUEST_GENERATION))?;
        validate_pointers(conn, &request)?;
        trigger.trigger(&request)
    })
}
