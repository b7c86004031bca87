//! Engine commands grouped by configuration axis

#![allow(clippy::result_large_err)]

pub mod calendar;
pub mod client;
pub mod constraints;
pub mod engine_command;
pub mod exclusions;
pub mod generation;
pub mod topology;

use std::time::Instant;

use examgrid_core::errors::ExError;
use examgrid_core::policy::ActorPolicy;
use examgrid_core::{log_op_end, log_op_error, log_op_start};
use examgrid_core_types::RequestContext;
use examgrid_store::errors::Result;

/// Attach correlation ids to an error leaving the engine
pub(crate) fn correlate(err: ExError, rc: &RequestContext) -> ExError {
    let err = err.with_request_id(rc.request_id.clone());
    match &rc.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}

/// Policy gate run before any write
pub(crate) fn authorize(policy: &dyn ActorPolicy, rc: &RequestContext, op: &str) -> Result<()> {
    policy
        .check(&rc.actor, op)
        .map_err(|e| correlate(ExError::from(e), rc))
}

/// Run `f` between start/end log events; errors get the request's ids
pub(crate) fn logged<T>(
    op: &'static str,
    rc: &RequestContext,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let started = Instant::now();
    log_op_start!(op, request_id = %rc.request_id, actor = %rc.actor);
    match f() {
        Ok(value) => {
            log_op_end!(op, duration_ms = started.elapsed().as_millis() as u64);
            Ok(value)
        }
        Err(err) => {
            let err = correlate(err, rc);
            log_op_error!(op, err, duration_ms = started.elapsed().as_millis() as u64);
            Err(err)
        }
    }
}
