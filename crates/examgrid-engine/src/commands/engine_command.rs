//! Engine-level commands that write configuration

#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, BTreeSet};

use examgrid_core::context::ContextStore;
use examgrid_core::generation::{GenerationAck, GenerationTrigger};
use examgrid_core::model::{
    ConstraintCategory, ConstraintEntry, ConstraintSnapshotRecord, ExclusionSnapshot,
    NewExclusionSnapshot, NewSessionSettings, SessionSettings,
};
use examgrid_core::policy::ActorPolicy;
use examgrid_core_types::RequestContext;
use examgrid_store::errors::Result;
use examgrid_store::generation::SqliteGenerationQueue;
use examgrid_store::holidays::Holiday;
use rusqlite::Connection;

use super::constraints::{ConstraintWorkspace, LedgerSource};
use super::{calendar, exclusions, generation, topology};

/// Mutations accepted by [`apply_engine_command`]
#[derive(Debug, Clone)]
pub enum EngineCommand {
    SaveTopology(NewSessionSettings),
    AddHoliday(Holiday),
    SaveExclusion {
        topology_id: i64,
        name: String,
        excluded_periods: BTreeSet<u32>,
        set_active: bool,
    },
    ActivateExclusion {
        topology_id: i64,
        snapshot_id: i64,
    },
    /// Entries are checked against the selected topology's exclusions
    SaveConstraints {
        name: String,
        entries: BTreeMap<ConstraintCategory, Vec<ConstraintEntry>>,
    },
    RequestGeneration,
}

#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    TopologySaved(SessionSettings),
    HolidayAdded,
    ExclusionSaved(ExclusionSnapshot),
    ExclusionActivated(ExclusionSnapshot),
    ConstraintsSaved(ConstraintSnapshotRecord),
    GenerationQueued(GenerationAck),
}

/// Apply a command, then move the context pointers to the confirmed ids
///
/// Without an explicit `trigger`, generation requests are queued in the
/// same database.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    policy: &dyn ActorPolicy,
    rc: &RequestContext,
    context: &mut ContextStore,
    trigger: Option<&dyn GenerationTrigger>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::SaveTopology(input) => {
            let saved = topology::save_topology(conn, policy, rc, &input, context)?;
            Ok(EngineCommandResult::TopologySaved(saved))
        }
        EngineCommand::AddHoliday(holiday) => {
            calendar::add_holiday(conn, policy, rc, &holiday)?;
            Ok(EngineCommandResult::HolidayAdded)
        }
        EngineCommand::SaveExclusion {
            topology_id,
            name,
            excluded_periods,
            set_active,
        } => {
            let input = NewExclusionSnapshot {
                topology_id,
                name,
                excluded_periods,
                created_by: rc.actor.clone(),
            };
            let saved = exclusions::save_exclusion(conn, policy, rc, &input, set_active)?;
            if saved.is_active {
                context.set_exclusion_snapshot_id(Some(saved.id));
            }
            Ok(EngineCommandResult::ExclusionSaved(saved))
        }
        EngineCommand::ActivateExclusion {
            topology_id,
            snapshot_id,
        } => {
            let activated =
                exclusions::activate_exclusion(conn, policy, rc, topology_id, snapshot_id)?;
            context.set_exclusion_snapshot_id(Some(activated.id));
            Ok(EngineCommandResult::ExclusionActivated(activated))
        }
        EngineCommand::SaveConstraints { name, entries } => {
            let topology_id = context.current().selected_topology_id;
            let mut workspace = ConstraintWorkspace::open(conn, LedgerSource::Empty, topology_id)?;
            workspace.set_name(name);
            for (category, list) in entries {
                for entry in list {
                    workspace.add_entry(category, entry)?;
                }
            }
            let record = workspace.save(conn, policy, rc, Some(context))?;
            Ok(EngineCommandResult::ConstraintsSaved(record))
        }
        EngineCommand::RequestGeneration => {
            let queue;
            let trigger: &dyn GenerationTrigger = match trigger {
                Some(trigger) => trigger,
                None => {
                    queue = SqliteGenerationQueue::new(conn);
                    &queue
                }
            };
            let ack =
                generation::request_generation(conn, policy, rc, context.current(), trigger)?;
            Ok(EngineCommandResult::GenerationQueued(ack))
        }
    }
}
