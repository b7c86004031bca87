//! examgrid-engine - Orchestration layer
//!
//! Composes the pure kernel (`examgrid-core`) with persistence
//! (`examgrid-store`). Every mutating operation follows the same shape:
//! policy check, write, re-fetch the confirmed state, replace local state.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
