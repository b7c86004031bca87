//! examgrid-store - SQLite persistence for the configuration layer
//!
//! Provides:
//! - Connection management, health probe, embedded checksummed migrations
//! - Session settings (topology) history and the holiday calendar
//! - Exclusion and constraint snapshot stores
//! - Generation request outbox
//! - Versioned client-persisted state with legacy key migration
//!
//! Every mutating call runs in a single transaction; a failure leaves the
//! database as it was.

pub mod client_state;
mod columns;
pub mod constraints;
pub mod db;
pub mod errors;
pub mod exclusions;
pub mod generation;
pub mod holidays;
pub mod migrations;
pub mod topology;

pub use errors::Result;
