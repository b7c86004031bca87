//! Configuration domain models
//!
//! Plain data: session topology, calendar slots, exclusion snapshots and
//! constraint snapshots. Behaviour lives in the calendar, codec, buffer,
//! ledger and context modules.

pub mod constraint;
pub mod exclusion;
pub mod period;
pub mod topology;

pub use constraint::{
    ConstraintCategory, ConstraintEntry, ConstraintItems, ConstraintKind, ConstraintSnapshot,
    ConstraintSnapshotRecord,
};
pub use exclusion::{ExclusionSnapshot, NewExclusionSnapshot};
pub use period::{PeriodMapping, PeriodSlot};
pub use topology::{GridShape, NewSessionSettings, SessionSettings, Topology, TopologyPayload};
