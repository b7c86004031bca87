//! Exam-timetable configuration kernel
//!
//! Pure domain logic for the configuration layer that feeds the external
//! scheduler:
//!
//! - [`calendar`] expands a session topology into addressable period slots
//! - [`exclusion_buffer`] is the working copy of an exclusion snapshot
//! - [`codec`] reads and writes the compact constraint wire form
//! - [`ledger`] edits constraint entries and enforces per-category rules
//! - [`context`] holds the three selection pointers and the readiness gate
//!
//! Nothing here touches storage; see `examgrid-store` and `examgrid-engine`.

pub use examgrid_core_types as core_types;

pub mod calendar;
pub mod codec;
pub mod context;
pub mod errors;
pub mod exclusion_buffer;
pub mod generation;
pub mod ledger;
pub mod logging_facility;
pub mod model;
pub mod policy;

pub use context::{ContextStore, InstitutionalContext, Readiness};
pub use errors::{ExError, ExErrorKind, GridError, Result};
pub use exclusion_buffer::ExclusionBuffer;
pub use ledger::ConstraintLedger;
