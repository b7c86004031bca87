//! Canonical schema constants for structured logging

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_ACTOR: &str = "actor";

// Configuration identifiers
pub const FIELD_TOPOLOGY_ID: &str = "topology_id";
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_TOTAL_PERIODS: &str = "total_periods";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
