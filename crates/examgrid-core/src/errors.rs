use examgrid_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using GridError
pub type Result<T> = std::result::Result<T, GridError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the CLI, tests,
/// anything rendering a user-visible notice) can match on without parsing
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    /// Malformed date range or non-positive grid dimensions
    InvalidTopology,
    /// An excluded index does not exist in the session's calendar
    PeriodOutOfRange,
    /// Course already present in the same constraint category
    DuplicateCourseCode,
    /// Selected periods intersect the active exclusion set
    PeriodConflict,
    /// Entry items do not match the category's declared kind
    KindMismatch,

    // Lookup
    NotFound,

    // Gates
    /// Readiness gate refused generation
    NotReady,
    PolicyDenied,

    // Integration/IO
    /// A provider call failed; the operation was abandoned
    NetworkFailure,
    Persistence,
    Serialization,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidTopology => "ERR_INVALID_TOPOLOGY",
            ExErrorKind::PeriodOutOfRange => "ERR_PERIOD_OUT_OF_RANGE",
            ExErrorKind::DuplicateCourseCode => "ERR_DUPLICATE_COURSE_CODE",
            ExErrorKind::PeriodConflict => "ERR_PERIOD_CONFLICT",
            ExErrorKind::KindMismatch => "ERR_KIND_MISMATCH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotReady => "ERR_NOT_READY",
            ExErrorKind::PolicyDenied => "ERR_POLICY_DENIED",
            ExErrorKind::NetworkFailure => "ERR_NETWORK_FAILURE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the caller can re-prompt and retry without anything having
    /// been written
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::DuplicateCourseCode
                | ExErrorKind::PeriodConflict
                | ExErrorKind::PeriodOutOfRange
                | ExErrorKind::KindMismatch
                | ExErrorKind::NotReady
                | ExErrorKind::NetworkFailure
                | ExErrorKind::Timeout
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity,
/// correlation ids) to render a transient notice and to find the matching
/// log events.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    details: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            details: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (topology id, snapshot id, course code)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach itemised details (missing readiness items, conflicting periods)
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&[String]> {
        self.details.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(details) = &self.details {
            write!(f, " [{}]", details.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for configuration operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Date range or grid dimensions cannot produce a calendar
    #[error("Invalid topology: {reason}")]
    InvalidTopology { reason: String },

    /// A course already has an entry in this constraint category
    #[error("Course {course_code} already has an entry in {category}")]
    DuplicateCourseCode {
        category: String,
        course_code: String,
    },

    /// Requested periods are excluded for the active session
    #[error("Period(s) {periods:?} are excluded and cannot be used by {course_code}")]
    PeriodConflict {
        course_code: String,
        periods: Vec<u32>,
    },

    /// Excluded index outside the session's calendar
    #[error("Period index {period_index} is outside 0..{total_periods}")]
    PeriodOutOfRange {
        period_index: u32,
        total_periods: u32,
    },

    /// Entry payload does not match the category's declared kind
    #[error("Category {category} expects {expected} items")]
    KindMismatch { category: String, expected: String },

    #[error("No entry for {course_code} in {category}")]
    EntryNotFound {
        category: String,
        course_code: String,
    },

    #[error("Topology not found: {topology_id}")]
    TopologyNotFound { topology_id: i64 },

    /// `kind` is `exclusion` or `constraint`
    #[error("{kind} snapshot not found: {snapshot_id}")]
    SnapshotNotFound { kind: String, snapshot_id: i64 },

    /// Readiness gate has at least one false item
    #[error("Configuration not ready: missing {missing:?}")]
    NotReady { missing: Vec<String> },

    #[error("Actor {actor} may not perform {op}")]
    PolicyDenied { actor: String, op: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<GridError> for ExError {
    fn from(err: GridError) -> Self {
        let message = err.to_string();
        match err {
            GridError::InvalidTopology { .. } => {
                ExError::new(ExErrorKind::InvalidTopology).with_message(message)
            }

            GridError::DuplicateCourseCode { course_code, .. } => {
                ExError::new(ExErrorKind::DuplicateCourseCode)
                    .with_entity_id(course_code)
                    .with_message(message)
            }

            GridError::PeriodConflict {
                course_code,
                periods,
            } => ExError::new(ExErrorKind::PeriodConflict)
                .with_entity_id(course_code)
                .with_details(periods.iter().map(|p| p.to_string()).collect())
                .with_message(message),

            GridError::PeriodOutOfRange { period_index, .. } => {
                ExError::new(ExErrorKind::PeriodOutOfRange)
                    .with_entity_id(period_index.to_string())
                    .with_message(message)
            }

            GridError::KindMismatch { category, .. } => ExError::new(ExErrorKind::KindMismatch)
                .with_entity_id(category)
                .with_message(message),

            GridError::EntryNotFound { course_code, .. } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(course_code)
                .with_message(message),

            GridError::TopologyNotFound { topology_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(topology_id.to_string())
                .with_message(message),

            GridError::SnapshotNotFound { snapshot_id, .. } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(snapshot_id.to_string())
                    .with_message(message)
            }

            GridError::NotReady { missing } => ExError::new(ExErrorKind::NotReady)
                .with_details(missing)
                .with_message("Configuration not ready for generation"),

            GridError::PolicyDenied { actor, op } => ExError::new(ExErrorKind::PolicyDenied)
                .with_op(op)
                .with_entity_id(actor)
                .with_message(message),

            GridError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            GridError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}
