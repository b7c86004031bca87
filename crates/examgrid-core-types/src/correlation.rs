//! Correlation types for request tracking
//!
//! Every configuration mutation carries a `RequestContext` so that log
//! events and errors emitted along the way can be tied back to the actor
//! and the request that caused them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh time-ordered identifier (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            /// Wrap an identifier received from elsewhere
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier of a single configuration request
    RequestId
);

correlation_id!(
    /// Identifier propagated across process boundaries (e.g. into the
    /// generation queue)
    TraceId
);

/// Who is acting, and under which request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    /// Username of the acting user, checked by the actor policy
    pub actor: String,
}

impl RequestContext {
    /// Create a context for `actor` with a fresh RequestId
    pub fn for_actor(actor: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
            actor: actor.into(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}
