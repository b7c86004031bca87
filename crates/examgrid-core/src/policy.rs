//! Actor policy trait and implementations
//!
//! Every mutating configuration operation asks an [`ActorPolicy`] whether
//! the acting user may proceed before anything is written.

use std::collections::HashSet;

use crate::errors::{GridError, Result};

/// Operation names passed to [`ActorPolicy::check`]
pub mod ops {
    pub const SAVE_TOPOLOGY: &str = "save_topology";
    pub const SAVE_EXCLUSION: &str = "save_exclusion";
    pub const ACTIVATE_EXCLUSION: &str = "activate_exclusion";
    pub const SAVE_CONSTRAINTS: &str = "save_constraints";
    pub const REQUEST_GENERATION: &str = "request_generation";
    pub const ADD_HOLIDAY: &str = "add_holiday";
}

pub trait ActorPolicy {
    /// # Errors
    ///
    /// `PolicyDenied` when `actor` may not perform `op`.
    fn check(&self, actor: &str, op: &str) -> Result<()>;
}

/// Policy that permits everything
///
/// # Example
/// ```
/// use examgrid_core::policy::{ActorPolicy, AllowAllPolicy};
///
/// assert!(AllowAllPolicy.check("anyone", "save_topology").is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl ActorPolicy for AllowAllPolicy {
    fn check(&self, _actor: &str, _op: &str) -> Result<()> {
        Ok(())
    }
}

/// Policy that refuses everything (read-only deployments, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllPolicy;

impl ActorPolicy for DenyAllPolicy {
    fn check(&self, actor: &str, op: &str) -> Result<()> {
        Err(denied(actor, op))
    }
}

/// Only listed administrators may mutate configuration
///
/// # Example
/// ```
/// use examgrid_core::policy::{ActorPolicy, AdminOnlyPolicy};
///
/// let policy = AdminOnlyPolicy::new(["registrar"]);
/// assert!(policy.check("registrar", "save_exclusion").is_ok());
/// assert!(policy.check("student", "save_exclusion").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdminOnlyPolicy {
    admins: HashSet<String>,
}

impl AdminOnlyPolicy {
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_admin(&self, actor: &str) -> bool {
        self.admins.contains(actor)
    }
}

impl ActorPolicy for AdminOnlyPolicy {
    fn check(&self, actor: &str, op: &str) -> Result<()> {
        if self.is_admin(actor) {
            Ok(())
        } else {
            Err(denied(actor, op))
        }
    }
}

fn denied(actor: &str, op: &str) -> GridError {
    GridError::PolicyDenied {
        actor: actor.to_string(),
        op: op.to_string(),
    }
}
