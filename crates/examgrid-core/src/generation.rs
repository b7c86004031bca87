//! Generation hand-off
//!
//! The scheduler runs out of process. This module gates the hand-off on
//! readiness and defines the trigger seam.

use serde::{Deserialize, Serialize};

use crate::context::InstitutionalContext;
use crate::errors::{ExError, GridError, Result};

/// The three resolved pointers sent to the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topology_id: i64,
    pub constraint_snapshot_id: i64,
    pub exclusion_snapshot_id: i64,
    pub requested_by: String,
}

impl GenerationRequest {
    /// Build a request from a context that passes the readiness gate
    ///
    /// # Errors
    ///
    /// `NotReady` listing every false checklist item.
    pub fn from_context(context: &InstitutionalContext, requested_by: &str) -> Result<Self> {
        let readiness = context.readiness();
        match (
            readiness.is_ready(),
            context.selected_topology_id,
            context.selected_constraint_snapshot_id,
            context.selected_exclusion_snapshot_id,
        ) {
            (true, Some(topology_id), Some(constraint_snapshot_id), Some(exclusion_snapshot_id)) => {
                Ok(Self {
                    topology_id,
                    constraint_snapshot_id,
                    exclusion_snapshot_id,
                    requested_by: requested_by.to_string(),
                })
            }
            _ => Err(GridError::NotReady {
                missing: readiness.missing(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Queued,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Queued => "queued",
        }
    }
}

/// Acknowledgement returned once the request has been queued
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAck {
    pub request_id: String,
    pub status: GenerationStatus,
}

/// One-shot hand-off to the external scheduler
pub trait GenerationTrigger {
    /// # Errors
    ///
    /// Any failure to record or transmit the request.
    fn trigger(&self, request: &GenerationRequest) -> std::result::Result<GenerationAck, ExError>;
}
