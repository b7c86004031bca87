//! Institutional context: the three selection pointers plus topology
//!
//! [`InstitutionalContext`] is a plain value; every update returns a new
//! value. [`ContextStore`] owns the current value and notifies observers.

pub mod observer;

pub use observer::{ContextChange, ContextObserver, ContextStore, SubscriptionId};

use serde::{Deserialize, Serialize};

use crate::model::{GridShape, TopologyPayload};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstitutionalContext {
    pub selected_topology_id: Option<i64>,
    pub selected_constraint_snapshot_id: Option<i64>,
    pub selected_exclusion_snapshot_id: Option<i64>,
    pub topology: GridShape,
    pub active_topology: Option<TopologyPayload>,
}

impl InstitutionalContext {
    /// Apply a topology payload
    ///
    /// Present grid fields override `topology`; the payload id is adopted
    /// only while no topology is selected.
    pub fn with_active_topology(&self, payload: TopologyPayload) -> Self {
        let mut next = self.clone();
        if let Some(days) = payload.days_per_week {
            next.topology.days_per_week = days;
        }
        if let Some(periods) = payload.periods_per_day {
            next.topology.periods_per_day = periods;
        }
        if let Some(weeks) = payload.exam_weeks {
            next.topology.exam_weeks = weeks;
        }
        if next.selected_topology_id.is_none() {
            next.selected_topology_id = payload.id;
        }
        next.active_topology = Some(payload);
        next
    }

    /// Explicit topology re-selection
    pub fn with_selected_topology(&self, id: Option<i64>) -> Self {
        Self {
            selected_topology_id: id,
            ..self.clone()
        }
    }

    pub fn with_constraint_snapshot(&self, id: Option<i64>) -> Self {
        Self {
            selected_constraint_snapshot_id: id,
            ..self.clone()
        }
    }

    pub fn with_exclusion_snapshot(&self, id: Option<i64>) -> Self {
        Self {
            selected_exclusion_snapshot_id: id,
            ..self.clone()
        }
    }

    /// Clear the three pointers and the active payload; topology is kept
    pub fn reset(&self) -> Self {
        Self {
            topology: self.topology,
            ..Self::default()
        }
    }

    pub fn readiness(&self) -> Readiness {
        let payload = self.active_topology.as_ref();
        Readiness {
            session: payload.map(TopologyPayload::has_session).unwrap_or(false),
            semester: payload.map(TopologyPayload::has_semester).unwrap_or(false),
            grid: self.selected_topology_id.is_some()
                && self.topology.periods_per_day > 0
                && self.topology.days_per_week > 0,
            constraints: self.selected_constraint_snapshot_id.is_some(),
            exclusions: self.selected_exclusion_snapshot_id.is_some(),
        }
    }
}

/// Generation checklist derived from the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub session: bool,
    pub semester: bool,
    pub grid: bool,
    pub constraints: bool,
    pub exclusions: bool,
}

impl Readiness {
    pub fn items(&self) -> [(&'static str, bool); 5] {
        [
            ("session", self.session),
            ("semester", self.semester),
            ("grid", self.grid),
            ("constraints", self.constraints),
            ("exclusions", self.exclusions),
        ]
    }

    pub fn is_ready(&self) -> bool {
        self.items().iter().all(|(_, ok)| *ok)
    }

    /// Names of the false items, in checklist order
    pub fn missing(&self) -> Vec<String> {
        self.items()
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_id_adopted_only_when_unset() {
        let ctx = InstitutionalContext::default().with_active_topology(TopologyPayload {
            id: Some(3),
            ..Default::default()
        });
        assert_eq!(ctx.selected_topology_id, Some(3));

        let ctx = ctx.with_active_topology(TopologyPayload {
            id: Some(4),
            ..Default::default()
        });
        assert_eq!(ctx.selected_topology_id, Some(3));
        assert_eq!(ctx.active_topology.as_ref().and_then(|p| p.id), Some(4));
    }

    #[test]
    fn test_absent_payload_fields_keep_topology() {
        let ctx = InstitutionalContext::default().with_active_topology(TopologyPayload {
            periods_per_day: Some(4),
            ..Default::default()
        });
        assert_eq!(ctx.topology.periods_per_day, 4);
        assert_eq!(ctx.topology.days_per_week, 5);
        assert_eq!(ctx.topology.exam_weeks, 2);
    }

    #[test]
    fn test_reset_keeps_topology() {
        let ctx = InstitutionalContext::default()
            .with_active_topology(TopologyPayload {
                id: Some(1),
                days_per_week: Some(6),
                ..Default::default()
            })
            .with_constraint_snapshot(Some(2))
            .with_exclusion_snapshot(Some(3))
            .reset();
        assert_eq!(ctx.selected_topology_id, None);
        assert_eq!(ctx.selected_constraint_snapshot_id, None);
        assert_eq!(ctx.selected_exclusion_snapshot_id, None);
        assert!(ctx.active_topology.is_none());
        assert_eq!(ctx.topology.days_per_week, 6);
    }

    #[test]
    fn test_empty_context_is_not_ready() {
        let r = InstitutionalContext::default().readiness();
        assert!(!r.is_ready());
        assert_eq!(
            r.missing(),
            vec!["session", "semester", "grid", "constraints", "exclusions"]
        );
    }
}
