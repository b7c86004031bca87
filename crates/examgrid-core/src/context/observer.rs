//! Context store with change notification

use std::sync::Arc;

use crate::model::TopologyPayload;

use super::{InstitutionalContext, Readiness};

/// Which part of the context an update touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextChange {
    ActiveTopology,
    SelectedTopology,
    ConstraintSnapshot,
    ExclusionSnapshot,
    Reset,
    /// Whole value replaced, e.g. after rehydration
    Replaced,
}

/// Receives every committed context update
pub trait ContextObserver: Send + Sync {
    fn on_change(&self, change: ContextChange, context: &InstitutionalContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owner of the current context value
///
/// Observers are only notified when an update actually changes the value.
#[derive(Default)]
pub struct ContextStore {
    current: InstitutionalContext,
    observers: Vec<(SubscriptionId, Arc<dyn ContextObserver>)>,
    next_id: u64,
}

impl ContextStore {
    pub fn new(initial: InstitutionalContext) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current(&self) -> &InstitutionalContext {
        &self.current
    }

    pub fn readiness(&self) -> Readiness {
        self.current.readiness()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn ContextObserver>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn set_active_topology(&mut self, payload: TopologyPayload) {
        let next = self.current.with_active_topology(payload);
        self.commit(ContextChange::ActiveTopology, next);
    }

    pub fn select_topology(&mut self, id: Option<i64>) {
        let next = self.current.with_selected_topology(id);
        self.commit(ContextChange::SelectedTopology, next);
    }

    pub fn set_constraint_snapshot_id(&mut self, id: Option<i64>) {
        let next = self.current.with_constraint_snapshot(id);
        self.commit(ContextChange::ConstraintSnapshot, next);
    }

    pub fn set_exclusion_snapshot_id(&mut self, id: Option<i64>) {
        let next = self.current.with_exclusion_snapshot(id);
        self.commit(ContextChange::ExclusionSnapshot, next);
    }

    pub fn reset_context(&mut self) {
        let next = self.current.reset();
        self.commit(ContextChange::Reset, next);
    }

    pub fn replace(&mut self, context: InstitutionalContext) {
        self.commit(ContextChange::Replaced, context);
    }

    pub fn into_inner(self) -> InstitutionalContext {
        self.current
    }

    fn commit(&mut self, change: ContextChange, next: InstitutionalContext) {
        if next == self.current {
            return;
        }
        self.current = next;
        tracing::debug!(?change, "context updated");
        for (_, observer) in &self.observers {
            observer.on_change(change, &self.current);
        }
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStore")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}
