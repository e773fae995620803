//! Outbound partial-update queue.
//!
//! Field-changing setters enqueue one pending update per changed field.
//! Updates are idempotent snapshots, not an event log: re-requesting a
//! field before the next flush coalesces to the latest value while keeping
//! the field's original position in the flush order.

use serde_json::Value;
use std::collections::{HashMap, VecDeque};

/// Client-side widget fields that can receive a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateField {
    Src,
    ActivePage,
    Zoom,
    Rotation,
}

impl UpdateField {
    /// Name of the field on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::ActivePage => "activePage",
            Self::Zoom => "zoom",
            Self::Rotation => "rotation",
        }
    }
}

/// Value queued for a pending update.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingValue {
    /// Snapshot taken when the setter ran.
    Ready(Value),

    /// Thunk resolved against live widget state and session at flush time.
    /// Used for `src`, whose resolution depends on transport context that
    /// is not guaranteed stable when the setter runs.
    Deferred,
}

/// Insertion-ordered coalescing queue of pending updates.
#[derive(Debug, Default)]
pub struct PendingUpdates {
    pending: HashMap<UpdateField, PendingValue>,
    order: VecDeque<UpdateField>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an update for `field`, replacing any value already pending.
    pub fn request(&mut self, field: UpdateField, value: PendingValue) {
        match self.pending.insert(field, value) {
            Some(_) => {}
            None => self.order.push_back(field),
        }
    }

    /// Drain all pending updates in first-request order.
    pub fn drain(&mut self) -> Vec<(UpdateField, PendingValue)> {
        let mut drained = Vec::with_capacity(self.order.len());
        while let Some(field) = self.order.pop_front() {
            if let Some(value) = self.pending.remove(&field) {
                drained.push((field, value));
            }
        }
        drained
    }

    /// Drop everything pending, e.g. when a full snapshot supersedes it.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
