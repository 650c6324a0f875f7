//! Cancellable deferred actions keyed by the session clock.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeferredAction {
    RestoreMaskInteraction,
    ReturnToMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Scheduled {
    handle: TimerHandle,
    due_ms: u64,
    action: DeferredAction,
}

/// Pending actions ordered by due time, then by scheduling order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredQueue {
    next_handle: u64,
    pending: Vec<Scheduled>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, action: DeferredAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let at = self
            .pending
            .iter()
            .position(|entry| entry.due_ms > due_ms)
            .unwrap_or(self.pending.len());
        self.pending.insert(
            at,
            Scheduled {
                handle,
                due_ms,
                action,
            },
        );
        handle
    }

    /// Cancel a pending action. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every action due at or before `now_ms`, in firing order.
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<(TimerHandle, DeferredAction)> {
        let split = self
            .pending
            .iter()
            .position(|entry| entry.due_ms > now_ms)
            .unwrap_or(self.pending.len());
        self.pending
            .drain(..split)
            .map(|entry| (entry.handle, entry.action))
            .collect()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|entry| entry.handle == handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.pending.first().map(|entry| entry.due_ms)
    }
}
