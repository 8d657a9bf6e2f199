//! Cooldown-gated FIFO of pending actions.
//!
//! The game accepts one command per actor cooldown window. Policies plan
//! several steps at once (select, then assign or move), so the steps wait
//! here and are released one per tick in strict FIFO order.
//!
//! Besides the game's own cooldown the scheduler keeps a *freeze* counter.
//! An action can arm a freeze on release to keep the queue (and the
//! decision pipeline) quiet while a maneuver plays out.

use std::collections::VecDeque;

use crate::command::{ActionBatch, PendingAction, ScheduledAction};

/// FIFO queue with a freeze timer.
#[derive(Debug, Clone, Default)]
pub struct ActionScheduler {
    queue: VecDeque<ScheduledAction>,
    freeze_ticks: u32,
}

impl ActionScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one action with no freeze.
    pub fn enqueue(&mut self, action: PendingAction) {
        self.queue.push_back(ScheduledAction {
            action,
            freeze_after: 0,
        });
    }

    /// Append a whole batch, preserving its order.
    pub fn enqueue_batch(&mut self, batch: ActionBatch) {
        self.queue.extend(batch);
    }

    /// Drop every pending action and lift any freeze.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!(dropped = self.queue.len(), "Cleared action queue");
        }
        self.queue.clear();
        self.freeze_ticks = 0;
    }

    /// Hold the queue for `ticks` ticks.
    pub fn freeze(&mut self, ticks: u32) {
        self.freeze_ticks = self.freeze_ticks.max(ticks);
    }

    /// Remaining freeze ticks.
    #[must_use]
    pub const fn freeze_ticks(&self) -> u32 {
        self.freeze_ticks
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if no action is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Nothing queued and no freeze running: the pipeline may plan.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.freeze_ticks == 0
    }

    /// Advance one tick and release at most one action.
    ///
    /// A running freeze counts down and blocks release. Otherwise the front
    /// action is released when `action_cooldown` is zero, and its
    /// `freeze_after` is armed.
    pub fn tick(&mut self, action_cooldown: u32) -> Option<PendingAction> {
        if self.freeze_ticks > 0 {
            self.freeze_ticks -= 1;
            return None;
        }
        if action_cooldown > 0 {
            return None;
        }
        let scheduled = self.queue.pop_front()?;
        self.freeze_ticks = scheduled.freeze_after;
        Some(scheduled.action)
    }
}
