//! Deterministic one-shot timers on a virtual clock.
//!
//! The page never sleeps. Time only moves when the host calls
//! [`TimerQueue::pop_due`]/[`TimerQueue::advance_to`], which keeps timer
//! behavior reproducible in tests.

use std::time::Duration;

/// Handle to a scheduled timer. Never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug)]
struct PendingTimer<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// Queue of pending one-shot timers carrying a task payload.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        log::trace!("[timer] schedule {id} due at {due:?}");
        self.pending.push(PendingTimer { id, due, task });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        let cancelled = self.pending.len() != before;
        if cancelled {
            log::trace!("[timer] cancel {id}");
        }
        cancelled
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(index);
        self.now = self.now.max(timer.due);
        log::trace!("[timer] fire {} at {:?}", timer.id, self.now);
        Some((timer.id, timer.task))
    }

    /// Move the clock forward to `time` without firing anything.
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}
