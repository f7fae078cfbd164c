//! Cooperative timing primitives driven by host-supplied instants.
//!
//! Nothing here sleeps or spawns. The host calls `poll(now)` from its own
//! task queue and acts when a primitive reports that it fired.

use std::time::{Duration, Instant};

/// A point in time a primitive waits for. Delays too large to add to
/// `now` never come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    At(Instant),
    Never,
}

impl Deadline {
    pub fn after(now: Instant, delay: Duration) -> Self {
        now.checked_add(delay).map_or(Self::Never, Self::At)
    }

    pub fn reached(self, now: Instant) -> bool {
        match self {
            Self::At(deadline) => now >= deadline,
            Self::Never => false,
        }
    }
}

/// Coalescing timer: every trigger restarts the quiet window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Deadline>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(Deadline::after(now, self.delay));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fires at most once per quiet period.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline.reached(now) => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// One-shot delay; arming again replaces the previous deadline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timer {
    deadline: Option<Deadline>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(Deadline::after(now, after));
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline.reached(now) => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period polling. A late poll fires once and re-arms from `now`,
/// so missed periods are not replayed as a burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next_due: Deadline,
}

impl Interval {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: Deadline::after(now, period),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.next_due.reached(now) {
            return false;
        }
        self.next_due = Deadline::after(now, self.period);
        true
    }
}
