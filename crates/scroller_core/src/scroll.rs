//! Auto-scroll state machine.
//!
//! `Idle` and `Running` are the only phases. Every scheduled step carries a
//! [`FrameTicket`]; stopping bumps the generation so tickets handed out
//! earlier turn into no-ops when the host finally runs them.

use crate::geometry::ScrollMetrics;

/// Fraction of the remaining speed gap closed on each frame.
pub const SPEED_LERP: f64 = 0.04;

/// Distance from the content end, in pixels, that counts as "at the bottom".
pub const END_SLACK_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Running,
}

/// Handle for one scheduled step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

/// Why automation went back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Toggled,
    ContainerLost,
    ReachedEnd,
    ConversationSwitched,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The ticket was superseded or automation is idle.
    Stale,
    /// No scroll container could be resolved.
    ContainerLost,
    /// Scroll offset advanced; `next` is the ticket for the following frame.
    Advanced { scroll_top: f64, next: FrameTicket },
    /// Scroll offset advanced onto the end of the content.
    ReachedEnd { scroll_top: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    phase: ScrollPhase,
    current_speed: f64,
    target_speed: f64,
    generation: u64,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            phase: ScrollPhase::Idle,
            current_speed: 0.0,
            target_speed: 0.0,
            generation: 0,
        }
    }
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ScrollPhase::Running
    }

    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed
    }

    /// Idle → Running at `base_speed`, returning the first ticket.
    pub fn start(&mut self, base_speed: f64) -> Option<FrameTicket> {
        if self.is_running() {
            return None;
        }
        self.phase = ScrollPhase::Running;
        self.current_speed = base_speed;
        self.target_speed = base_speed;
        Some(self.next_ticket())
    }

    /// Running → Idle. Returns false if already idle.
    pub fn stop(&mut self) -> bool {
        // Outstanding tickets die even when already idle.
        self.generation += 1;
        if !self.is_running() {
            return false;
        }
        self.phase = ScrollPhase::Idle;
        true
    }

    pub fn accepts(&self, ticket: FrameTicket) -> bool {
        self.is_running() && ticket.0 == self.generation
    }

    /// Moves `current_speed` one smoothing step toward `target`.
    pub fn smooth_toward(&mut self, target: f64) -> f64 {
        self.target_speed = target;
        self.current_speed += (target - self.current_speed) * SPEED_LERP;
        self.current_speed
    }

    /// Runs one frame. `container` is the freshly resolved scroll geometry.
    pub fn step(
        &mut self,
        ticket: FrameTicket,
        container: Option<ScrollMetrics>,
        target_speed: f64,
    ) -> StepOutcome {
        if !self.accepts(ticket) {
            return StepOutcome::Stale;
        }
        let Some(metrics) = container else {
            self.stop();
            return StepOutcome::ContainerLost;
        };

        let speed = self.smooth_toward(target_speed);
        let scroll_top = (metrics.scroll_top + speed).clamp(0.0, metrics.max_scroll_top());
        let advanced = ScrollMetrics {
            scroll_top,
            ..metrics
        };

        if advanced.at_end(END_SLACK_PX) {
            self.stop();
            return StepOutcome::ReachedEnd { scroll_top };
        }
        StepOutcome::Advanced {
            scroll_top,
            next: self.next_ticket(),
        }
    }

    fn next_ticket(&mut self) -> FrameTicket {
        self.generation += 1;
        FrameTicket(self.generation)
    }
}
