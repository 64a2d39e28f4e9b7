//! Frame timing for the host loop
//!
//! `FrameClock` turns display-frame timestamps into a whole number of fixed
//! ticks. `LoopGuard` makes sure at most one frame callback is live, so a
//! cancel immediately followed by a reschedule never leaves two loops running.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f64,
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (ms); returns how many ticks to run
    ///
    /// The first frame after a reset always runs exactly one tick.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, 0.1),
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop backlog we refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        substeps
    }

    /// Forget timing history (after a pause in frames)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }
}

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket(u64);

/// Cancel/reschedule guard for the animation-frame loop
#[derive(Debug, Default)]
pub struct LoopGuard {
    generation: u64,
    pending: Option<FrameTicket>,
    /// Host handle of the pending request (requestAnimationFrame id)
    handle: Option<i32>,
}

impl LoopGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for the next frame, invalidating any earlier one
    pub fn schedule(&mut self) -> FrameTicket {
        self.generation += 1;
        let ticket = FrameTicket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    /// Remember the host handle for the pending request
    pub fn set_handle(&mut self, handle: i32) {
        self.handle = Some(handle);
    }

    /// Invalidate the pending ticket; returns the host handle to cancel
    pub fn cancel(&mut self) -> Option<i32> {
        self.generation += 1;
        self.pending = None;
        self.handle.take()
    }

    /// Consume a ticket when its frame fires; false for stale tickets
    pub fn accept(&mut self, ticket: FrameTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            self.handle = None;
            true
        } else {
            false
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }
}
