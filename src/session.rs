//! Game session lifecycle
//!
//! Owns the world, the held-key table and the frame loop bookkeeping, and
//! maps lifecycle commands onto phase transitions:
//!
//! - start: Ready -> Exploring
//! - restart: Exploring/Victory -> Exploring, world re-initialized in place
//! - goal reached (inside a tick): Exploring -> Victory
//! - exit: any -> Ready, loop torn down
//!
//! The host drives frames with tickets from [`Session::next_frame_request`];
//! every command that touches the loop cancels the outstanding ticket first,
//! so a stale callback can never run a second loop.

use crate::platform::{
    Command, FrameClock, FrameTicket, InputEvent, LoopGuard, map_key_down, map_key_up,
};
use crate::renderer::Snapshot;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, KeyState, LevelLayout, Viewport, tick};
use crate::ui::{Hud, Notification};

/// A running (or ready-to-run) game
#[derive(Debug)]
pub struct Session {
    state: GameState,
    keys: KeyState,
    settings: Settings,
    clock: FrameClock,
    guard: LoopGuard,
    /// A frame should be requested from the host
    wants_frame: bool,
    /// Host handles whose requests were invalidated
    cancelled: Vec<i32>,
    notification: Option<Notification>,
}

impl Session {
    /// New session on the built-in level
    pub fn new(settings: Settings) -> Self {
        Self::with_level(settings, &LevelLayout::default())
    }

    pub fn with_level(settings: Settings, level: &LevelLayout) -> Self {
        let state = GameState::with_level(level, settings.viewport());
        Self {
            state,
            keys: KeyState::default(),
            settings,
            clock: FrameClock::new(),
            guard: LoopGuard::new(),
            wants_frame: false,
            cancelled: Vec::new(),
            notification: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Notification currently on screen, if any
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state)
    }

    /// Immutable view for the renderer
    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot::capture(&self.state, now_ms)
    }

    /// Invalidate the pending frame and remember its host handle
    fn cancel_loop(&mut self) {
        if let Some(handle) = self.guard.cancel() {
            self.cancelled.push(handle);
        }
        self.wants_frame = false;
    }

    fn reinitialize(&mut self) {
        self.state.reset();
        self.keys.clear();
        self.clock.reset();
        self.notification = None;
    }

    /// Begin play from the menu; `viewport_width` is the measured container width
    pub fn start(&mut self, viewport_width: Option<f64>) {
        self.cancel_loop();
        self.reinitialize();
        if let Some(width) = viewport_width.filter(|w| *w > 0.0) {
            self.set_viewport_width(width);
        }
        self.state.phase = GamePhase::Exploring;
        self.wants_frame = true;
        log::info!(
            "Session started ({}x{})",
            self.state.viewport.width,
            self.state.viewport.height
        );
    }

    /// Reset the run in place; stays in Ready if the game was never started
    pub fn restart(&mut self) {
        self.cancel_loop();
        self.reinitialize();
        if self.state.phase.is_running() {
            self.state.phase = GamePhase::Exploring;
            self.wants_frame = true;
            log::info!("Session restarted");
        } else {
            log::debug!("Restart while ready: state cleared, loop not started");
        }
    }

    /// Tear down the loop and return to the menu
    pub fn exit(&mut self) {
        self.cancel_loop();
        self.keys.clear();
        self.notification = None;
        self.state.phase = GamePhase::Ready;
        log::info!("Session exited to menu");
    }

    /// New container width; reschedules the loop if it is running
    pub fn resize(&mut self, width: f64) {
        if width <= 0.0 {
            log::warn!("Ignoring resize to width {}", width);
            return;
        }
        self.set_viewport_width(width);
        if self.state.phase.is_running() {
            self.cancel_loop();
            self.clock.reset();
            self.wants_frame = true;
        }
    }

    fn set_viewport_width(&mut self, width: f64) {
        let viewport = Viewport {
            width,
            height: self.state.viewport.height,
        };
        self.state.set_viewport(viewport);
    }

    /// Apply a decoded input event
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(control) => control.apply(&mut self.keys, true),
            InputEvent::KeyUp(control) => control.apply(&mut self.keys, false),
            InputEvent::Command(Command::Restart) => self.restart(),
            InputEvent::Command(Command::Exit) => self.exit(),
        }
    }

    /// Browser `keydown`
    pub fn key_down(&mut self, key: &str) {
        if let Some(event) = map_key_down(key) {
            self.handle_input(event);
        }
    }

    /// Browser `keyup`
    pub fn key_up(&mut self, key: &str) {
        if let Some(event) = map_key_up(key) {
            self.handle_input(event);
        }
    }

    /// Ticket for the next frame callback, if one should be requested now
    pub fn next_frame_request(&mut self) -> Option<FrameTicket> {
        if self.wants_frame && !self.guard.is_scheduled() {
            self.wants_frame = false;
            Some(self.guard.schedule())
        } else {
            None
        }
    }

    /// Record the host handle of the request made for the latest ticket
    pub fn frame_requested(&mut self, handle: i32) {
        self.guard.set_handle(handle);
    }

    /// The host could not request a frame for the latest ticket
    ///
    /// Drops the ticket so the next pump asks again instead of waiting on a
    /// callback that will never come.
    pub fn frame_request_failed(&mut self) {
        self.guard.cancel();
        self.wants_frame = self.state.phase.is_running();
    }

    /// Host handles that must be cancelled on the host side
    pub fn take_cancelled_handles(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.cancelled)
    }

    /// Run one simulation tick and turn its events into notifications
    pub fn step(&mut self, now_ms: f64) {
        tick(&mut self.state, &self.keys);
        for event in self.state.drain_events() {
            self.notification = Some(Notification::for_event(&event, now_ms));
        }
    }

    /// Frame callback; returns false (and does nothing) for a stale ticket
    pub fn frame(&mut self, ticket: FrameTicket, now_ms: f64) -> bool {
        if !self.guard.accept(ticket) {
            log::debug!("Dropping stale frame {:?}", ticket);
            return false;
        }

        let ticks = self.clock.advance(now_ms);
        for _ in 0..ticks {
            self.step(now_ms);
        }

        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now_ms))
        {
            self.notification = None;
        }

        self.wants_frame = self.state.phase.is_running();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Control;
    use glam::DVec2;

    fn started() -> Session {
        let mut session = Session::new(Settings::default());
        session.start(None);
        session
    }

    #[test]
    fn test_start_enters_exploring() {
        let mut session = Session::new(Settings::default());
        assert_eq!(session.phase(), GamePhase::Ready);
        assert!(session.next_frame_request().is_none());

        session.start(Some(1000.0));
        assert_eq!(session.phase(), GamePhase::Exploring);
        assert_eq!(session.state().viewport.width, 1000.0);
        assert!(session.next_frame_request().is_some());
    }

    #[test]
    fn test_checkpoint_scenario() {
        let mut session = started();
        let cp = session.state.checkpoints[0].pos;
        session.state.player.pos = cp;

        session.step(0.0);
        assert_eq!(session.state().found_checkpoints, 1);
        let note = session.notification().cloned().unwrap();
        assert_eq!(note.message, "Artifact 1 acquired!");

        // Still overlapping on later ticks: no second claim
        session.state.player.pos = cp;
        session.step(16.0);
        assert_eq!(session.state().found_checkpoints, 1);
        assert!(!session.state.claim_checkpoint(0));
    }

    #[test]
    fn test_goal_scenario_freezes() {
        let mut session = started();
        session.state.player.pos = session.state.goal.pos;
        session.step(0.0);

        assert_eq!(session.phase(), GamePhase::Victory);
        assert_eq!(session.hud().status, "MISSION_COMPLETE");
        let y = session.state().player.pos.y;

        // Movement input is ignored and gravity no longer applies
        session.handle_input(InputEvent::KeyDown(Control::MoveRight));
        for i in 0..20 {
            session.step(i as f64);
        }
        assert_eq!(session.state().player.pos.y, y);
        assert_eq!(session.state().player.vel, DVec2::ZERO);
    }

    #[test]
    fn test_restart_scenario() {
        let mut session = started();
        session.state.player.pos = session.state.checkpoints[0].pos;
        session.step(0.0);
        session.state.player.pos = DVec2::new(3000.0, 100.0);
        session.state.camera.offset = 2500.0;
        session.state.reach_goal();
        session.key_down("ArrowRight");

        session.key_down("r");

        let state = session.state();
        assert_eq!(session.phase(), GamePhase::Exploring);
        assert_eq!(state.found_checkpoints, 0);
        assert_eq!(state.camera.offset, 0.0);
        assert_eq!(state.player.pos, DVec2::new(50.0, 200.0));
        assert!(state.checkpoints.iter().all(|c| !c.is_claimed()));
        assert!(!state.goal.is_reached());
        assert!(!session.keys().move_right);
        assert!(session.notification().is_none());
    }

    #[test]
    fn test_restart_while_ready_stays_ready() {
        let mut session = Session::new(Settings::default());
        session.key_down("R");
        assert_eq!(session.phase(), GamePhase::Ready);
        assert!(session.next_frame_request().is_none());
    }

    #[test]
    fn test_exit_returns_to_ready_and_stops_loop() {
        let mut session = started();
        let ticket = session.next_frame_request().unwrap();
        session.frame_requested(11);

        session.key_down("Escape");
        assert_eq!(session.phase(), GamePhase::Ready);
        assert_eq!(session.take_cancelled_handles(), vec![11]);
        assert!(!session.frame(ticket, 16.0));
        assert!(session.next_frame_request().is_none());
    }

    #[test]
    fn test_restart_never_doubles_the_loop() {
        let mut session = started();
        let first = session.next_frame_request().unwrap();
        session.frame_requested(1);

        // Cancel and reschedule back to back
        session.restart();
        let second = session.next_frame_request().unwrap();
        assert!(session.next_frame_request().is_none());

        assert!(!session.frame(first, 16.0));
        assert!(session.frame(second, 16.0));
        assert_eq!(session.state().time_ticks, 1);

        // The accepted frame asks for exactly one follow-up
        assert!(session.next_frame_request().is_some());
        assert!(session.next_frame_request().is_none());
    }

    #[test]
    fn test_failed_request_can_be_retried() {
        let mut session = started();
        let lost = session.next_frame_request().unwrap();
        session.frame_request_failed();

        let retry = session.next_frame_request().unwrap();
        assert_ne!(lost, retry);
        assert!(!session.frame(lost, 16.0));
        assert!(session.frame(retry, 16.0));
    }

    #[test]
    fn test_failed_request_after_exit_stays_idle() {
        let mut session = started();
        session.next_frame_request().unwrap();
        session.exit();
        session.frame_request_failed();
        assert!(session.next_frame_request().is_none());
        assert!(session.take_cancelled_handles().is_empty());
    }

    #[test]
    fn test_resize_reschedules_running_loop() {
        let mut session = started();
        let old = session.next_frame_request().unwrap();
        session.resize(640.0);
        assert_eq!(session.state().viewport.width, 640.0);
        let new = session.next_frame_request().unwrap();
        assert!(!session.frame(old, 0.0));
        assert!(session.frame(new, 0.0));
    }

    #[test]
    fn test_notification_auto_dismisses() {
        let mut session = started();
        session.state.player.pos = session.state.checkpoints[0].pos;
        let ticket = session.next_frame_request().unwrap();
        assert!(session.frame(ticket, 1000.0));
        assert!(session.notification().is_some());

        let ticket = session.next_frame_request().unwrap();
        session.frame(ticket, 2500.0);
        assert!(session.notification().is_some());

        let ticket = session.next_frame_request().unwrap();
        session.frame(ticket, 3000.0);
        assert!(session.notification().is_none());
    }
}
