//! HUD values and transient notifications
//!
//! Derived from `GameState` after each frame's ticks; the host only reads these.

use serde::{Deserialize, Serialize};

use crate::consts::{LEVEL_WIDTH, NOTIFICATION_MS};
use crate::sim::{GameEvent, GameState};

/// Per-frame derived values for the status sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    /// Floor of the player's world x
    pub position: u32,
    pub level_width: u32,
    pub progress_percent: u32,
    pub artifacts_found: u32,
    pub artifacts_total: u32,
    pub status: &'static str,
    pub footer: &'static str,
    pub goal_ahead: bool,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            position: state.player.pos.x.floor().max(0.0) as u32,
            level_width: LEVEL_WIDTH as u32,
            progress_percent: state.progress_percent(),
            artifacts_found: state.found_checkpoints,
            artifacts_total: state.total_checkpoints(),
            status: state.phase.status_label(),
            footer: state.phase.footer_label(),
            goal_ahead: state.goal_ahead(),
        }
    }

    /// "found/total", as shown in the header counter
    pub fn artifact_counter(&self) -> String {
        format!("{}/{}", self.artifacts_found, self.artifacts_total)
    }

    /// The three in-canvas stat lines
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Position: {}/{}", self.position, self.level_width),
            format!("Progress: {}%", self.progress_percent),
            format!("Artifacts: {}", self.artifact_counter()),
        ]
    }
}

/// A pop-up shown for a fixed duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub headline: String,
    pub message: String,
    /// e.g. "2/3 artifacts collected"
    pub detail: String,
    pub shown_at_ms: f64,
    pub duration_ms: f64,
}

impl Notification {
    /// Build the pop-up for a simulation event
    pub fn for_event(event: &GameEvent, now_ms: f64) -> Self {
        let (message, found, total) = match *event {
            GameEvent::CheckpointClaimed {
                index,
                found,
                total,
            } => (format!("Artifact {} acquired!", index + 1), found, total),
            GameEvent::GoalReached { found, total } => (
                "Congratulations! You reached the end and completed your mission!".to_string(),
                found,
                total,
            ),
        };

        Self {
            headline: "SUCCESS".to_string(),
            message,
            detail: format!("{}/{} artifacts collected", found, total),
            shown_at_ms: now_ms,
            duration_ms: NOTIFICATION_MS,
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.shown_at_ms >= self.duration_ms
    }
}
