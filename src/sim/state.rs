//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`; there is no ambient
//! global state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::camera::Camera;
use super::level::LevelLayout;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started, menu showing
    #[default]
    Ready,
    /// Active gameplay, triggers armed
    Exploring,
    /// Goal reached, player frozen
    Victory,
}

impl GamePhase {
    /// Status line shown in the game header
    pub fn status_label(&self) -> &'static str {
        match self {
            GamePhase::Ready => "READY",
            GamePhase::Exploring => "EXPLORING",
            GamePhase::Victory => "MISSION_COMPLETE",
        }
    }

    /// Mode shown in the footer
    pub fn footer_label(&self) -> &'static str {
        match self {
            GamePhase::Ready => "READY",
            GamePhase::Exploring => "ACTIVE",
            GamePhase::Victory => "VICTORY",
        }
    }

    /// Whether the frame loop should be ticking
    pub fn is_running(&self) -> bool {
        !matches!(self, GamePhase::Ready)
    }
}

/// Transitions raised during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A checkpoint was claimed (`index` is its position in the level list)
    CheckpointClaimed { index: usize, found: u32, total: u32 },
    /// The goal was reached
    GoalReached { found: u32, total: u32 },
}

/// Visible area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

/// The player-controlled sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    pub vel: DVec2,
    pub width: f64,
    pub height: f64,
    pub jump_force: f64,
    pub speed: f64,
    pub can_jump: bool,
    pub frozen: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: DVec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: DVec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            jump_force: PLAYER_JUMP_FORCE,
            speed: PLAYER_SPEED,
            can_jump: true,
            frozen: false,
        }
    }
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, DVec2::new(self.width, self.height))
    }

    /// Integrate one tick: gravity, motion, camera follow, level bounds, floor
    ///
    /// A frozen player does not move at all.
    pub fn update(&mut self, camera: &mut Camera, viewport: Viewport) {
        if self.frozen {
            return;
        }

        self.vel.y += GRAVITY;
        self.pos += self.vel;

        // Camera tracks the unclamped position
        camera.follow(self.pos.x, viewport.width, LEVEL_WIDTH);

        let max_x = LEVEL_WIDTH - self.width;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }

        if self.pos.y + self.height > viewport.height {
            self.pos.y = viewport.height - self.height;
            self.vel.y = 0.0;
            self.can_jump = true;
        }
    }

    /// Start a jump if grounded; single jump only
    pub fn jump(&mut self) {
        if self.can_jump && !self.frozen {
            self.vel.y = self.jump_force;
            self.can_jump = false;
        }
    }

    /// Stop all motion permanently (until reset)
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.vel = DVec2::ZERO;
    }

    /// Back to the level start
    pub fn reset(&mut self) {
        self.pos = DVec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.vel = DVec2::ZERO;
        self.can_jump = true;
        self.frozen = false;
    }
}

fn default_platform_height() -> f64 {
    PLATFORM_HEIGHT
}

/// Static collision surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: DVec2,
    pub width: f64,
    #[serde(default = "default_platform_height")]
    pub height: f64,
}

impl Platform {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            width,
            height: PLATFORM_HEIGHT,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, DVec2::new(self.width, self.height))
    }
}

/// Claim state of a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CheckpointState {
    #[default]
    Unclaimed,
    Claimed,
}

/// One-shot artifact pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
    pub state: CheckpointState,
}

impl Checkpoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            width: CHECKPOINT_WIDTH,
            height: CHECKPOINT_HEIGHT,
            state: CheckpointState::Unclaimed,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, DVec2::new(self.width, self.height))
    }

    pub fn is_claimed(&self) -> bool {
        self.state == CheckpointState::Claimed
    }

    /// Returns true only on the Unclaimed -> Claimed transition
    pub fn claim(&mut self) -> bool {
        match self.state {
            CheckpointState::Unclaimed => {
                self.state = CheckpointState::Claimed;
                true
            }
            CheckpointState::Claimed => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = CheckpointState::Unclaimed;
    }
}

/// Reach state of the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoalState {
    #[default]
    Unreached,
    Reached,
}

/// Terminal trigger volume at the far end of the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
    pub state: GoalState,
}

impl Goal {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            width: GOAL_WIDTH,
            height: GOAL_HEIGHT,
            state: GoalState::Unreached,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, DVec2::new(self.width, self.height))
    }

    pub fn is_reached(&self) -> bool {
        self.state == GoalState::Reached
    }

    /// Returns true only on the Unreached -> Reached transition
    pub fn reach(&mut self) -> bool {
        match self.state {
            GoalState::Unreached => {
                self.state = GoalState::Reached;
                true
            }
            GoalState::Reached => false,
        }
    }

    pub fn reset(&mut self) {
        self.state = GoalState::Unreached;
    }
}

/// Complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Fixed at level load, iterated in list order
    pub platforms: Vec<Platform>,
    pub checkpoints: Vec<Checkpoint>,
    pub goal: Goal,
    pub camera: Camera,
    pub viewport: Viewport,
    /// Checkpoints claimed this playthrough
    pub found_checkpoints: u32,
    /// Platform and trigger collisions run only while this is set
    pub triggers_active: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending transitions for the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a world for the built-in level
    pub fn new(viewport: Viewport) -> Self {
        Self::with_level(&LevelLayout::default(), viewport)
    }

    /// Create a world from a level layout
    pub fn with_level(level: &LevelLayout, viewport: Viewport) -> Self {
        Self {
            phase: GamePhase::Ready,
            player: Player::default(),
            platforms: level.platforms.clone(),
            checkpoints: level
                .checkpoints
                .iter()
                .map(|p| Checkpoint::new(p.x, p.y))
                .collect(),
            goal: Goal::new(level.goal.x, level.goal.y),
            camera: Camera::default(),
            viewport,
            found_checkpoints: 0,
            triggers_active: true,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Re-initialize all mutable state in place (phase is left to the caller)
    pub fn reset(&mut self) {
        self.player.reset();
        for checkpoint in &mut self.checkpoints {
            checkpoint.reset();
        }
        self.goal.reset();
        self.camera.reset();
        self.found_checkpoints = 0;
        self.triggers_active = true;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Change the viewport, keeping the camera inside its bounds
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.clamp_to(viewport.width, LEVEL_WIDTH);
    }

    pub fn total_checkpoints(&self) -> u32 {
        self.checkpoints.len() as u32
    }

    /// Claim the checkpoint at `index`, bumping the artifact count once
    pub fn claim_checkpoint(&mut self, index: usize) -> bool {
        let Some(checkpoint) = self.checkpoints.get_mut(index) else {
            return false;
        };
        if !checkpoint.claim() {
            return false;
        }

        self.found_checkpoints += 1;
        let total = self.total_checkpoints();
        log::info!(
            "Artifact {} acquired ({}/{})",
            index + 1,
            self.found_checkpoints,
            total
        );
        self.events.push(GameEvent::CheckpointClaimed {
            index,
            found: self.found_checkpoints,
            total,
        });
        true
    }

    /// Reach the goal: disarm triggers, freeze the player, enter Victory
    pub fn reach_goal(&mut self) -> bool {
        if !self.goal.reach() {
            return false;
        }

        self.triggers_active = false;
        self.player.freeze();
        self.phase = GamePhase::Victory;
        log::info!(
            "Mission complete with {}/{} artifacts",
            self.found_checkpoints,
            self.total_checkpoints()
        );
        self.events.push(GameEvent::GoalReached {
            found: self.found_checkpoints,
            total: self.total_checkpoints(),
        });
        true
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Progress through the level in whole percent
    pub fn progress_percent(&self) -> u32 {
        ((self.player.pos.x / LEVEL_WIDTH) * 100.0).floor().max(0.0) as u32
    }

    /// Whether the player is close enough to the end to show a hint
    pub fn goal_ahead(&self) -> bool {
        self.triggers_active && self.player.pos.x > LEVEL_WIDTH - GOAL_AHEAD_DISTANCE
    }
}
