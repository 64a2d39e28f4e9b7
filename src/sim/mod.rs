//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, constants are per tick
//! - Stable iteration order (level list order)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod camera;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, is_visible};
pub use camera::Camera;
pub use collision::{
    Contact, handle_collisions, resolve_platform, resolve_platforms, resolve_triggers,
};
pub use level::{LevelError, LevelLayout};
pub use state::{
    Checkpoint, CheckpointState, GameEvent, GamePhase, GameState, Goal, GoalState, Platform,
    Player, Viewport,
};
pub use tick::{KeyState, tick};
