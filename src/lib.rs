//! Abyss Runner - A side-scrolling deep-sea platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Pure scene building from simulation snapshots
//! - `platform`: Input table and frame timing for the host loop
//! - `session`: Ready/Exploring/Victory lifecycle and notifications
//! - `settings`: Viewport and visual preferences

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
///
/// Physics values are per tick, tuned for a 60 Hz clock.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the tuning of the physics constants)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Downward acceleration (units/tick²)
    pub const GRAVITY: f64 = 0.8;
    /// Horizontal extent of the level
    pub const LEVEL_WIDTH: f64 = 5000.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f64 = 30.0;
    pub const PLAYER_HEIGHT: f64 = 40.0;
    pub const PLAYER_JUMP_FORCE: f64 = -16.0;
    pub const PLAYER_SPEED: f64 = 7.0;
    pub const PLAYER_START_X: f64 = 50.0;
    pub const PLAYER_START_Y: f64 = 200.0;

    /// Static geometry and triggers
    pub const PLATFORM_HEIGHT: f64 = 20.0;
    pub const CHECKPOINT_WIDTH: f64 = 30.0;
    pub const CHECKPOINT_HEIGHT: f64 = 40.0;
    pub const GOAL_WIDTH: f64 = 60.0;
    pub const GOAL_HEIGHT: f64 = 80.0;

    /// Default viewport (canvas) size
    pub const VIEWPORT_WIDTH: f64 = 800.0;
    pub const VIEWPORT_HEIGHT: f64 = 400.0;

    /// Camera dead-zone, as fractions of the viewport width
    pub const CAMERA_LEFT_EDGE: f64 = 0.3;
    pub const CAMERA_RIGHT_EDGE: f64 = 0.7;

    /// How long a notification stays up (ms)
    pub const NOTIFICATION_MS: f64 = 2000.0;
    /// Distance from the level end at which the "goal ahead" hint appears
    pub const GOAL_AHEAD_DISTANCE: f64 = 500.0;
}
