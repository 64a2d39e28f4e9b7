//! Fixed-step simulation tick
//!
//! One call advances the world by one frame's worth of motion. Order within a
//! tick: movement intent, jump intent, collisions (while triggers are armed),
//! then integration and camera follow.

use serde::{Deserialize, Serialize};

use super::collision::handle_collisions;
use super::state::GameState;

/// Held state of the four gameplay controls, read once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub move_left: bool,
    pub move_right: bool,
    /// Up arrow
    pub jump_primary: bool,
    /// Space bar
    pub jump_secondary: bool,
}

impl KeyState {
    pub fn jump_held(&self) -> bool {
        self.jump_primary || self.jump_secondary
    }

    /// Release everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Set horizontal velocity from the held keys; left wins over right
fn apply_movement(state: &mut GameState, keys: &KeyState) {
    let player = &mut state.player;
    if !state.triggers_active || player.frozen {
        player.vel.x = 0.0;
        return;
    }

    player.vel.x = if keys.move_left {
        -player.speed
    } else if keys.move_right {
        player.speed
    } else {
        0.0
    };
}

fn apply_jump(state: &mut GameState, keys: &KeyState) {
    if keys.jump_held() && state.player.can_jump && !state.player.frozen {
        state.player.jump();
        log::debug!("Jump at x={:.1}", state.player.pos.x);
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, keys: &KeyState) {
    if !state.phase.is_running() {
        return;
    }

    state.time_ticks += 1;

    apply_movement(state, keys);
    apply_jump(state, keys);

    if state.triggers_active {
        handle_collisions(state);
    }

    let viewport = state.viewport;
    state.player.update(&mut state.camera, viewport);
}
