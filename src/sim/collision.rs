//! Collision detection and response against static geometry
//!
//! Platforms are resolved one at a time in list order. The side that was hit
//! is guessed from the velocity sign and where the player would have been
//! one tick earlier; this is not a swept test, so a fast enough player can
//! pass through a thin platform in a single tick.

use super::aabb::Aabb;
use super::state::{GameState, Platform, Player, Viewport};

/// Which face of a platform a contact was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on the top face
    Top,
    /// Bumped the underside while rising
    Bottom,
    /// Walked into the left face
    Left,
    /// Walked into the right face
    Right,
}

/// Resolve a single platform against the player, first applicable rule wins
///
/// Returns `None` when the boxes do not overlap or no rule applies
/// (overlapping with zero velocity).
pub fn resolve_platform(player: &mut Player, platform: &Platform) -> Option<Contact> {
    let bounds: Aabb = platform.aabb();
    if !player.aabb().overlaps(&bounds) {
        return None;
    }

    if player.vel.y > 0.0 && player.pos.y + player.height - player.vel.y <= bounds.top() {
        player.pos.y = bounds.top() - player.height;
        player.vel.y = 0.0;
        player.can_jump = true;
        Some(Contact::Top)
    } else if player.vel.y < 0.0 && player.pos.y - player.vel.y >= bounds.bottom() {
        player.pos.y = bounds.bottom();
        player.vel.y = 0.0;
        Some(Contact::Bottom)
    } else if player.vel.x > 0.0 {
        player.pos.x = bounds.left() - player.width;
        Some(Contact::Left)
    } else if player.vel.x < 0.0 {
        player.pos.x = bounds.right();
        Some(Contact::Right)
    } else {
        None
    }
}

/// Resolve every platform in order; returns true if the player landed on one
///
/// Standing on (or below) the viewport floor re-enables jumping even when no
/// platform was landed on.
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform], viewport: Viewport) -> bool {
    let mut on_ground = false;

    for platform in platforms {
        if resolve_platform(player, platform) == Some(Contact::Top) {
            on_ground = true;
        }
    }

    if !on_ground && player.pos.y + player.height >= viewport.height {
        player.can_jump = true;
    }

    on_ground
}

/// Claim any overlapped checkpoints and the goal
///
/// Already-claimed triggers are skipped, so standing inside one for many
/// ticks fires it once.
pub fn resolve_triggers(state: &mut GameState) {
    let player_box = state.player.aabb();

    let hits: Vec<usize> = state
        .checkpoints
        .iter()
        .enumerate()
        .filter(|(_, cp)| !cp.is_claimed() && player_box.overlaps(&cp.aabb()))
        .map(|(i, _)| i)
        .collect();
    for index in hits {
        state.claim_checkpoint(index);
    }

    if !state.goal.is_reached() && player_box.overlaps(&state.goal.aabb()) {
        state.reach_goal();
    }
}

/// Full collision pass for one tick: platforms, then triggers
pub fn handle_collisions(state: &mut GameState) {
    let landed = resolve_platforms(&mut state.player, &state.platforms, state.viewport);
    if landed {
        log::debug!("Landed at ({:.1}, {:.1})", state.player.pos.x, state.player.pos.y);
    }
    resolve_triggers(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn player_at(x: f64, y: f64, vel: DVec2) -> Player {
        Player {
            pos: DVec2::new(x, y),
            vel,
            ..Player::default()
        }
    }

    #[test]
    fn test_landing_on_top() {
        let platform = Platform::new(100.0, 320.0, 200.0);
        // Bottom at 324, was at 319 one tick ago
        let mut player = player_at(150.0, 284.0, DVec2::new(0.0, 5.0));
        player.can_jump = false;

        assert_eq!(resolve_platform(&mut player, &platform), Some(Contact::Top));
        assert_eq!(player.pos.y, 320.0 - player.height);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.can_jump);
    }

    #[test]
    fn test_hitting_underside() {
        let platform = Platform::new(100.0, 320.0, 200.0);
        // Top at 336, was at 342 one tick ago (below the bottom face at 340)
        let mut player = player_at(150.0, 336.0, DVec2::new(0.0, -6.0));
        player.can_jump = false;

        assert_eq!(resolve_platform(&mut player, &platform), Some(Contact::Bottom));
        assert_eq!(player.pos.y, 340.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.can_jump);
    }

    #[test]
    fn test_side_faces() {
        let platform = Platform::new(100.0, 320.0, 200.0);

        let mut moving_right = player_at(80.0, 300.0, DVec2::new(7.0, 0.0));
        assert_eq!(resolve_platform(&mut moving_right, &platform), Some(Contact::Left));
        assert_eq!(moving_right.pos.x, 70.0);

        let mut moving_left = player_at(290.0, 300.0, DVec2::new(-7.0, 0.0));
        assert_eq!(resolve_platform(&mut moving_left, &platform), Some(Contact::Right));
        assert_eq!(moving_left.pos.x, 300.0);
    }

    #[test]
    fn test_deep_fall_is_a_side_hit() {
        // Falling, but already deeper than one tick of motion: not a landing
        let platform = Platform::new(100.0, 320.0, 200.0);
        let mut player = player_at(150.0, 300.0, DVec2::new(7.0, 5.0));
        assert_eq!(resolve_platform(&mut player, &platform), Some(Contact::Left));
        assert_eq!(player.pos.x, 100.0 - player.width);
    }

    #[test]
    fn test_no_overlap_no_change() {
        let platform = Platform::new(100.0, 320.0, 200.0);
        let mut player = player_at(50.0, 200.0, DVec2::new(0.0, 0.8));
        assert_eq!(resolve_platform(&mut player, &platform), None);
        assert_eq!(player.pos, DVec2::new(50.0, 200.0));
    }

    #[test]
    fn test_resting_overlap_without_velocity_is_ignored() {
        let platform = Platform::new(100.0, 320.0, 200.0);
        let mut player = player_at(150.0, 300.0, DVec2::ZERO);
        assert_eq!(resolve_platform(&mut player, &platform), None);
        assert_eq!(player.pos, DVec2::new(150.0, 300.0));
    }

    #[test]
    fn test_floor_reenables_jump() {
        let mut player = player_at(10.0, 360.0, DVec2::ZERO);
        player.can_jump = false;
        let landed = resolve_platforms(&mut player, &[], Viewport::default());
        assert!(!landed);
        assert!(player.can_jump);
    }

    #[test]
    fn test_adjacent_platforms_first_snap_clears_second() {
        let left = Platform::new(100.0, 320.0, 100.0);
        let right = Platform::new(200.0, 320.0, 100.0);
        // Straddles the seam, bottom 4 units into both tops
        let mut player = player_at(180.0, 284.0, DVec2::new(0.0, 5.0));
        player.can_jump = false;

        // After the first snap the bottom touches the second top exactly, no overlap
        assert!(resolve_platforms(&mut player, &[left, right], Viewport::default()));
        assert_eq!(player.pos, DVec2::new(180.0, 280.0));
        assert_eq!(player.vel.y, 0.0);
        assert!(player.can_jump);
    }

    #[test]
    fn test_list_order_decides_outcome() {
        let floor = Platform::new(200.0, 320.0, 100.0);
        // Tall wall overlapping the floor's left end
        let wall = Platform {
            height: 200.0,
            ..Platform::new(195.0, 200.0, 20.0)
        };
        let falling_right = || {
            let mut player = player_at(180.0, 284.0, DVec2::new(7.0, 5.0));
            player.can_jump = false;
            player
        };

        // Floor first: land, then get pushed off the wall's left face
        let mut player = falling_right();
        let platforms = [floor.clone(), wall.clone()];
        let landed = resolve_platforms(&mut player, &platforms, Viewport::default());
        assert!(landed);
        assert_eq!(player.pos, DVec2::new(165.0, 280.0));
        assert!(player.can_jump);

        // Wall first: the side push moves the player clear of the floor
        let mut player = falling_right();
        let landed = resolve_platforms(&mut player, &[wall, floor], Viewport::default());
        assert!(!landed);
        assert_eq!(player.pos, DVec2::new(165.0, 284.0));
        assert_eq!(player.vel.y, 5.0);
        assert!(!player.can_jump);
    }

    #[test]
    fn test_triggers_fire_once() {
        let mut state = GameState::new(Viewport::default());
        let cp = state.checkpoints[0].pos;
        state.player.pos = cp;

        resolve_triggers(&mut state);
        resolve_triggers(&mut state);
        assert_eq!(state.found_checkpoints, 1);
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_goal_trigger_freezes() {
        let mut state = GameState::new(Viewport::default());
        state.player.pos = state.goal.pos;
        state.player.vel = DVec2::new(7.0, 3.0);

        resolve_triggers(&mut state);
        assert!(state.goal.is_reached());
        assert!(state.player.frozen);
        assert_eq!(state.player.vel, DVec2::ZERO);
        assert!(!state.triggers_active);
    }
}
