//! Horizontal soft-follow camera
//!
//! The player may roam the central band of the viewport (between the 30% and
//! 70% lines) without scrolling. Leaving the band drags the camera along,
//! bounded to `[0, level_width - viewport_width]`.

use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_LEFT_EDGE, CAMERA_RIGHT_EDGE};

/// Scroll state of the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World x shown at the left edge of the viewport
    pub offset: f64,
}

impl Camera {
    /// Largest valid offset; zero when the viewport is wider than the level
    #[inline]
    pub fn max_offset(level_width: f64, viewport_width: f64) -> f64 {
        (level_width - viewport_width).max(0.0)
    }

    /// Convert a world x to screen space
    #[inline]
    pub fn to_screen_x(&self, world_x: f64) -> f64 {
        world_x - self.offset
    }

    /// Apply the dead-zone rule for a player at world x `player_x`
    pub fn follow(&mut self, player_x: f64, viewport_width: f64, level_width: f64) {
        let right_edge = viewport_width * CAMERA_RIGHT_EDGE;
        let left_edge = viewport_width * CAMERA_LEFT_EDGE;
        let max_offset = Self::max_offset(level_width, viewport_width);

        if self.to_screen_x(player_x) > right_edge && self.offset < max_offset {
            self.offset = (player_x - right_edge).min(max_offset);
        }

        if self.to_screen_x(player_x) < left_edge && self.offset > 0.0 {
            self.offset = (player_x - left_edge).max(0.0);
        }
    }

    /// Re-clamp after the viewport changes size
    pub fn clamp_to(&mut self, viewport_width: f64, level_width: f64) {
        self.offset = self
            .offset
            .clamp(0.0, Self::max_offset(level_width, viewport_width));
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const LEVEL: f64 = 5000.0;

    #[test]
    fn test_dead_zone_holds_still() {
        let mut cam = Camera { offset: 100.0 };
        // Screen x 400 is between 240 and 560
        cam.follow(500.0, W, LEVEL);
        assert_eq!(cam.offset, 100.0);
    }

    #[test]
    fn test_advances_past_right_line() {
        let mut cam = Camera::default();
        cam.follow(600.0, W, LEVEL);
        assert!((cam.offset - 40.0).abs() < 1e-4);
        // Player now sits exactly on the 70% line
        assert!((cam.to_screen_x(600.0) - 560.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_bound() {
        let mut cam = Camera::default();
        cam.follow(4990.0, W, LEVEL);
        assert_eq!(cam.offset, LEVEL - W);
    }

    #[test]
    fn test_retreats_past_left_line() {
        let mut cam = Camera { offset: 1000.0 };
        cam.follow(1100.0, W, LEVEL);
        assert!((cam.offset - 860.0).abs() < 1e-4);
    }

    #[test]
    fn test_left_bound() {
        let mut cam = Camera { offset: 100.0 };
        cam.follow(10.0, W, LEVEL);
        assert_eq!(cam.offset, 0.0);
    }

    #[test]
    fn test_wide_viewport_never_scrolls() {
        let mut cam = Camera::default();
        cam.follow(4900.0, 6000.0, LEVEL);
        assert_eq!(cam.offset, 0.0);
    }

    #[test]
    fn test_clamp_after_resize() {
        let mut cam = Camera { offset: 4200.0 };
        cam.clamp_to(1000.0, LEVEL);
        assert_eq!(cam.offset, 4000.0);
    }
}
