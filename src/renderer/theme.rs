//! Deep-ocean color theme

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const PLAYER: Color = [0.0, 0.898, 1.0, 1.0]; // Cyan
    pub const PLAYER_EYES: Color = BACKGROUND_TOP;
    pub const PLATFORM: Color = [0.161, 0.384, 1.0, 1.0]; // Ocean blue
    pub const PLATFORM_RIVET: Color = [0.102, 0.137, 0.494, 1.0];
    pub const CHECKPOINT: Color = [1.0, 0.427, 0.0, 1.0]; // Warning orange
    pub const GOAL: Color = [0.114, 0.914, 0.714, 1.0]; // Success green
    pub const GOAL_POLE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const GOAL_FLAG: Color = [0.0, 0.784, 0.325, 1.0];
    pub const BACKGROUND_TOP: Color = [0.039, 0.039, 0.102, 1.0];
    pub const BACKGROUND_BOTTOM: Color = [0.102, 0.102, 0.227, 1.0];
    pub const STAR: Color = [1.0, 1.0, 1.0, 0.6];
    pub const HUD_TEXT: Color = [1.0, 1.0, 1.0, 0.8];
}

/// CSS `rgba()` string for a canvas fill style
pub fn css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(css([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1)");
        assert_eq!(css(colors::STAR), "rgba(255, 255, 255, 0.6)");
    }
}
