//! Level layout
//!
//! The built-in level is 16 platforms spread over the 5000-unit course, three
//! artifact checkpoints and a goal near the far end. Layouts are plain serde
//! data so alternative courses can be loaded from JSON.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Platform;
use crate::consts::LEVEL_WIDTH;

/// Static description of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Collision surfaces, resolved in this order every tick
    pub platforms: Vec<Platform>,
    /// Top-left corners of the artifact checkpoints
    pub checkpoints: Vec<DVec2>,
    /// Top-left corner of the goal
    pub goal: DVec2,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            platforms: vec![
                Platform::new(100.0, 320.0, 200.0),
                Platform::new(400.0, 280.0, 150.0),
                Platform::new(650.0, 240.0, 120.0),
                Platform::new(900.0, 200.0, 180.0),
                Platform::new(1200.0, 280.0, 160.0),
                Platform::new(1500.0, 240.0, 140.0),
                Platform::new(1800.0, 320.0, 200.0),
                Platform::new(2100.0, 280.0, 150.0),
                Platform::new(2400.0, 200.0, 120.0),
                Platform::new(2700.0, 320.0, 250.0),
                Platform::new(3100.0, 280.0, 180.0),
                Platform::new(3400.0, 240.0, 160.0),
                Platform::new(3700.0, 320.0, 200.0),
                Platform::new(4000.0, 280.0, 150.0),
                Platform::new(4300.0, 200.0, 120.0),
                Platform::new(4600.0, 320.0, 200.0),
            ],
            checkpoints: vec![
                DVec2::new(300.0, 280.0),
                DVec2::new(1600.0, 160.0),
                DVec2::new(3500.0, 160.0),
            ],
            goal: DVec2::new(4800.0, 280.0),
        }
    }
}

/// Why a layout was rejected
#[derive(Debug)]
pub enum LevelError {
    /// Not valid layout JSON
    Parse(serde_json::Error),
    /// A course needs at least one platform
    EmptyPlatforms,
    /// A course needs at least one checkpoint
    NoCheckpoints,
    /// Platform `index` has a zero or negative dimension
    NonPositiveSize { index: usize },
    /// Something starts outside `[0, LEVEL_WIDTH)`
    OutOfBounds { what: &'static str, x: f64 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Parse(e) => write!(f, "invalid level JSON: {}", e),
            LevelError::EmptyPlatforms => write!(f, "level has no platforms"),
            LevelError::NoCheckpoints => write!(f, "level has no checkpoints"),
            LevelError::NonPositiveSize { index } => {
                write!(f, "platform {} has a non-positive size", index)
            }
            LevelError::OutOfBounds { what, x } => {
                write!(f, "{} at x={} lies outside the level", what, x)
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

fn in_level(x: f64) -> bool {
    (0.0..LEVEL_WIDTH).contains(&x)
}

impl LevelLayout {
    /// Parse and validate a layout
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the authoring invariants
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.platforms.is_empty() {
            return Err(LevelError::EmptyPlatforms);
        }
        if self.checkpoints.is_empty() {
            return Err(LevelError::NoCheckpoints);
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(LevelError::NonPositiveSize { index });
            }
            if !in_level(platform.pos.x) {
                return Err(LevelError::OutOfBounds {
                    what: "platform",
                    x: platform.pos.x,
                });
            }
        }

        if let Some(cp) = self.checkpoints.iter().find(|cp| !in_level(cp.x)) {
            return Err(LevelError::OutOfBounds {
                what: "checkpoint",
                x: cp.x,
            });
        }

        if !in_level(self.goal.x) {
            return Err(LevelError::OutOfBounds {
                what: "goal",
                x: self.goal.x,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_level_shape() {
        let level = LevelLayout::default();
        assert_eq!(level.platforms.len(), 16);
        assert_eq!(level.checkpoints.len(), 3);
        assert!(level.goal.x > LEVEL_WIDTH - 500.0);
        assert!(level.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_layout() {
        let level = LevelLayout::default();
        let json = level.to_json().unwrap();
        assert_eq!(LevelLayout::from_json(&json).unwrap(), level);
    }

    #[test]
    fn test_platform_height_defaults() {
        let json = r#"{
            "platforms": [{ "pos": [10.0, 300.0], "width": 80.0 }],
            "checkpoints": [[200.0, 250.0]],
            "goal": [400.0, 280.0]
        }"#;
        let level = LevelLayout::from_json(json).unwrap();
        assert_eq!(level.platforms[0].height, 20.0);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert!(matches!(
            LevelLayout::from_json("not json"),
            Err(LevelError::Parse(_))
        ));

        let mut level = LevelLayout::default();
        level.platforms[3].width = 0.0;
        assert!(matches!(
            level.validate(),
            Err(LevelError::NonPositiveSize { index: 3 })
        ));

        let mut level = LevelLayout::default();
        level.goal.x = 6000.0;
        assert!(matches!(
            level.validate(),
            Err(LevelError::OutOfBounds { what: "goal", .. })
        ));

        let mut level = LevelLayout::default();
        level.checkpoints.clear();
        assert!(matches!(level.validate(), Err(LevelError::NoCheckpoints)));
    }
}
