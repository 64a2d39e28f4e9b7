//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, in a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::Viewport;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    /// Canvas width used when the container size is unknown
    pub viewport_width: f64,
    /// Canvas height (the floor of the world)
    pub viewport_height: f64,

    // === Visual Effects ===
    /// Parallax starfield behind the level
    pub starfield: bool,
    /// Glow halos around entities
    pub glow: bool,

    // === HUD ===
    /// In-canvas position/progress/artifact lines
    pub show_hud: bool,

    // === Accessibility ===
    /// Reduced motion (no checkpoint pulsing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            starfield: true,
            glow: true,

            show_hud: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Viewport described by these settings, with non-positive sizes replaced by defaults
    pub fn viewport(&self) -> Viewport {
        let pick = |v: f64, fallback: f64| if v > 0.0 && v.is_finite() { v } else { fallback };
        Viewport {
            width: pick(self.viewport_width, VIEWPORT_WIDTH),
            height: pick(self.viewport_height, VIEWPORT_HEIGHT),
        }
    }

    /// Effective glow (respects reduced_motion for the animated parts only)
    pub fn effective_pulse(&self) -> bool {
        self.glow && !self.reduced_motion
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "abyss_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "viewport_width": 1024.0, "glow": false }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.viewport_width, 1024.0);
        assert_eq!(settings.viewport_height, VIEWPORT_HEIGHT);
        assert!(!settings.glow);
        assert!(settings.starfield);
    }

    #[test]
    fn test_bad_viewport_falls_back() {
        let settings = Settings {
            viewport_width: 0.0,
            viewport_height: f64::NAN,
            ..Settings::default()
        };
        assert_eq!(settings.viewport(), Viewport::default());
    }

    #[test]
    fn test_reduced_motion_stops_pulse() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_pulse());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_to_then_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            viewport_width: 1280.0,
            glow: false,
            reduced_motion: true,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from(std::path::Path::new("/nonexistent/abyss.json"));
        assert_eq!(settings, Settings::default());
    }
}
