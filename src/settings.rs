use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::playback::PlaybackClock;

/// Persistent player preferences
///
/// Applied to the clock through its operations at startup; `reset` still
/// restores the clock's built-in defaults, not these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub playback_speed: f64,
    pub camera_follow: bool,
    pub skip_idle: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            playback_speed: 1.0,
            camera_follow: true,
            skip_idle: false,
        }
    }
}

impl PlayerSettings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ride-viz").join("settings.json"))
    }

    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(contents) = fs::read_to_string(&path) {
                    match serde_json::from_str(&contents) {
                        Ok(settings) => return settings,
                        Err(e) => warn!("Ignoring unreadable settings file: {}", e),
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                if let Err(e) = fs::write(&path, json) {
                    warn!("Failed to save settings: {}", e);
                }
            }
        }
    }

    /// Push these preferences into a clock
    pub fn apply(&self, clock: &mut PlaybackClock) {
        clock.set_playback_speed(self.playback_speed);
        clock.set_camera_follow(self.camera_follow);
        clock.set_skip_idle(self.skip_idle);
    }

    /// Capture the preference-shaped part of a clock's state
    pub fn capture(clock: &PlaybackClock) -> Self {
        Self {
            playback_speed: clock.playback_speed(),
            camera_follow: clock.camera_follow(),
            skip_idle: clock.skip_idle(),
        }
    }
}
