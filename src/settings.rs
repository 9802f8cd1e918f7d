//! Game settings and preferences
//!
//! Persisted separately from statistics in LocalStorage. Absent or corrupt
//! stored values fall back to defaults; saving is best-effort.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound volume, 0-100 (matches the settings slider)
    pub sound_volume: u32,
    pub sound_enabled: bool,
    /// Haptic feedback on supported devices
    pub vibration: bool,
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_volume: 50,
            sound_enabled: true,
            vibration: true,
            difficulty: Difficulty::Medium,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shield_runner_settings";

    /// Volume as a 0.0-1.0 gain factor
    pub fn volume_gain(&self) -> f32 {
        if self.sound_enabled {
            self.sound_volume.min(100) as f32 / 100.0
        } else {
            0.0
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
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

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_gain() {
        let mut settings = Settings::default();
        assert_eq!(settings.volume_gain(), 0.5);
        settings.sound_volume = 100;
        assert_eq!(settings.volume_gain(), 1.0);
        settings.sound_enabled = false;
        assert_eq!(settings.volume_gain(), 0.0);
        // Out-of-range stored values are clamped, not trusted
        settings.sound_enabled = true;
        settings.sound_volume = 900;
        assert_eq!(settings.volume_gain(), 1.0);
    }

    #[test]
    fn test_roundtrip_json() {
        let settings = Settings {
            sound_volume: 80,
            sound_enabled: false,
            vibration: true,
            difficulty: Difficulty::Hard,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sound_volume, 80);
        assert!(!back.sound_enabled);
        assert_eq!(back.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let back: Settings = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.sound_volume, 50);
        assert!(back.vibration);
    }
}
