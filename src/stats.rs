//! Lifetime statistics and best-time record
//!
//! Two LocalStorage records: a standalone best time (shown on the game-over
//! screen) and an aggregate read by the stats screen. Both tolerate absence
//! and fall back to zeroed defaults.

use serde::{Deserialize, Serialize};

/// Lifetime aggregate across all sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// Longest survival in seconds
    pub best_time: f32,
    pub total_games: u32,
    /// Shields still carried at each game over, summed
    pub total_barriers: u32,
    /// Seconds survived across all sessions
    pub total_time: f32,
}

impl Statistics {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shield_runner_statistics";

    /// Fold one finished session into the aggregate.
    /// Returns true if the session set a new best time.
    pub fn record_session(&mut self, survived_secs: f32, barriers_held: u32) -> bool {
        self.total_games += 1;
        self.total_barriers += barriers_held;
        self.total_time += survived_secs;
        if survived_secs > self.best_time {
            self.best_time = survived_secs;
            return true;
        }
        false
    }

    /// Load statistics from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(stats) = serde_json::from_str::<Statistics>(&json) {
                    return stats;
                }
                log::warn!("Stored statistics unreadable, starting fresh");
            }
        }

        Self::default()
    }

    /// Save statistics to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Statistics saved ({} games)", self.total_games);
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

/// Standalone best-time record shown on the game-over screen
pub struct BestTime;

impl BestTime {
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shield_runner_best_time";

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> f32 {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok())
            .flatten()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn store(seconds: f32) {
        if let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &seconds.to_string());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> f32 {
        0.0
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn store(_seconds: f32) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_session_accumulates() {
        let mut stats = Statistics::default();
        assert!(stats.record_session(42.5, 2));
        assert!(stats.record_session(10.0, 0));
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_barriers, 2);
        assert!((stats.total_time - 52.5).abs() < 1e-3);
        assert!((stats.best_time - 42.5).abs() < 1e-3);
    }

    #[test]
    fn test_best_time_only_improves() {
        let mut stats = Statistics::default();
        stats.record_session(30.0, 0);
        assert!(!stats.record_session(29.9, 0));
        assert!((stats.best_time - 30.0).abs() < 1e-3);
        assert!(stats.record_session(30.1, 0));
    }

    #[test]
    fn test_partial_stored_record_tolerated() {
        // Older records may predate total_time
        let stats: Statistics =
            serde_json::from_str(r#"{"best_time":12.0,"total_games":3,"total_barriers":7}"#)
                .unwrap();
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.total_time, 0.0);
    }
}
