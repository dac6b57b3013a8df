//! Player settings and preferences
//!
//! Persisted separately from high scores through the same key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;

/// Pong opponent difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pong opponent strength
    pub difficulty: Difficulty,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "arcade_settings";

    /// Volume actually sent to the audio backend
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Push preference-driven values into the balance config
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.pong.difficulty = self.difficulty;
    }

    /// Load settings, falling back to defaults on a missing or corrupt entry
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding corrupt settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_settings_persist() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Hard,
            master_volume: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).expect("serializable");
        assert!(store.set(Settings::STORAGE_KEY, &json));

        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set("arcade_settings", "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store.set("arcade_settings", r#"{"difficulty":"Easy"}"#);

        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_apply_to_tuning() {
        let mut tuning = Tuning::default();
        let settings = Settings {
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        settings.apply_to(&mut tuning);
        assert_eq!(tuning.pong.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_effective_volume() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_volume() - 0.25).abs() < 1e-6);
    }
}
