//! Player preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause the countdown and falling while the tab is hidden
    pub pause_on_hidden: bool,

    // === Accessibility ===
    /// Reduced motion (no highlight on the problem just answered)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_hidden: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "multiplication-rain-settings";

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Load settings, defaults when absent or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load_or_default(storage, Self::STORAGE_KEY)
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persistence::store(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < f32::EPSILON);
        settings.toggle_mute();
        assert_eq!(settings.effective_volume(), 0.0);
        settings.toggle_mute();
        settings.sfx_volume = 2.0;
        assert!((settings.effective_volume() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_settings_persist() {
        let mut storage = MemoryStorage::new();
        let settings = Settings {
            muted: true,
            reduced_motion: true,
            ..Default::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted":true}"#).unwrap();
        assert!(settings.muted);
        assert!(settings.pause_on_hidden);
        assert!((settings.master_volume - 0.8).abs() < f32::EPSILON);
    }
}
