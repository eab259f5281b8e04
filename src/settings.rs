//! Game tuning and preferences
//!
//! Loaded from an optional JSON file; every field falls back to the
//! shipped defaults, so a settings file only needs the values it changes.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::Key;

/// Errors raised while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Charge-jump tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    /// Impulse applied by an uncharged jump
    pub min_force: f32,
    /// Impulse applied by a fully charged jump
    pub max_force: f32,
    /// Seconds of holding that reach `max_force`
    pub max_charge_time: f32,
    /// Launch angle above horizontal (degrees)
    pub angle_degrees: f32,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            min_force: 5.0,
            max_force: 15.0,
            max_charge_time: 2.0,
            angle_degrees: 45.0,
        }
    }
}

/// Airborne spin tuning (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinSettings {
    /// Full loops performed by every jump
    pub base_loops: u32,
    /// Extra loops added by a fully charged jump
    pub max_additional_loops: u32,
    /// Air time the spin speed is tuned against (seconds)
    pub estimated_air_time: f32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            base_loops: 1,
            max_additional_loops: 3,
            estimated_air_time: 2.0,
        }
    }
}

/// Ground probe placement, one probe per player role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundCheckSettings {
    pub probe_radius: f32,
    /// Probe offset from the body center while player 1 is active
    pub p1_probe_offset: Vec3,
    /// Probe offset from the body center while player 2 is active
    pub p2_probe_offset: Vec3,
}

impl Default for GroundCheckSettings {
    fn default() -> Self {
        Self {
            probe_radius: 0.2,
            p1_probe_offset: Vec3::new(-0.25, -0.5, 0.0),
            p2_probe_offset: Vec3::new(0.25, -0.5, 0.0),
        }
    }
}

/// Rigid body stand-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration (units/s², positive)
    pub gravity: f32,
    pub player_mass: f32,
    pub player_half_extents: Vec3,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            player_mass: 1.0,
            player_half_extents: Vec3::splat(0.5),
        }
    }
}

/// Key bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub p1_jump: Key,
    pub p2_jump: Key,
    pub respawn: Key,
    pub restart: Key,
    pub quit: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            p1_jump: Key::Space,
            p2_jump: Key::RightShift,
            respawn: Key::X,
            restart: Key::R,
            quit: Key::Escape,
        }
    }
}

impl KeyBindings {
    /// Jump key for whichever role holds the turn
    pub fn jump_key(&self, is_player1_turn: bool) -> Key {
        if is_player1_turn {
            self.p1_jump
        } else {
            self.p2_jump
        }
    }
}

/// Remote leaderboard addressing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardSettings {
    pub table_name: String,
    pub region: String,
    /// Rows fetched and shown on the finish panel
    pub display_slots: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            table_name: "GameLeaderboard".to_string(),
            region: "us-east-2".to_string(),
            display_slots: crate::consts::LEADERBOARD_SLOTS,
        }
    }
}

/// Complete game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub jump: JumpSettings,
    pub spin: SpinSettings,
    pub ground_check: GroundCheckSettings,
    pub physics: PhysicsSettings,
    pub keys: KeyBindings,
    pub leaderboard: LeaderboardSettings,
    /// Seconds a dead player waits before respawning on their own
    pub auto_respawn_time: f32,
}

impl Settings {
    /// Default auto-respawn countdown
    pub const DEFAULT_AUTO_RESPAWN: f32 = 8.0;

    /// Check ranges that would otherwise produce NaN or inverted tuning
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.jump.max_charge_time <= 0.0 {
            return Err(invalid("jump.max_charge_time", "must be positive"));
        }
        if self.jump.min_force < 0.0 || self.jump.max_force < self.jump.min_force {
            return Err(invalid(
                "jump.max_force",
                format!(
                    "expected 0 <= min_force ({}) <= max_force ({})",
                    self.jump.min_force, self.jump.max_force
                ),
            ));
        }
        if self.spin.estimated_air_time <= 0.0 {
            return Err(invalid("spin.estimated_air_time", "must be positive"));
        }
        if self.spin.base_loops == 0 {
            return Err(invalid("spin.base_loops", "at least one loop is required"));
        }
        if self.physics.player_mass <= 0.0 {
            return Err(invalid("physics.player_mass", "must be positive"));
        }
        if self.ground_check.probe_radius <= 0.0 {
            return Err(invalid("ground_check.probe_radius", "must be positive"));
        }
        if self.keys.p1_jump == self.keys.p2_jump {
            return Err(invalid("keys.p2_jump", "both roles share one jump key"));
        }
        if self.auto_respawn_time <= 0.0 {
            return Err(invalid("auto_respawn_time", "must be positive"));
        }
        Ok(())
    }

    /// Load and validate settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jump: JumpSettings::default(),
            spin: SpinSettings::default(),
            ground_check: GroundCheckSettings::default(),
            physics: PhysicsSettings::default(),
            keys: KeyBindings::default(),
            leaderboard: LeaderboardSettings::default(),
            auto_respawn_time: Self::DEFAULT_AUTO_RESPAWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.auto_respawn_time, 8.0);
        assert_eq!(settings.keys.jump_key(true), Key::Space);
        assert_eq!(settings.keys.jump_key(false), Key::RightShift);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "jump": { "max_force": 20.0 } }"#).unwrap();
        assert_eq!(settings.jump.max_force, 20.0);
        assert_eq!(settings.jump.min_force, 5.0);
        assert_eq!(settings.spin.base_loops, 1);
        assert_eq!(settings.leaderboard.table_name, "GameLeaderboard");
        assert_eq!(settings.auto_respawn_time, 8.0);
    }

    #[test]
    fn test_inverted_forces_rejected() {
        let mut settings = Settings::default();
        settings.jump.min_force = 20.0;
        match settings.validate() {
            Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, "jump.max_force"),
            other => panic!("expected invalid field, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_charge_time_rejected() {
        let mut settings = Settings::default();
        settings.jump.max_charge_time = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_shared_jump_key_rejected() {
        let mut settings = Settings::default();
        settings.keys.p2_jump = Key::Space;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "keys.p2_jump", .. })
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "tandem_hop_settings_{}.json",
            std::process::id()
        ));
        let mut settings = Settings::default();
        settings.auto_respawn_time = 3.5;
        settings.keys.respawn = Key::R;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.auto_respawn_time, 3.5);
        assert_eq!(loaded.keys.respawn, Key::R);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("tandem_hop_settings_does_not_exist.json");
        let settings = Settings::load_or_default(Some(&path));
        assert_eq!(settings.jump.max_charge_time, 2.0);
    }
}
