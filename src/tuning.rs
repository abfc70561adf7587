//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be rebalanced from JSON
//! without touching the simulation. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

/// Game balance parameters. Durations are in frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed with no power-up active (pixels per frame)
    pub base_speed: f32,

    // === Nitro ===
    pub nitro_multiplier: f32,
    pub nitro_duration: u32,
    pub nitro_cooldown: u32,

    // === Shield ===
    pub shield_duration: u32,
    pub shield_spawn_rate: f64,

    // === Disaster ===
    pub disaster_spawn_rate: f64,
    pub disaster_duration: u32,
    /// Speed multiplier while a disaster is active (overrides nitro)
    pub disaster_slowdown: f32,
    /// Fraction of remaining distance a meteor covers per frame
    pub meteor_homing: f32,
    /// A meteor closer than this to its target explodes
    pub meteor_arrival_epsilon: f32,
    /// Whether obstacles keep spawning while meteors are in the air
    pub spawn_obstacles_during_disaster: bool,

    // === Obstacles ===
    /// Per-frame spawn probability when below the tier maximum
    pub obstacle_spawn_rate: f64,

    // === Game over ===
    /// Player opacity lost per frame after a crash
    pub crash_fade: f32,
    /// Background speed multiplier per frame after a crash
    pub background_decay: f32,

    // === Steering ===
    pub tilt_lerp: f32,
    /// Maximum steering tilt (radians)
    pub max_tilt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: 3.0,

            nitro_multiplier: 2.5,
            nitro_duration: 480,
            nitro_cooldown: 720,

            shield_duration: 600,
            shield_spawn_rate: 0.0005,

            disaster_spawn_rate: 0.0005,
            disaster_duration: 120,
            disaster_slowdown: 0.4,
            meteor_homing: 0.08,
            meteor_arrival_epsilon: 2.0,
            spawn_obstacles_during_disaster: false,

            obstacle_spawn_rate: 0.015,

            crash_fade: 0.02,
            background_decay: 0.95,

            tilt_lerp: 0.15,
            max_tilt: 0.3,
        }
    }
}

impl Tuning {
    /// LocalStorage key for a tuning override (wasm32)
    pub const STORAGE_KEY: &'static str = "nitro_lane_tuning";

    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse tuning, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                return Self::from_json_or_default(&json);
            }
        }

        Self::default()
    }

    /// Native builds read an optional JSON file path
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "nitro_multiplier": 3.0 }"#).unwrap();
        assert_eq!(tuning.nitro_multiplier, 3.0);
        assert_eq!(tuning.nitro_duration, 480);
        assert_eq!(tuning.obstacle_spawn_rate, 0.015);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(Tuning::from_json("{ nope").is_err());
        assert_eq!(Tuning::from_json_or_default("{ nope"), Tuning::default());
    }
}
