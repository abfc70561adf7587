//! Nitro Lane - an endless-lane top-down driving game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (world state, spawning, collisions, power-ups)
//! - `game`: Frame driver wiring the simulation to its host capabilities
//! - `renderer`: Render surface capability and scene drawing
//! - `audio`: Sound cue sink (Web Audio on wasm32)
//! - `highscores`: Persistent high score store
//! - `platform`: Browser implementations of the host capabilities
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::{HighScoreStore, MemoryHighScore};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default playfield dimensions (canvas pixels)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 700.0;

    /// Car sprites are 8x10 cells at 6 px per cell, drawn upright
    pub const CAR_WIDTH: f32 = 48.0;
    pub const CAR_HEIGHT: f32 = 60.0;
    /// Distance between the player's rear bumper and the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;
    /// Keyboard steering step is twice this
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Shield and disaster pickups
    pub const PICKUP_SIZE: f32 = 30.0;

    pub const METEOR_RADIUS: f32 = 20.0;

    /// Entities are culled once their top edge is this far below the playfield
    pub const CULL_MARGIN: f32 = 10.0;

    /// Explosion particles live this many frames
    pub const EXPLOSION_LIFE: u32 = 30;
    pub const EXPLOSION_RADIUS: f32 = 20.0;

    /// Screen shake frames on crash / meteor impact
    pub const CRASH_SHAKE_FRAMES: u32 = 20;
    pub const IMPACT_SHAKE_FRAMES: u32 = 8;

    /// Road lane markings
    pub const ROAD_LINE_COUNT: usize = 3;
    pub const ROAD_LINE_WIDTH: f32 = 5.0;
    pub const ROAD_LINE_LENGTH: f32 = 50.0;
    pub const ROAD_LINE_SPACING: f32 = 80.0;

    /// Frames per second the timers are expressed in (for HUD seconds)
    pub const FRAMES_PER_SECOND: u32 = 60;
}

/// Linear interpolation from `start` toward `end` by `amt`
#[inline]
pub fn lerp(start: f32, end: f32, amt: f32) -> f32 {
    (1.0 - amt) * start + amt * end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert!((lerp(2.0, 10.0, 0.25) - 4.0).abs() < 1e-6);
    }
}
