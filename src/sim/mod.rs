//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay host-agnostic:
//! - One tick per animation frame, timers count frames
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies (events are queued instead)

pub mod collision;
pub mod powerup;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, is_off_screen};
pub use spawn::{DifficultyTier, difficulty_tier, spawn_x};
pub use state::{
    Disaster, GameEvent, GameState, Meteor, Obstacle, Particle, Player, Playfield, RoadLine,
    Shield,
};
pub use tick::{TickInput, TickOutcome, tick};
