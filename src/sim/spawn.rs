//! Entity spawning policy
//!
//! Obstacles follow score-keyed difficulty tiers. Shields and disasters roll
//! small independent per-frame chances, but never while another power-up is
//! falling or running.

use glam::Vec2;
use rand::Rng;

use super::state::{Disaster, GameState, Obstacle, Shield};
use crate::consts::{CAR_HEIGHT, CAR_WIDTH, PICKUP_SIZE};

/// Attempts at finding a lane position that does not overlap another car
const OBSTACLE_PLACEMENT_ATTEMPTS: usize = 4;

/// How many obstacles may be on screen at a given score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyTier {
    /// Below this count an obstacle is spawned unconditionally
    pub min_obstacles: usize,
    /// At or above this count nothing spawns
    pub max_obstacles: usize,
}

/// Difficulty tier for the current score
pub fn difficulty_tier(score: u32) -> DifficultyTier {
    let (min_obstacles, max_obstacles) = match score {
        0 => (1, 1),
        1..=19 => (1, 4),
        20..=39 => (1, 5),
        40..=69 => (4, 5),
        _ => (5, 5),
    };
    DifficultyTier {
        min_obstacles,
        max_obstacles,
    }
}

/// Random left edge keeping an entity of `width` fully inside the playfield.
///
/// A playfield narrower than the entity pins it to `0`.
pub fn spawn_x<R: Rng + ?Sized>(rng: &mut R, width: f32, playfield_width: f32) -> f32 {
    let span = (playfield_width - width).max(0.0);
    (rng.random::<f32>() * span).min(span)
}

/// Bernoulli roll that tolerates out-of-range rates from hand-edited tuning
fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() || p <= 0.0 {
        return false;
    }
    rng.random_bool(p.min(1.0))
}

/// Run the spawner for one frame
pub fn run(state: &mut GameState) {
    spawn_obstacles(state);
    spawn_power_ups(state);
}

fn spawn_obstacles(state: &mut GameState) {
    if state.disaster.active && !state.tuning.spawn_obstacles_during_disaster {
        return;
    }

    let tier = difficulty_tier(state.score);
    let count = state.obstacles.len();

    if count < tier.min_obstacles {
        spawn_obstacle(state, true);
    } else if count < tier.max_obstacles
        && chance(&mut state.rng, state.tuning.obstacle_spawn_rate)
    {
        spawn_obstacle(state, false);
    }
}

/// Place one obstacle above the top edge, avoiding overlap with cars still
/// entering the screen. If no free spot is found an optional spawn gives up
/// for this frame; a forced one takes the last position tried.
fn spawn_obstacle(state: &mut GameState, forced: bool) -> bool {
    let width = state.playfield.width;
    let mut last = None;
    for _ in 0..OBSTACLE_PLACEMENT_ATTEMPTS {
        let x = spawn_x(&mut state.rng, CAR_WIDTH, width);
        let candidate = Obstacle::new(Vec2::new(x, -CAR_HEIGHT));
        let rect = candidate.rect();
        if state.obstacles.iter().all(|o| !o.rect().overlaps(&rect)) {
            state.obstacles.push(candidate);
            return true;
        }
        last = Some(candidate);
    }
    match last {
        Some(candidate) if forced => {
            state.obstacles.push(candidate);
            true
        }
        _ => false,
    }
}

/// Whether a shield or disaster is on screen or currently running
pub fn power_up_in_play(state: &GameState) -> bool {
    !state.shields.is_empty()
        || !state.disasters.is_empty()
        || state.shield.active
        || state.disaster.active
}

fn spawn_power_ups(state: &mut GameState) {
    if power_up_in_play(state) {
        return;
    }

    let width = state.playfield.width;
    // Both rolls happen every frame so the two rates stay independent
    let shield_roll = chance(&mut state.rng, state.tuning.shield_spawn_rate);
    let disaster_roll = chance(&mut state.rng, state.tuning.disaster_spawn_rate);

    if shield_roll {
        let x = spawn_x(&mut state.rng, PICKUP_SIZE, width);
        state.shields.push(Shield::new(Vec2::new(x, -PICKUP_SIZE)));
    } else if disaster_roll {
        let x = spawn_x(&mut state.rng, PICKUP_SIZE, width);
        state.disasters.push(Disaster::new(Vec2::new(x, -PICKUP_SIZE)));
    }
}
