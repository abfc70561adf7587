//! World state and core simulation types
//!
//! Everything that changes during a run lives in [`GameState`]. It is created
//! once, mutated by [`super::tick`] every frame and cleared by
//! [`GameState::reset`] on restart. Only the high score survives a reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Visible play area in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Keyboard steering step is `speed * 2`
    pub speed: f32,
    /// Steering tilt (radians)
    pub rotation: f32,
    /// Fades to zero after a crash
    pub opacity: f32,
}

impl Player {
    /// Player parked at the start position, bottom centre of the playfield
    pub fn at_start(playfield: &Playfield) -> Self {
        Self {
            pos: Vec2::new(
                playfield.width / 2.0 - CAR_WIDTH / 2.0,
                playfield.height - PLAYER_BOTTOM_OFFSET,
            ),
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            speed: PLAYER_SPEED,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    /// Move the car's left edge to `x`, clamped to the playfield.
    /// NaN is ignored.
    pub fn steer_to(&mut self, x: f32, playfield: &Playfield) {
        if x.is_nan() {
            return;
        }
        let max_x = (playfield.width - self.width).max(0.0);
        self.pos.x = x.clamp(0.0, max_x);
    }
}

/// An oncoming car
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Spin-out after the player crashes (radians)
    pub rotation: f32,
    pub opacity: f32,
    /// Set once the obstacle has been overtaken and scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            width: CAR_WIDTH,
            height: CAR_HEIGHT,
            rotation: 0.0,
            opacity: 1.0,
            passed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }
}

/// Shield pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    pub pos: Vec2,
    pub size: f32,
}

impl Shield {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PICKUP_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Disaster pickup; touching it converts every obstacle into a meteor
#[derive(Debug, Clone, PartialEq)]
pub struct Disaster {
    pub pos: Vec2,
    pub size: f32,
}

impl Disaster {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PICKUP_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Homing meteor heading for a fixed target
#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    /// Centre
    pub pos: Vec2,
    pub target: Vec2,
    pub radius: f32,
}

/// A fading visual particle (smoke or explosion)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// 0-1, removed once it reaches zero
    pub alpha: f32,
    /// Alpha lost per frame
    pub fade: f32,
}

impl Particle {
    /// Explosion flash that lives for [`EXPLOSION_LIFE`] frames
    pub fn explosion(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: EXPLOSION_RADIUS,
            alpha: 1.0,
            fade: 1.0 / EXPLOSION_LIFE as f32,
        }
    }
}

/// Centre lane marking
#[derive(Debug, Clone, PartialEq)]
pub struct RoadLine {
    pub x: f32,
    pub y: f32,
}

/// Nitro boost timers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nitro {
    pub active: bool,
    /// Frames of boost remaining
    pub duration: u32,
    /// Frames until nitro can be triggered again
    pub cooldown: u32,
}

/// Shield power-up timer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShieldTimer {
    pub active: bool,
    pub duration: u32,
}

/// Disaster (slow-motion meteor shower) timer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisasterTimer {
    pub active: bool,
    pub duration: u32,
}

/// Notable transitions raised during a tick, drained by the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An obstacle was overtaken (score +1)
    Overtake,
    NitroEngaged,
    ShieldPickup,
    /// The shield destroyed an obstacle or meteor
    ShieldAbsorb,
    /// Disaster pickup touched; obstacles became this many meteors
    DisasterTriggered { meteors: usize },
    /// A meteor reached its target
    MeteorImpact,
    /// Unshielded collision, the run is over
    Crash,
}

/// Complete world state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub playfield: Playfield,
    pub tuning: Tuning,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub shields: Vec<Shield>,
    pub disasters: Vec<Disaster>,
    pub meteors: Vec<Meteor>,
    pub smoke_particles: Vec<Particle>,
    pub explosion_particles: Vec<Particle>,
    pub road_lines: Vec<RoadLine>,
    pub score: u32,
    /// Best score seen, kept across resets
    pub high_score: u32,
    /// Scroll speed of moving entities this frame
    pub game_speed: f32,
    /// Scroll speed of the road; decays after a crash
    pub background_speed: f32,
    pub game_over: bool,
    /// Where the player was when the run ended
    pub crash_site: Option<Vec2>,
    pub nitro: Nitro,
    pub shield: ShieldTimer,
    pub disaster: DisasterTimer,
    /// Remaining screen shake frames
    pub shake_frames: u32,
    /// Ticks elapsed this run
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh world with the given seed
    pub fn new(seed: u64, playfield: Playfield, tuning: Tuning) -> Self {
        let mut state = Self {
            playfield,
            tuning,
            player: Player::at_start(&playfield),
            obstacles: Vec::new(),
            shields: Vec::new(),
            disasters: Vec::new(),
            meteors: Vec::new(),
            smoke_particles: Vec::new(),
            explosion_particles: Vec::new(),
            road_lines: Vec::with_capacity(ROAD_LINE_COUNT),
            score: 0,
            high_score: 0,
            game_speed: tuning.base_speed,
            background_speed: tuning.base_speed,
            game_over: false,
            crash_site: None,
            nitro: Nitro::default(),
            shield: ShieldTimer::default(),
            disaster: DisasterTimer::default(),
            shake_frames: 0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset();
        state
    }

    /// Start a new run: zero every timer and flag, park the player, clear all
    /// collections. The high score and RNG stream are kept.
    pub fn reset(&mut self) {
        self.player = Player::at_start(&self.playfield);
        self.obstacles.clear();
        self.shields.clear();
        self.disasters.clear();
        self.meteors.clear();
        self.smoke_particles.clear();
        self.explosion_particles.clear();
        self.events.clear();

        self.road_lines.clear();
        let line_x = self.playfield.width / 2.0 - ROAD_LINE_WIDTH / 2.0;
        for i in 0..ROAD_LINE_COUNT {
            self.road_lines.push(RoadLine {
                x: line_x,
                y: i as f32 * (ROAD_LINE_LENGTH + ROAD_LINE_SPACING),
            });
        }

        self.score = 0;
        self.game_speed = self.tuning.base_speed;
        self.background_speed = self.tuning.base_speed;
        self.game_over = false;
        self.crash_site = None;
        self.nitro = Nitro::default();
        self.shield = ShieldTimer::default();
        self.disaster = DisasterTimer::default();
        self.shake_frames = 0;
        self.time_ticks = 0;
    }

    /// Number of live moving entities (obstacles, pickups, meteors)
    pub fn live_entity_count(&self) -> usize {
        self.obstacles.len() + self.shields.len() + self.disasters.len() + self.meteors.len()
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Nitro gauge fill (0-1): remaining boost while active, recharge progress otherwise
    pub fn nitro_gauge(&self) -> f32 {
        if self.nitro.active {
            self.nitro.duration as f32 / self.tuning.nitro_duration.max(1) as f32
        } else {
            1.0 - self.nitro.cooldown as f32 / self.tuning.nitro_cooldown.max(1) as f32
        }
    }

    /// Whole seconds of shield left, if active
    pub fn shield_seconds(&self) -> Option<u32> {
        self.shield
            .active
            .then(|| self.shield.duration.div_ceil(FRAMES_PER_SECOND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fresh(state: &GameState) {
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
        assert_eq!(state.crash_site, None);
        assert_eq!(state.nitro, Nitro::default());
        assert_eq!(state.shield, ShieldTimer::default());
        assert_eq!(state.disaster, DisasterTimer::default());
        assert_eq!(state.live_entity_count(), 0);
        assert!(state.smoke_particles.is_empty());
        assert!(state.explosion_particles.is_empty());
        assert_eq!(state.road_lines.len(), ROAD_LINE_COUNT);
        assert_eq!(state.player, Player::at_start(&state.playfield));
    }

    #[test]
    fn test_new_state_is_fresh() {
        let state = GameState::new(1, Playfield::default(), Tuning::default());
        assert_fresh(&state);
        assert_eq!(state.game_speed, 3.0);
    }

    #[test]
    fn test_reset_clears_run_but_keeps_high_score() {
        let mut state = GameState::new(7, Playfield::default(), Tuning::default());
        state.score = 12;
        state.high_score = 40;
        state.game_over = true;
        state.nitro.active = true;
        state.nitro.duration = 100;
        state.obstacles.push(Obstacle::new(Vec2::new(10.0, 10.0)));
        state.meteors.push(Meteor {
            pos: Vec2::ZERO,
            target: Vec2::ONE,
            radius: METEOR_RADIUS,
        });
        state.player.pos.x = 0.0;

        state.reset();
        assert_fresh(&state);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_reset_twice_is_idempotent() {
        let mut state = GameState::new(3, Playfield::default(), Tuning::default());
        state.score = 5;
        state.shields.push(Shield::new(Vec2::new(4.0, 4.0)));

        state.reset();
        let first = state.clone();
        state.reset();

        assert_fresh(&state);
        assert_eq!(state.player, first.player);
        assert_eq!(state.road_lines, first.road_lines);
        assert_eq!(state.game_speed, first.game_speed);
        assert_eq!(state.background_speed, first.background_speed);
        assert_eq!(state.rng, first.rng);
    }

    #[test]
    fn test_steer_clamps_to_playfield() {
        let playfield = Playfield::default();
        let mut player = Player::at_start(&playfield);

        player.steer_to(-50.0, &playfield);
        assert_eq!(player.pos.x, 0.0);

        player.steer_to(10_000.0, &playfield);
        assert_eq!(player.pos.x, playfield.width - player.width);

        player.steer_to(f32::NAN, &playfield);
        assert_eq!(player.pos.x, playfield.width - player.width);
    }

    #[test]
    fn test_nitro_gauge() {
        let mut state = GameState::new(1, Playfield::default(), Tuning::default());
        assert_eq!(state.nitro_gauge(), 1.0);

        state.nitro.cooldown = 360;
        assert!((state.nitro_gauge() - 0.5).abs() < 1e-6);

        state.nitro.active = true;
        state.nitro.duration = 120;
        assert!((state.nitro_gauge() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_shield_seconds_round_up() {
        let mut state = GameState::new(1, Playfield::default(), Tuning::default());
        assert_eq!(state.shield_seconds(), None);
        state.shield.active = true;
        state.shield.duration = 61;
        assert_eq!(state.shield_seconds(), Some(2));
    }
}
