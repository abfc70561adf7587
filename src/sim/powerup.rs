//! Power-up state machines
//!
//! Nitro, shield and disaster are each a countdown with an idle and an active
//! state. Nitro additionally has a cooldown, and an active disaster owns the
//! meteors it launched.

use glam::Vec2;

use super::spawn::spawn_x;
use super::state::{DisasterTimer, GameEvent, GameState, Meteor, Nitro, Particle, ShieldTimer};
use crate::consts::{IMPACT_SHAKE_FRAMES, METEOR_RADIUS};

impl Nitro {
    /// Nitro can fire only when idle and fully recharged
    pub fn can_trigger(&self) -> bool {
        !self.active && self.cooldown == 0
    }

    /// Engage the boost for `duration` frames. Returns false if blocked.
    pub fn trigger(&mut self, duration: u32) -> bool {
        if !self.can_trigger() || duration == 0 {
            return false;
        }
        self.active = true;
        self.duration = duration;
        true
    }

    /// Advance one frame. Expiry starts a `cooldown`-frame recharge.
    pub fn advance(&mut self, cooldown: u32) {
        if self.active {
            self.duration = self.duration.saturating_sub(1);
            if self.duration == 0 {
                self.active = false;
                self.cooldown = cooldown;
            }
        } else {
            self.cooldown = self.cooldown.saturating_sub(1);
        }
    }
}

impl ShieldTimer {
    /// Start (or refresh) the shield
    pub fn activate(&mut self, duration: u32) {
        self.active = duration > 0;
        self.duration = duration;
    }

    /// Advance one frame, returns true on the frame the shield runs out
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.duration = self.duration.saturating_sub(1);
        if self.duration == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

impl DisasterTimer {
    pub fn activate(&mut self, duration: u32) {
        self.active = duration > 0;
        self.duration = duration;
    }

    /// Advance one frame, returns true on the frame the disaster ends
    pub fn advance(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.duration = self.duration.saturating_sub(1);
        if self.duration == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

impl Meteor {
    /// Move a fixed fraction of the remaining distance toward the target
    pub fn home(&mut self, fraction: f32) {
        self.pos += (self.target - self.pos) * fraction;
    }

    pub fn arrived(&self, epsilon: f32) -> bool {
        self.pos.distance(self.target) < epsilon
    }
}

/// Scroll speed implied by the running power-ups.
/// Disaster slow-motion takes precedence over nitro.
pub fn current_speed(state: &GameState) -> f32 {
    let tuning = &state.tuning;
    if state.disaster.active {
        tuning.base_speed * tuning.disaster_slowdown
    } else if state.nitro.active {
        tuning.base_speed * tuning.nitro_multiplier
    } else {
        tuning.base_speed
    }
}

/// Player-requested nitro. Returns true if it engaged.
pub fn trigger_nitro(state: &mut GameState) -> bool {
    if !state.nitro.trigger(state.tuning.nitro_duration) {
        return false;
    }
    log::debug!("Nitro engaged for {} frames", state.nitro.duration);
    state.events.push(GameEvent::NitroEngaged);
    true
}

/// Shield pickup touched; refreshes the timer if already running
pub fn activate_shield(state: &mut GameState) {
    state.shield.activate(state.tuning.shield_duration);
    log::debug!("Shield up for {} frames", state.shield.duration);
    state.events.push(GameEvent::ShieldPickup);
}

/// Disaster pickup touched: every live obstacle becomes a meteor aimed at the
/// obstacle's position (its centre), the obstacle list is emptied and
/// slow-motion begins.
pub fn trigger_disaster(state: &mut GameState) {
    let width = state.playfield.width;
    let obstacles = std::mem::take(&mut state.obstacles);
    let count = obstacles.len();

    for obstacle in obstacles {
        let x = spawn_x(&mut state.rng, METEOR_RADIUS * 2.0, width) + METEOR_RADIUS;
        state.meteors.push(Meteor {
            pos: Vec2::new(x, -METEOR_RADIUS),
            target: obstacle.center(),
            radius: METEOR_RADIUS,
        });
    }

    state.disaster.activate(state.tuning.disaster_duration);
    log::debug!("Disaster! {} obstacles turned into meteors", count);
    state.events.push(GameEvent::DisasterTriggered { meteors: count });
}

/// Count down every power-up timer by one frame
pub fn advance_timers(state: &mut GameState) {
    state.nitro.advance(state.tuning.nitro_cooldown);

    if state.shield.advance() {
        log::debug!("Shield expired");
    }

    if state.disaster.advance() {
        // Meteors still in flight are dropped with the disaster
        log::debug!("Disaster over, clearing {} meteors", state.meteors.len());
        state.meteors.clear();
    }
}

/// Meteor reached its target: blow it up
pub fn meteor_impact(state: &mut GameState, at: Vec2) {
    state.explosion_particles.push(Particle::explosion(at));
    state.shake_frames = state.shake_frames.max(IMPACT_SHAKE_FRAMES);
    state.events.push(GameEvent::MeteorImpact);
}
