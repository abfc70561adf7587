//! Per-frame simulation tick
//!
//! Core game loop that advances the world by one animation frame. The host
//! keeps calling [`tick`] until it returns [`TickOutcome::Stop`].

use glam::Vec2;

use super::collision::{Rect, circle_rect_overlap, is_off_screen};
use super::powerup;
use super::spawn;
use super::state::{GameEvent, GameState, Particle};
use crate::consts::{CAR_WIDTH, CRASH_SHAKE_FRAMES, ROAD_LINE_LENGTH};
use crate::lerp;

/// How far ahead of the player the autopilot looks for traffic
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;
/// Horizontal clearance the autopilot keeps from traffic
const AUTOPILOT_CLEARANCE: f32 = 8.0;
/// Obstacle spin per game-over frame (radians)
const CRASH_SPIN: f32 = 0.04;

/// Player intent for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute x for the car's centre (touch/pointer)
    pub steer_to: Option<f32>,
    /// Relative horizontal nudge (keyboard)
    pub steer_by: f32,
    /// Fire nitro (space / nitro button)
    pub nitro: bool,
    /// Idle/demo mode - autopilot steers the car
    pub idle_mode: bool,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Game-over fade finished, a restart is available
    Stop,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.game_over {
        return fade_out(state);
    }

    state.time_ticks += 1;
    state.shake_frames = state.shake_frames.saturating_sub(1);

    // Player intent
    let mut input = input.clone();
    if input.idle_mode {
        input.steer_to = autopilot_target(state);
    }
    apply_input(state, &input);

    // Speed from the power-ups running at the start of the frame
    state.game_speed = powerup::current_speed(state);
    state.background_speed = state.game_speed;
    powerup::advance_timers(state);

    // Move, collide, resolve
    scroll_road(state);
    if advance_obstacles(state) || advance_meteors(state) {
        crash(state);
        return TickOutcome::Continue;
    }
    advance_pickups(state);

    spawn::run(state);

    if state.nitro.active {
        emit_smoke(state);
    }
    advance_particles(state);

    update_tilt(state);

    if state.score > state.high_score {
        state.high_score = state.score;
    }

    TickOutcome::Continue
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    let playfield = state.playfield;
    if let Some(center_x) = input.steer_to {
        let half = state.player.width / 2.0;
        state.player.steer_to(center_x - half, &playfield);
    }
    if input.steer_by != 0.0 {
        let x = state.player.pos.x + input.steer_by;
        state.player.steer_to(x, &playfield);
    }
    if input.nitro {
        powerup::trigger_nitro(state);
    }
}

/// Scroll lane markings, wrapping them back above the top edge
fn scroll_road(state: &mut GameState) {
    let height = state.playfield.height;
    for line in &mut state.road_lines {
        line.y += state.background_speed;
        if line.y > height {
            line.y = -ROAD_LINE_LENGTH;
        }
    }
}

/// Move obstacles, score overtakes and test them against the player.
/// Returns true on an unshielded hit.
fn advance_obstacles(state: &mut GameState) -> bool {
    let speed = state.game_speed;
    let playfield = state.playfield;
    let player = state.player.rect();
    let shielded = state.shield.active;

    let mut crashed = false;
    let mut absorbed = Vec::new();
    let mut overtaken = 0u32;

    state.obstacles.retain_mut(|obstacle| {
        if crashed {
            return true;
        }
        obstacle.pos.y += speed;

        if obstacle.rect().overlaps(&player) {
            if shielded {
                absorbed.push(obstacle.center());
                return false;
            }
            crashed = true;
            return true;
        }

        if !obstacle.passed && obstacle.pos.y > player.bottom() {
            obstacle.passed = true;
            overtaken += 1;
        }

        !is_off_screen(obstacle.pos.y, &playfield)
    });

    for at in absorbed {
        shield_absorb(state, at);
    }
    for _ in 0..overtaken {
        state.score = state.score.saturating_add(1);
        state.events.push(GameEvent::Overtake);
    }

    crashed
}

/// Home meteors toward their targets and test them against the player.
/// Returns true on an unshielded hit.
fn advance_meteors(state: &mut GameState) -> bool {
    let homing = state.tuning.meteor_homing;
    let epsilon = state.tuning.meteor_arrival_epsilon;
    let player = state.player.rect();
    let shielded = state.shield.active;

    let mut crashed = false;
    let mut impacts = Vec::new();
    let mut absorbed = Vec::new();

    state.meteors.retain_mut(|meteor| {
        if crashed {
            return true;
        }
        meteor.home(homing);

        if circle_rect_overlap(meteor.pos, meteor.radius, &player) {
            if shielded {
                absorbed.push(meteor.pos);
                return false;
            }
            crashed = true;
            return true;
        }

        if meteor.arrived(epsilon) {
            impacts.push(meteor.target);
            return false;
        }
        true
    });

    for at in impacts {
        powerup::meteor_impact(state, at);
    }
    for at in absorbed {
        shield_absorb(state, at);
    }

    crashed
}

/// Move shield and disaster pickups and collect any the player touches
fn advance_pickups(state: &mut GameState) {
    let speed = state.game_speed;
    let playfield = state.playfield;
    let player = state.player.rect();

    let mut shield_hit = false;
    state.shields.retain_mut(|shield| {
        shield.pos.y += speed;
        if shield.rect().overlaps(&player) {
            shield_hit = true;
            return false;
        }
        !is_off_screen(shield.pos.y, &playfield)
    });

    let mut disaster_hit = false;
    state.disasters.retain_mut(|disaster| {
        disaster.pos.y += speed;
        if disaster.rect().overlaps(&player) {
            disaster_hit = true;
            return false;
        }
        !is_off_screen(disaster.pos.y, &playfield)
    });

    if shield_hit {
        powerup::activate_shield(state);
    }
    if disaster_hit {
        powerup::trigger_disaster(state);
    }
}

fn shield_absorb(state: &mut GameState, at: Vec2) {
    state.explosion_particles.push(Particle::explosion(at));
    state.events.push(GameEvent::ShieldAbsorb);
}

/// Unshielded collision: freeze the world and start the fade-out
fn crash(state: &mut GameState) {
    let site = state.player.center();
    state.game_over = true;
    state.crash_site = Some(site);
    state.explosion_particles.push(Particle::explosion(site));
    state.shake_frames = CRASH_SHAKE_FRAMES;
    state.events.push(GameEvent::Crash);
    log::info!(
        "Crashed after {} ticks with score {}",
        state.time_ticks,
        state.score
    );
}

/// Game-over frames: fade the cars, let the road coast to a stop
fn fade_out(state: &mut GameState) -> TickOutcome {
    let fade = if state.tuning.crash_fade > 0.0 {
        state.tuning.crash_fade
    } else {
        1.0
    };

    state.player.opacity = (state.player.opacity - fade).max(0.0);
    let site_x = state.crash_site.map_or(state.player.center().x, |site| site.x);
    for obstacle in &mut state.obstacles {
        obstacle.opacity = (obstacle.opacity - fade).max(0.0);
        // Wrecks spin away from the crash
        if obstacle.center().x < site_x {
            obstacle.rotation -= CRASH_SPIN;
        } else {
            obstacle.rotation += CRASH_SPIN;
        }
    }
    state.background_speed *= state.tuning.background_decay;
    state.shake_frames = state.shake_frames.saturating_sub(1);

    scroll_road(state);
    advance_particles(state);

    if state.player.opacity <= 0.0 {
        TickOutcome::Stop
    } else {
        TickOutcome::Continue
    }
}

/// Exhaust puff behind the car while nitro burns
fn emit_smoke(state: &mut GameState) {
    let player = &state.player;
    let drift = (state.time_ticks % 5) as f32 * 0.2 - 0.4;
    state.smoke_particles.push(Particle {
        pos: Vec2::new(player.pos.x + player.width / 2.0, player.pos.y + player.height),
        vel: Vec2::new(drift, state.game_speed * 0.5),
        radius: 6.0,
        alpha: 0.8,
        fade: 0.03,
    });
}

fn advance_particles(state: &mut GameState) {
    for particles in [&mut state.smoke_particles, &mut state.explosion_particles] {
        for particle in particles.iter_mut() {
            particle.pos += particle.vel;
            particle.alpha -= particle.fade;
        }
        particles.retain(|p| p.alpha > 0.0);
    }
}

/// Tilt the car toward the side it is steering to
fn update_tilt(state: &mut GameState) {
    let half_width = state.playfield.width / 2.0;
    let max_tilt = state.tuning.max_tilt;
    let offset = if half_width > 0.0 {
        (state.player.center().x - half_width) / half_width
    } else {
        0.0
    };
    let target = (offset * max_tilt).clamp(-max_tilt, max_tilt);
    state.player.rotation = lerp(state.player.rotation, target, state.tuning.tilt_lerp);
}

/// Pick a centre x with no traffic ahead, preferring the closest one
fn autopilot_target(state: &GameState) -> Option<f32> {
    let player = state.player.rect();
    let horizon = player.y - AUTOPILOT_LOOKAHEAD;

    let mut threats: Vec<Rect> = state
        .obstacles
        .iter()
        .map(|o| o.rect())
        .filter(|r| r.bottom() > horizon && r.y < player.bottom())
        .collect();
    threats.extend(state.meteors.iter().map(|m| {
        Rect::new(
            m.target.x - m.radius,
            m.target.y - m.radius,
            m.radius * 2.0,
            m.radius * 2.0,
        )
    }));

    let blocked = |left: f32| {
        let right = left + player.width;
        threats.iter().any(|t| {
            left < t.right() + AUTOPILOT_CLEARANCE && t.x - AUTOPILOT_CLEARANCE < right
        })
    };

    if !blocked(player.x) {
        return None;
    }

    let max_x = (state.playfield.width - player.width).max(0.0);
    let step = CAR_WIDTH / 6.0;
    let steps = (max_x / step).floor() as usize;
    (0..=steps)
        .map(|i| (i as f32 * step).min(max_x))
        .filter(|&x| !blocked(x))
        .min_by(|a, b| {
            (a - player.x)
                .abs()
                .partial_cmp(&(b - player.x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|x| x + player.width / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Disaster, Meteor, Obstacle, Playfield, Shield};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// State whose spawner only force-spawns (no random obstacles or pickups)
    fn quiet_state() -> GameState {
        GameState::new(
            5,
            Playfield::default(),
            Tuning {
                obstacle_spawn_rate: 0.0,
                shield_spawn_rate: 0.0,
                disaster_spawn_rate: 0.0,
                ..Tuning::default()
            },
        )
    }

    /// Obstacle in the far-left column, clear of the centred player
    fn side_obstacle(y: f32) -> Obstacle {
        Obstacle::new(Vec2::new(0.0, y))
    }

    /// Obstacle directly on top of the player
    fn head_on(state: &GameState) -> Obstacle {
        Obstacle::new(state.player.pos)
    }

    #[test]
    fn test_entities_scroll_by_sum_of_speeds() {
        let mut state = quiet_state();
        state.obstacles.push(side_obstacle(0.0));
        state.shields.push(Shield::new(Vec2::new(350.0, 0.0)));

        let mut expected = 0.0;
        for frame in 0..20 {
            let input = TickInput {
                nitro: frame == 5,
                ..Default::default()
            };
            assert_eq!(tick(&mut state, &input), TickOutcome::Continue);
            expected += state.game_speed;
        }

        assert!(state.nitro.active);
        assert!((state.obstacles[0].pos.y - expected).abs() < 1e-3);
        assert!((state.shields[0].pos.y - expected).abs() < 1e-3);
        // 5 frames at base speed, 15 boosted
        assert!((expected - (5.0 * 3.0 + 15.0 * 7.5)).abs() < 1e-3);
    }

    #[test]
    fn test_overtake_scores_exactly_once() {
        let mut state = quiet_state();
        let bottom = state.player.rect().bottom();
        state.obstacles.push(side_obstacle(bottom - 1.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].passed);
        assert_eq!(state.drain_events(), vec![GameEvent::Overtake]);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 1);
    }

    #[test]
    fn test_offscreen_obstacles_are_culled() {
        let mut state = quiet_state();
        let height = state.playfield.height;
        state.obstacles.push(side_obstacle(height + 9.0));
        state.shields.push(Shield::new(Vec2::new(350.0, height + 9.0)));
        state.disasters.push(Disaster::new(Vec2::new(300.0, height + 9.0)));

        tick(&mut state, &TickInput::default());

        assert!(state.shields.is_empty());
        assert!(state.disasters.is_empty());
        // The culled obstacle was scored, and a fresh one was force-spawned
        assert_eq!(state.score, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.obstacles[0].pos.y < 0.0);
    }

    #[test]
    fn test_unshielded_collision_is_game_over() {
        let mut state = quiet_state();
        let obstacle = head_on(&state);
        state.obstacles.push(obstacle);

        assert_eq!(tick(&mut state, &TickInput::default()), TickOutcome::Continue);
        assert!(state.game_over);
        assert_eq!(state.crash_site, Some(state.player.center()));
        assert!(state.drain_events().contains(&GameEvent::Crash));
    }

    #[test]
    fn test_shield_absorbs_obstacle() {
        let mut state = quiet_state();
        state.shield.activate(state.tuning.shield_duration);
        let obstacle = head_on(&state);
        state.obstacles.push(obstacle);

        tick(&mut state, &TickInput::default());

        assert!(!state.game_over);
        assert!(state.obstacles.iter().all(|o| o.pos.y < 0.0));
        assert_eq!(state.explosion_particles.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::ShieldAbsorb));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_meteor_hit_without_shield_is_game_over() {
        let mut state = quiet_state();
        let center = state.player.center();
        state.meteors.push(Meteor {
            pos: center,
            target: center + Vec2::new(0.0, 200.0),
            radius: 20.0,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.game_over);
    }

    #[test]
    fn test_shield_absorbs_meteor() {
        let mut state = quiet_state();
        state.shield.activate(state.tuning.shield_duration);
        let center = state.player.center();
        state.meteors.push(Meteor {
            pos: center,
            target: center + Vec2::new(0.0, 200.0),
            radius: 20.0,
        });
        tick(&mut state, &TickInput::default());
        assert!(!state.game_over);
        assert!(state.meteors.is_empty());
    }

    #[test]
    fn test_meteor_explodes_at_target() {
        let mut state = quiet_state();
        let target = Vec2::new(30.0, 100.0);
        state.meteors.push(Meteor {
            pos: target + Vec2::new(1.0, 0.0),
            target,
            radius: 20.0,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.meteors.is_empty());
        assert_eq!(state.explosion_particles.len(), 1);
        assert!(state.shake_frames > 0);
        assert!(state.drain_events().contains(&GameEvent::MeteorImpact));
    }

    #[test]
    fn test_shield_pickup_activates_shield() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        state.shields.push(Shield::new(pos));
        tick(&mut state, &TickInput::default());
        assert!(state.shields.is_empty());
        assert!(state.shield.active);
        assert_eq!(state.shield.duration, state.tuning.shield_duration);
        assert!(state.drain_events().contains(&GameEvent::ShieldPickup));
    }

    #[test]
    fn test_disaster_pickup_converts_obstacles_and_slows() {
        let mut state = quiet_state();
        state.obstacles.push(side_obstacle(100.0));
        state.obstacles.push(Obstacle::new(Vec2::new(320.0, 50.0)));
        let pos = state.player.pos;
        state.disasters.push(Disaster::new(pos));

        tick(&mut state, &TickInput::default());

        assert!(state.disaster.active);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.meteors.len(), 2);

        tick(&mut state, &TickInput::default());
        assert!((state.game_speed - 1.2).abs() < 1e-6);
        // No obstacles while the disaster runs
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_disaster_overrides_nitro_in_tick() {
        let mut state = quiet_state();
        tick(
            &mut state,
            &TickInput {
                nitro: true,
                ..Default::default()
            },
        );
        assert_eq!(state.game_speed, 7.5);
        state.disaster.activate(10);
        tick(&mut state, &TickInput::default());
        assert!(state.nitro.active);
        assert!((state.game_speed - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_nitro_cannot_retrigger_during_cooldown() {
        let mut state = quiet_state();
        state.tuning.nitro_duration = 3;
        state.tuning.nitro_cooldown = 4;
        let press = TickInput {
            nitro: true,
            ..Default::default()
        };

        tick(&mut state, &press);
        assert_eq!(state.drain_events(), vec![GameEvent::NitroEngaged]);
        for _ in 0..2 {
            tick(&mut state, &press);
        }
        assert!(!state.nitro.active);
        assert_eq!(state.nitro.cooldown, 4);

        for _ in 0..4 {
            tick(&mut state, &press);
            assert!(!state.drain_events().contains(&GameEvent::NitroEngaged));
        }
        assert_eq!(state.nitro.cooldown, 0);

        tick(&mut state, &press);
        assert!(state.nitro.active);
        assert_eq!(state.nitro.duration, 2);
    }

    #[test]
    fn test_nitro_emits_smoke() {
        let mut state = quiet_state();
        tick(
            &mut state,
            &TickInput {
                nitro: true,
                ..Default::default()
            },
        );
        assert_eq!(state.smoke_particles.len(), 1);
        assert!(state.smoke_particles[0].alpha < 0.8);
    }

    #[test]
    fn test_steering_is_clamped() {
        let mut state = quiet_state();
        tick(
            &mut state,
            &TickInput {
                steer_to: Some(-500.0),
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, 0.0);

        tick(
            &mut state,
            &TickInput {
                steer_by: 10_000.0,
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, state.playfield.width - state.player.width);

        tick(
            &mut state,
            &TickInput {
                steer_by: f32::NEG_INFINITY,
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, 0.0);

        tick(
            &mut state,
            &TickInput {
                steer_to: Some(f32::INFINITY),
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos.x, state.playfield.width - state.player.width);
    }

    #[test]
    fn test_tilt_eases_toward_clamped_target() {
        let mut state = quiet_state();
        let right = TickInput {
            steer_to: Some(state.playfield.width),
            ..Default::default()
        };
        tick(&mut state, &right);
        let first = state.player.rotation;
        assert!(first > 0.0);
        assert!(first < state.tuning.max_tilt);

        for _ in 0..200 {
            tick(&mut state, &right);
        }
        assert!(state.player.rotation <= state.tuning.max_tilt + 1e-6);
        assert!(state.player.rotation > first);
    }

    #[test]
    fn test_game_over_fades_then_stops() {
        let mut state = quiet_state();
        let obstacle = head_on(&state);
        state.obstacles.push(obstacle);
        tick(&mut state, &TickInput::default());
        assert!(state.game_over);

        let frozen_y = state.obstacles[0].pos.y;
        let speed_at_crash = state.background_speed;
        let mut frames = 0;
        while tick(&mut state, &TickInput::default()) == TickOutcome::Continue {
            frames += 1;
            assert!(frames < 100, "fade never finished");
        }

        // 1.0 opacity at 0.02 per frame
        assert!((49..=50).contains(&frames));
        assert_eq!(state.player.opacity, 0.0);
        assert_eq!(state.obstacles[0].pos.y, frozen_y);
        assert!(state.background_speed < speed_at_crash * 0.1);
        assert_eq!(tick(&mut state, &TickInput::default()), TickOutcome::Stop);
    }

    #[test]
    fn test_wrecks_spin_away_from_crash() {
        let mut state = quiet_state();
        let obstacle = head_on(&state);
        state.obstacles.push(obstacle);
        state.obstacles.push(side_obstacle(0.0));
        tick(&mut state, &TickInput::default());
        assert!(state.game_over);
        assert_eq!(state.obstacles[1].rotation, 0.0);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.obstacles[0].rotation > 0.0);
        assert!(state.obstacles[1].rotation < 0.0);
    }

    #[test]
    fn test_road_lines_wrap() {
        let mut state = quiet_state();
        let height = state.playfield.height;
        state.road_lines[0].y = height - 1.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.road_lines[0].y, -ROAD_LINE_LENGTH);
    }

    #[test]
    fn test_autopilot_dodges_traffic_ahead() {
        let mut state = quiet_state();
        let ahead = Obstacle::new(state.player.pos - Vec2::new(0.0, 150.0));
        state.obstacles.push(ahead);
        let target = autopilot_target(&state).expect("should steer away");
        let left = target - state.player.width / 2.0;
        let blocker = state.obstacles[0].rect();
        assert!(left + state.player.width <= blocker.x || left >= blocker.right());
    }

    #[test]
    fn test_autopilot_holds_lane_when_clear() {
        let mut state = quiet_state();
        state.obstacles.push(side_obstacle(0.0));
        assert_eq!(autopilot_target(&state), None);
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            moves in proptest::collection::vec((0.0f32..400.0, any::<bool>()), 1..300),
        ) {
            let mut state = GameState::new(seed, Playfield::default(), Tuning::default());
            let mut last = 0;
            for (x, nitro) in moves {
                let input = TickInput { steer_to: Some(x), nitro, ..Default::default() };
                if tick(&mut state, &input) == TickOutcome::Stop {
                    break;
                }
                prop_assert!(state.score >= last);
                prop_assert!(state.high_score >= state.score);
                prop_assert!(state.obstacles.len() <= 5);
                prop_assert!(state.shields.len() + state.disasters.len() <= 1);
                last = state.score;
            }
        }
    }
}
