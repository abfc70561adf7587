//! Scene drawing
//!
//! Back to front: road, lane markings, pickups, oncoming cars, meteors,
//! smoke, explosions, player, overlays.

use glam::Vec2;

use super::sprites::{OPPONENT_CAR, PLAYER_CAR, draw_car};
use super::surface::*;
use crate::consts::*;
use crate::sim::GameState;

/// Strongest shake displacement in pixels
const MAX_SHAKE: f32 = 6.0;

/// Shield ring around the player
const SHIELD_RING_PAD: f32 = 8.0;
const SHIELD_RING_WIDTH: f32 = 3.0;

/// Camera offset for the current shake frame. Zero when no shake is left.
///
/// Deterministic in `time_ticks` so replays render identically.
pub fn shake_offset(state: &GameState) -> Vec2 {
    if state.shake_frames == 0 {
        return Vec2::ZERO;
    }
    let strength = (state.shake_frames as f32 / CRASH_SHAKE_FRAMES as f32).min(1.0) * MAX_SHAKE;
    let t = state.time_ticks as f32;
    Vec2::new((t * 2.3).sin(), (t * 3.7).cos()) * strength
}

/// Draw one frame of the world
pub fn draw_frame<S: RenderSurface + ?Sized>(state: &GameState, surface: &mut S, screen_shake: bool) {
    let field = state.playfield;
    surface.clear(field.width, field.height);

    surface.save();
    if screen_shake {
        let offset = shake_offset(state);
        if offset != Vec2::ZERO {
            surface.translate(offset.x, offset.y);
        }
    }

    surface.fill_rect(0.0, 0.0, field.width, field.height, ROAD_GRAY);
    for line in &state.road_lines {
        surface.fill_rect(line.x, line.y, ROAD_LINE_WIDTH, ROAD_LINE_LENGTH, WHITE);
    }

    for shield in &state.shields {
        let half = shield.size / 2.0;
        surface.fill_circle(shield.pos + Vec2::splat(half), half, CYAN);
    }
    for disaster in &state.disasters {
        surface.fill_rect(
            disaster.pos.x,
            disaster.pos.y,
            disaster.size,
            disaster.size,
            ORANGE,
        );
    }

    for obstacle in &state.obstacles {
        draw_car(
            surface,
            &OPPONENT_CAR,
            obstacle.pos.x,
            obstacle.pos.y,
            obstacle.rotation,
            obstacle.opacity,
        );
    }

    for meteor in &state.meteors {
        surface.fill_circle(meteor.pos, meteor.radius, FIRE);
        surface.fill_circle(meteor.pos, meteor.radius * 0.5, ORANGE);
    }

    draw_particles(surface, &state.smoke_particles, SMOKE);
    draw_particles(surface, &state.explosion_particles, FIRE);

    let player = &state.player;
    if player.opacity > 0.0 {
        draw_car(
            surface,
            &PLAYER_CAR,
            player.pos.x,
            player.pos.y,
            player.rotation,
            player.opacity,
        );
        if state.shield.active {
            let radius = player.height.max(player.width) / 2.0 + SHIELD_RING_PAD;
            surface.stroke_circle(player.center(), radius, SHIELD_RING_WIDTH, CYAN);
        }
    }

    surface.restore();

    if state.disaster.active {
        surface.fill_text("DISASTER!", field.width / 2.0, 40.0, 28.0, RED);
    }
    if state.game_over {
        surface.fill_text("GAME OVER", field.width / 2.0, field.height / 2.0, 40.0, WHITE);
    }
}

fn draw_particles<S: RenderSurface + ?Sized>(
    surface: &mut S,
    particles: &[crate::sim::Particle],
    color: Color,
) {
    for p in particles {
        let alpha = p.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            continue;
        }
        surface.fill_circle(p.pos, p.radius, [color[0], color[1], color[2], alpha]);
    }
}
