//! Pixel-art car sprites
//!
//! Each sprite is a grid of palette keys; one key is one square cell. The
//! grids are sized so a drawn car exactly covers its collision box.

use super::surface::{Color, RenderSurface};
use crate::consts::{CAR_HEIGHT, CAR_WIDTH};

const ROWS: usize = 10;
const COLS: usize = 8;
/// Cell edge in pixels
pub const CELL: f32 = CAR_WIDTH / COLS as f32;

pub type Sprite = [[u8; COLS]; ROWS];

/// Player car, nose up
pub const PLAYER_CAR: Sprite = [
    *b"..DDDD..",
    *b".DLLLLD.",
    *b"DLGGGGLD",
    *b"DLWWWWLD",
    *b"DGGGGGGD",
    *b"DGGGGGGD",
    *b"DLGGGGLD",
    *b"DLWWWWLD",
    *b".DLLLLD.",
    *b"..DRRD..",
];

/// Oncoming car, nose down
pub const OPPONENT_CAR: Sprite = [
    *b"..DYYD..",
    *b".RRRRRR.",
    *b"ROWWWWOR",
    *b"ROBBBBOR",
    *b"RRBBBBRR",
    *b"RRBBBBRR",
    *b"ROBBBBOR",
    *b"ROWWWWOR",
    *b".ROOOOR.",
    *b"..RRRR..",
];

/// Palette; `.` is transparent
fn palette(key: u8) -> Option<Color> {
    match key {
        b'D' => Some([0.27, 0.27, 0.27, 1.0]),
        b'L' => Some([0.8, 0.8, 0.8, 1.0]),
        b'G' => Some([0.0, 1.0, 0.0, 1.0]),
        b'W' => Some([0.55, 0.85, 1.0, 1.0]),
        b'R' => Some([1.0, 0.0, 0.0, 1.0]),
        b'O' => Some([1.0, 0.67, 0.0, 1.0]),
        b'B' => Some([0.0, 0.0, 1.0, 1.0]),
        b'Y' => Some([1.0, 1.0, 0.4, 1.0]),
        _ => None,
    }
}

/// Draw a car with its top-left at `(x, y)`, rotated about its centre
pub fn draw_car<S: RenderSurface + ?Sized>(
    surface: &mut S,
    sprite: &Sprite,
    x: f32,
    y: f32,
    rotation: f32,
    opacity: f32,
) {
    let half_w = CAR_WIDTH / 2.0;
    let half_h = CAR_HEIGHT / 2.0;

    surface.save();
    surface.set_global_alpha(opacity.clamp(0.0, 1.0));
    surface.translate(x + half_w, y + half_h);
    if rotation != 0.0 {
        surface.rotate(rotation);
    }

    for (row, cells) in sprite.iter().enumerate() {
        for (col, &key) in cells.iter().enumerate() {
            if let Some(color) = palette(key) {
                surface.fill_rect(
                    col as f32 * CELL - half_w,
                    row as f32 * CELL - half_h,
                    CELL,
                    CELL,
                    color,
                );
            }
        }
    }

    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_covers_collision_box() {
        assert_eq!(CELL * COLS as f32, CAR_WIDTH);
        assert_eq!(CELL * ROWS as f32, CAR_HEIGHT);
    }

    #[test]
    fn test_palette_keys_are_known() {
        for sprite in [&PLAYER_CAR, &OPPONENT_CAR] {
            for &key in sprite.iter().flatten() {
                assert!(key == b'.' || palette(key).is_some(), "unknown key {}", key as char);
            }
        }
    }
}
