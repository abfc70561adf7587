//! Collision detection for axis-aligned boxes and circles
//!
//! Cars and pickups collide as rectangles; meteors are circles tested against
//! the player's rectangle. Touching edges never count as contact.

use glam::Vec2;

use super::state::Playfield;
use crate::consts::CULL_MARGIN;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: each box's min edge must be below the other's max edge on both axes
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Closest point inside the box to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }
}

/// Circle vs box overlap (strict, a tangent circle does not collide)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.clamp_point(center);
    center.distance_squared(closest) < radius * radius
}

/// True once an entity whose top edge is at `top` has left through the bottom
#[inline]
pub fn is_off_screen(top: f32, playfield: &Playfield) -> bool {
    top > playfield.height + CULL_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Overlaps horizontally, far away vertically
        let b = Rect::new(2.0, 50.0, 4.0, 4.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_contained_box_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_circle_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Centre inside
        assert!(circle_rect_overlap(Vec2::new(5.0, 5.0), 1.0, &rect));
        // Near a corner but outside the radius
        assert!(!circle_rect_overlap(Vec2::new(14.0, 14.0), 5.0, &rect));
        // Tangent to the right edge
        assert!(!circle_rect_overlap(Vec2::new(15.0, 5.0), 5.0, &rect));
        // Slightly inside the right edge
        assert!(circle_rect_overlap(Vec2::new(14.9, 5.0), 5.0, &rect));
    }

    #[test]
    fn test_off_screen() {
        let playfield = Playfield {
            width: 400.0,
            height: 700.0,
        };
        assert!(!is_off_screen(700.0, &playfield));
        assert!(!is_off_screen(700.0 + CULL_MARGIN, &playfield));
        assert!(is_off_screen(700.0 + CULL_MARGIN + 0.5, &playfield));
    }
}
