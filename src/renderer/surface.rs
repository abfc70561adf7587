//! Render surface capability
//!
//! The scene is drawn through a small immediate-mode API that a Canvas 2D
//! context maps onto one-to-one. The game never reads pixels back.

use glam::Vec2;

/// RGBA, each channel 0-1
pub type Color = [f32; 4];

pub const ROAD_GRAY: Color = [0.2, 0.2, 0.22, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
pub const ORANGE: Color = [1.0, 0.65, 0.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
pub const SMOKE: Color = [0.6, 0.6, 0.6, 1.0];
pub const FIRE: Color = [1.0, 0.4, 0.0, 1.0];

/// Drawing primitives the scene needs
pub trait RenderSurface {
    /// Wipe the whole surface
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color);
    /// Text centred on `(x, y)`
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    /// Push transform and alpha
    fn save(&mut self);
    /// Pop transform and alpha
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    fn set_global_alpha(&mut self, alpha: f32);
}

/// Surface that draws nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn clear(&mut self, _width: f32, _height: f32) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32, _color: Color) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _line_width: f32, _color: Color) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32, _size: f32, _color: Color) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn rotate(&mut self, _radians: f32) {}
    fn set_global_alpha(&mut self, _alpha: f32) {}
}

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(RED), "rgba(255,0,0,1)");
        assert_eq!(css_color([0.0, 0.5, 2.0, 0.5]), "rgba(0,128,255,0.5)");
    }
}
