//! Canvas-style rendering
//!
//! The scene is drawn each frame from [`crate::sim::GameState`] through the
//! [`RenderSurface`] capability; the browser implementation lives in
//! `platform`.

pub mod scene;
pub mod sprites;
pub mod surface;

pub use scene::{draw_frame, shake_offset};
pub use surface::{Color, NullSurface, RenderSurface, css_color};
