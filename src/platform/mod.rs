//! Browser implementations of the host capabilities
//!
//! - `canvas`: [`crate::renderer::RenderSurface`] over a Canvas 2D context
//! - `storage`: [`crate::highscores::HighScoreStore`] over LocalStorage
//!
//! Native builds use the in-memory and null implementations instead.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageHighScore;
