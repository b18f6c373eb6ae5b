//! Rendering module
//!
//! The simulation is captured into a [`SceneView`] each frame; on the web the
//! [`CanvasPainter`] draws it with the Canvas 2D API.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use scene::SceneView;
