//! Fractal tree studio.
//!
//! A recursively generated tree is drawn into an off-screen target through a
//! panning 2D camera, then composited to the window with a bloom shader.
//! WASD pans the camera, Up/Down change the branch angle, X toggles the world
//! axes, Escape closes the window.

pub mod app;
pub mod config;
pub mod controls;
pub mod lifecycle;
pub mod pipeline;
pub mod scene;
pub mod state;

pub use app::Studio;
pub use config::StudioConfig;
pub use controls::{poll_input, Controls, KeyBindings, PanMode};
pub use state::GameState;
