//! Arbor engine crate.
//!
//! Owns the platform + GPU runtime pieces the studio builds on: a single
//! frame-paced window, keyboard state, frame timing, a 2D camera and the
//! line / off-screen / post-process renderers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
