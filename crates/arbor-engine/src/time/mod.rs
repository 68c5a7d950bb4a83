//! Time subsystem.
//!
//! Frame timing utilities that do not depend on the runtime:
//! - `FrameClock`: call `tick()` once per presented frame to obtain `FrameTime`
//! - `FrameLimiter`: decides when the next frame may start for a target FPS

mod frame_clock;
mod frame_limiter;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_limiter::FrameLimiter;
