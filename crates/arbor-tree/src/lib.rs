//! Fractal tree geometry.
//!
//! The generator walks a binary branching tree and hands every branch to a
//! [`SegmentSink`]. Placement is driven by an explicit [`TransformStack`], so
//! callers decide where the root sits and which way is "up".
//!
//! Space convention matches the engine: logical pixels, +X right, +Y down.
//! A tree therefore grows along `-Y`.

mod generator;
mod shape;
mod transform;

pub use generator::{collect, grow, Segment, SegmentSink};
pub use shape::TreeShape;
pub use transform::TransformStack;

pub use glam::Vec2;
