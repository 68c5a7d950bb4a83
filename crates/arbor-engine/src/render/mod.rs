//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers).
//!
//! Convention:
//! - CPU geometry is in world units; `Camera2D` maps it to logical pixels
//!   (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a view uniform and flip Y for
//!   bottom-left targets.

pub mod camera;
mod ctx;
pub mod offscreen;
pub mod post;
pub mod shapes;

pub use camera::Camera2D;
pub use ctx::{RenderCtx, RenderTarget, TargetOrigin};
pub use offscreen::OffscreenTarget;
pub use post::{PostParams, PostProcess};
pub use shapes::LineRenderer;
