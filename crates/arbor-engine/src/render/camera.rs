use bytemuck::{Pod, Zeroable};

use crate::coords::{Vec2, Viewport};

use super::TargetOrigin;

/// 2D camera: pan offset + zoom.
///
/// `screen = (world - target) * zoom + offset`
///
/// `offset` is in screen pixels, `target` is the world point that lands on
/// `offset`. Rotation is not supported.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub offset: Vec2,
    pub target: Vec2,
    pub zoom: f32,
}

impl Camera2D {
    pub const fn new(offset: Vec2, target: Vec2, zoom: f32) -> Self {
        Self { offset, target, zoom }
    }

    pub fn with_zoom(zoom: f32) -> Self {
        Self { zoom, ..Self::default() }
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.target) * self.zoom + self.offset
    }

    /// Inverse of [`world_to_screen`](Self::world_to_screen). A zero zoom maps
    /// everything onto `target`.
    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        if self.zoom == 0.0 {
            return self.target;
        }
        (screen - self.offset) / self.zoom + self.target
    }

    /// Uniform block consumed by the line shader.
    pub(crate) fn uniform(&self, viewport: Viewport, origin: TargetOrigin) -> ViewUniform {
        let viewport = viewport.non_degenerate();
        ViewUniform {
            viewport: viewport.size().to_array(),
            offset: self.offset.to_array(),
            target: self.target.to_array(),
            zoom: self.zoom,
            y_sign: origin.ndc_y_sign(),
        }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::zero(), Vec2::zero(), 1.0)
    }
}

/// Mirrors `struct View` in `line.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ViewUniform {
    pub viewport: [f32; 2],
    pub offset: [f32; 2],
    pub target: [f32; 2],
    pub zoom: f32,
    pub y_sign: f32,
}

impl ViewUniform {
    /// NDC position of a world point; the CPU twin of the vertex shader.
    #[cfg(test)]
    pub(crate) fn to_ndc(&self, world: Vec2) -> Vec2 {
        let sx = (world.x - self.target[0]) * self.zoom + self.offset[0];
        let sy = (world.y - self.target[1]) * self.zoom + self.offset[1];
        Vec2::new(
            sx / self.viewport[0] * 2.0 - 1.0,
            self.y_sign * (1.0 - sy / self.viewport[1] * 2.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn half_zoom_puts_tree_root_at_bottom_center() {
        let cam = Camera2D::with_zoom(0.5);
        let screen = cam.world_to_screen(Vec2::new(1280.0, 1440.0));
        assert_eq!(screen, Vec2::new(640.0, 720.0));
    }

    #[test]
    fn offset_pans_in_screen_space() {
        let cam = Camera2D::new(Vec2::new(-10.0, 4.0), Vec2::zero(), 0.5);
        assert_eq!(cam.world_to_screen(Vec2::new(100.0, 100.0)), Vec2::new(40.0, 54.0));
    }

    #[test]
    fn screen_to_world_inverts() {
        let cam = Camera2D::new(Vec2::new(12.0, -3.0), Vec2::new(5.0, 7.0), 1.75);
        let p = Vec2::new(-42.0, 96.5);
        assert!(close(cam.screen_to_world(cam.world_to_screen(p)), p));
    }

    #[test]
    fn ndc_follows_target_origin() {
        let cam = Camera2D::default();
        let vp = Viewport::new(200.0, 100.0);

        let top = cam.uniform(vp, TargetOrigin::TopLeft);
        assert!(close(top.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0)));
        assert!(close(top.to_ndc(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0)));

        // Bottom-left storage puts screen row 0 at NDC y = -1.
        let bottom = cam.uniform(vp, TargetOrigin::BottomLeft);
        assert!(close(bottom.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, -1.0)));
    }

    #[test]
    fn degenerate_viewport_is_raised_to_one_pixel() {
        let u = Camera2D::default().uniform(Viewport::new(0.0, 0.0), TargetOrigin::TopLeft);
        assert_eq!(u.viewport, [1.0, 1.0]);
    }
}
