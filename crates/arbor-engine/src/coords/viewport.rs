use super::Vec2;

/// Viewport size in logical pixels.
///
/// Renderers treat this as the coordinate basis for converting logical px
/// positions to NDC in shaders.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Size with each side raised to at least one pixel, safe to divide by.
    #[inline]
    pub fn non_degenerate(self) -> Self {
        Self::new(self.width.max(1.0), self.height.max(1.0))
    }
}
