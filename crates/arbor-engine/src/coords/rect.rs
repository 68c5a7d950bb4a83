use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// A negative width or height is meaningful for source rectangles: it mirrors
/// the sampled region along that axis.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Same rectangle with the vertical direction reversed (height negated).
    #[inline]
    pub fn flipped_y(self) -> Self {
        Rect::new(self.origin.x, self.origin.y, self.size.x, -self.size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn flipped_y_negates_height_only() {
        let f = r(0.0, 0.0, 640.0, 360.0).flipped_y();
        assert_eq!(f, r(0.0, 0.0, 640.0, -360.0));
        assert_eq!(f.flipped_y(), r(0.0, 0.0, 640.0, 360.0));
        assert!(!f.is_empty());
    }

    #[test]
    fn zero_extent_is_empty() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
    }
}
