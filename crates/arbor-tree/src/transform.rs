use glam::{Affine2, Vec2};

/// 2D affine transform stack.
///
/// `current` maps local coordinates to the space the stack was created in.
/// `translate` / `rotate_degrees` compose in local space, the same way an
/// immediate-mode matrix stack does: the last operation applied is the first
/// one a point goes through.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Affine2,
    saved: Vec<Affine2>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            current: Affine2::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Starts from an arbitrary base transform.
    pub fn with_base(base: Affine2) -> Self {
        Self {
            current: base,
            saved: Vec::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> Affine2 {
        self.current
    }

    /// Number of saved transforms.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Saves the current transform.
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recently saved transform.
    ///
    /// Returns `false` (and leaves the transform untouched) when nothing was saved.
    pub fn pop(&mut self) -> bool {
        debug_assert!(!self.saved.is_empty(), "TransformStack::pop without matching push");
        match self.saved.pop() {
            Some(t) => {
                self.current = t;
                true
            }
            None => false,
        }
    }

    /// Runs `f` with the current transform saved, restoring it afterwards.
    pub fn with_saved<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push();
        let out = f(self);
        self.pop();
        out
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current = self.current * Affine2::from_translation(offset);
    }

    /// Rotates local axes by `degrees`. Positive turns +X towards +Y
    /// (clockwise on a y-down screen).
    pub fn rotate_degrees(&mut self, degrees: f32) {
        self.current = self.current * Affine2::from_angle(degrees.to_radians());
    }

    /// Maps a local point through the current transform.
    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.current.transform_point2(local)
    }

    /// Maps a local direction (ignores translation).
    #[inline]
    pub fn transform_vector(&self, local: Vec2) -> Vec2 {
        self.current.transform_vector2(local)
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn translate_moves_origin() {
        let mut s = TransformStack::new();
        s.translate(Vec2::new(10.0, 20.0));
        assert!(close(s.transform_point(Vec2::ZERO), Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn rotation_applies_in_local_space() {
        let mut s = TransformStack::new();
        s.translate(Vec2::new(100.0, 0.0));
        s.rotate_degrees(90.0);
        // Local +X now points along world +Y, starting from the translated origin.
        assert!(close(s.transform_point(Vec2::new(5.0, 0.0)), Vec2::new(100.0, 5.0)));
    }

    #[test]
    fn pop_restores_saved_transform() {
        let mut s = TransformStack::new();
        s.translate(Vec2::new(1.0, 1.0));
        s.push();
        s.rotate_degrees(45.0);
        s.translate(Vec2::new(3.0, 0.0));
        assert_eq!(s.depth(), 1);
        assert!(s.pop());
        assert_eq!(s.depth(), 0);
        assert!(close(s.transform_point(Vec2::ZERO), Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn with_saved_isolates_siblings() {
        let mut s = TransformStack::new();
        let a = s.with_saved(|s| {
            s.rotate_degrees(30.0);
            s.transform_vector(Vec2::NEG_Y)
        });
        let b = s.with_saved(|s| {
            s.rotate_degrees(-30.0);
            s.transform_vector(Vec2::NEG_Y)
        });
        // Second sibling starts from the untouched parent, so the two mirror about -Y.
        assert!((a.x + b.x).abs() < 1e-5);
        assert!((a.y - b.y).abs() < 1e-5);
        assert_eq!(s.depth(), 0);
        assert_eq!(s.current(), Affine2::IDENTITY);
    }

    #[test]
    fn with_base_starts_from_given_transform() {
        let s = TransformStack::with_base(Affine2::from_translation(Vec2::new(-4.0, 2.0)));
        assert!(close(s.transform_point(Vec2::ZERO), Vec2::new(-4.0, 2.0)));
    }
}
