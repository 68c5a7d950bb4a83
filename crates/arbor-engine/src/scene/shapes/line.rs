use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Thick line segment payload, in world space (before the camera).
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    pub color: Color,
}

impl LineCmd {
    #[inline]
    pub fn new(start: Vec2, end: Vec2, thickness: f32, color: Color) -> Self {
        Self { start, end, thickness, color }
    }

    /// Zero-length or zero-width lines cover no pixels.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.thickness <= 0.0 || (self.end - self.start).length() <= f32::EPSILON
    }
}

impl DrawList {
    /// Records a line draw command.
    #[inline]
    pub fn push_line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Color) {
        self.push(DrawCmd::Line(LineCmd::new(start, end, thickness, color)));
    }

    /// Iterates recorded lines in submission order.
    pub fn lines(&self) -> impl Iterator<Item = &LineCmd> {
        self.items().iter().map(|cmd| match cmd {
            DrawCmd::Line(line) => line,
        })
    }
}
