//! Turns game state into a world-space draw list.

use arbor_engine::coords::Vec2 as WorldVec;
use arbor_engine::paint::Color;
use arbor_engine::scene::DrawList;
use arbor_tree::{grow, Segment, SegmentSink, TransformStack, TreeShape, Vec2};

use crate::state::GameState;

const AXIS_LENGTH: f32 = 500.0;
const AXIS_THICKNESS: f32 = 8.0;

/// Bark at the trunk, leaf green at the tips.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub trunk: Color,
    pub tip: Color,
    pub axes: Color,
}

impl Palette {
    /// Color for a segment at `depth` in a tree `levels` deep.
    pub fn branch(&self, depth: u32, levels: u32) -> Color {
        if levels <= 1 || depth == 0 {
            return self.trunk;
        }
        if depth + 1 >= levels {
            return self.tip;
        }
        let t = depth as f32 / (levels - 1) as f32;
        self.trunk.lerp(self.tip, t)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            trunk: Color::from_srgb_u8(127, 106, 79, 255),
            tip: Color::from_srgb_u8(0, 158, 47, 255),
            axes: Color::from_srgb_u8(230, 41, 55, 255),
        }
    }
}

/// `SegmentSink` that records segments as line commands.
struct TreePainter<'a> {
    list: &'a mut DrawList,
    palette: &'a Palette,
    levels: u32,
}

impl SegmentSink for TreePainter<'_> {
    fn segment(&mut self, segment: Segment) {
        self.list.push_line(
            world(segment.start),
            world(segment.end),
            segment.thickness,
            self.palette.branch(segment.depth, self.levels),
        );
    }
}

#[inline]
fn world(v: Vec2) -> WorldVec {
    WorldVec::new(v.x, v.y)
}

/// Rebuilds `list` with this frame's tree. Returns the number of lines recorded.
pub fn build_tree_scene(
    list: &mut DrawList,
    state: &GameState,
    shape: &TreeShape,
    palette: &Palette,
) -> usize {
    list.clear();

    if state.show_axes {
        let origin = WorldVec::zero();
        list.push_line(origin, WorldVec::new(AXIS_LENGTH, 0.0), AXIS_THICKNESS, palette.axes);
        list.push_line(origin, WorldVec::new(0.0, AXIS_LENGTH), AXIS_THICKNESS, palette.axes);
    }

    let length = state.length();
    let mut painter = TreePainter {
        list,
        palette,
        levels: shape.levels(length),
    };

    let mut stack = TransformStack::new();
    stack.push();
    stack.translate(state.tree_root());
    grow(&mut painter, &mut stack, length, length, state.angle, shape);
    stack.pop();

    log::trace!("tree scene rebuilt: {} lines", painter.list.len());
    painter.list.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudioConfig;

    fn build(state: &GameState) -> DrawList {
        let mut list = DrawList::new();
        build_tree_scene(&mut list, state, &TreeShape::default(), &Palette::default());
        list
    }

    #[test]
    fn one_line_per_segment() {
        let state = GameState::new(&StudioConfig::default());
        let list = build(&state);
        let expected = TreeShape::default().segment_count(state.length());
        assert_eq!(list.len() as u64, expected);
    }

    #[test]
    fn trunk_starts_at_tree_root() {
        let state = GameState::new(&StudioConfig::default());
        let list = build(&state);
        let trunk = list.lines().next().cloned();
        let trunk = trunk.map(|l| (l.start, l.end));
        assert_eq!(
            trunk,
            Some((WorldVec::new(1280.0, 1440.0), WorldVec::new(1280.0, 1090.0)))
        );
    }

    #[test]
    fn trunk_is_bark_and_tips_are_green() {
        let state = GameState::new(&StudioConfig::default());
        let list = build(&state);
        let palette = Palette::default();
        let colors: Vec<Color> = list.lines().map(|l| l.color).collect();
        assert_eq!(colors.first(), Some(&palette.trunk));
        assert_eq!(colors.last(), Some(&palette.tip));
    }

    #[test]
    fn axes_are_drawn_first_when_enabled() {
        let mut state = GameState::new(&StudioConfig::default());
        state.show_axes = true;
        let with_axes = build(&state);
        state.show_axes = false;
        let without = build(&state);

        assert_eq!(with_axes.len(), without.len() + 2);
        let first = with_axes.lines().next().map(|l| (l.start, l.color));
        assert_eq!(first, Some((WorldVec::zero(), Palette::default().axes)));
    }

    #[test]
    fn rebuilding_does_not_accumulate() {
        let state = GameState::new(&StudioConfig::default());
        let mut list = DrawList::new();
        let shape = TreeShape::default();
        let a = build_tree_scene(&mut list, &state, &shape, &Palette::default());
        let b = build_tree_scene(&mut list, &state, &shape, &Palette::default());
        assert_eq!(a, b);
        assert_eq!(list.len(), b);
    }

    #[test]
    fn single_level_palette_is_trunk() {
        let p = Palette::default();
        assert_eq!(p.branch(0, 1), p.trunk);
        assert_eq!(p.branch(0, 0), p.trunk);
    }
}
