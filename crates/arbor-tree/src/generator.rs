use glam::Vec2;

use crate::shape::TreeShape;
use crate::transform::TransformStack;

/// One branch of the tree, in the space the transform stack maps into.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
    /// Recursion level; the trunk is 0.
    pub depth: u32,
}

impl Segment {
    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Unit vector from `start` towards `end` (zero for degenerate segments).
    #[inline]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// Receives segments in emission order (depth-first, `+angle` child first).
pub trait SegmentSink {
    fn segment(&mut self, segment: Segment);
}

impl SegmentSink for Vec<Segment> {
    #[inline]
    fn segment(&mut self, segment: Segment) {
        self.push(segment);
    }
}

/// Grows a tree rooted at the stack's current origin, along local `-Y`.
///
/// `length` is the length of the first branch, `base_length` the reference
/// length used for thickness. Each level rotates its two children by
/// `+angle_degrees` and `-angle_degrees` and scales their length by
/// `shape.shrink_factor`.
///
/// The stack is left as it was found.
pub fn grow<S>(
    sink: &mut S,
    stack: &mut TransformStack,
    length: f32,
    base_length: f32,
    angle_degrees: f32,
    shape: &TreeShape,
) where
    S: SegmentSink + ?Sized,
{
    branch(sink, stack, length, base_length, angle_degrees, shape, 0);
}

/// Grows a tree from the identity transform and returns every segment.
pub fn collect(length: f32, angle_degrees: f32, shape: &TreeShape) -> Vec<Segment> {
    let capacity = usize::try_from(shape.segment_count(length)).unwrap_or(0).min(1 << 20);
    let mut out = Vec::with_capacity(capacity);
    let mut stack = TransformStack::new();
    grow(&mut out, &mut stack, length, length, angle_degrees, shape);
    out
}

fn branch<S>(
    sink: &mut S,
    stack: &mut TransformStack,
    length: f32,
    base_length: f32,
    angle_degrees: f32,
    shape: &TreeShape,
    depth: u32,
) where
    S: SegmentSink + ?Sized,
{
    if !shape.emits(length, depth) {
        return;
    }

    let tip = Vec2::new(0.0, -length);
    sink.segment(Segment {
        start: stack.transform_point(Vec2::ZERO),
        end: stack.transform_point(tip),
        thickness: shape.thickness(length, base_length),
        depth,
    });

    let child = length * shape.shrink_factor;

    stack.with_saved(|stack| {
        stack.translate(tip);

        for turn in [angle_degrees, -angle_degrees] {
            stack.with_saved(|stack| {
                stack.rotate_degrees(turn);
                branch(sink, stack, child, base_length, angle_degrees, shape, depth + 1);
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOCK_SHAPE: TreeShape = TreeShape {
        min_length: 4.0,
        shrink_factor: 0.75,
        trunk_width: 12.0,
        max_depth: 24,
    };

    struct Counter(u64);

    impl SegmentSink for Counter {
        fn segment(&mut self, _segment: Segment) {
            self.0 += 1;
        }
    }

    /// Indices of the direct children of `parent`, in emission order.
    fn children(segments: &[Segment], parent: usize) -> Vec<usize> {
        let depth = segments[parent].depth;
        segments[parent + 1..]
            .iter()
            .enumerate()
            .take_while(|(_, s)| s.depth > depth)
            .filter(|(_, s)| s.depth == depth + 1)
            .map(|(i, _)| parent + 1 + i)
            .collect()
    }

    #[test]
    fn recursion_terminates_with_complete_binary_tree() {
        let mut counter = Counter(0);
        let mut stack = TransformStack::new();
        grow(&mut counter, &mut stack, 350.0, 350.0, 30.0, &STOCK_SHAPE);

        let levels = STOCK_SHAPE.levels(350.0);
        assert_eq!(levels, 16);
        assert_eq!(counter.0, STOCK_SHAPE.segment_count(350.0));
        assert_eq!(counter.0, (1 << levels) - 1);
    }

    #[test]
    fn terminates_for_various_thresholds() {
        for (min_length, start) in [(1.0, 50.0), (4.0, 4.5), (10.0, 1000.0), (0.5, 2.0)] {
            let shape = TreeShape::new(min_length, 0.7);
            let segments = collect(start, 25.0, &shape);
            assert_eq!(segments.len() as u64, shape.segment_count(start));
            assert!(segments.iter().all(|s| s.length() >= min_length - 1e-3));
        }
    }

    #[test]
    fn below_threshold_emits_nothing() {
        assert!(collect(3.0, 30.0, &STOCK_SHAPE).is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = collect(350.0, 30.0, &STOCK_SHAPE);
        let b = collect(350.0, 30.0, &STOCK_SHAPE);
        assert_eq!(a.len(), b.len());
        assert!(a == b);
    }

    #[test]
    fn trunk_grows_up_from_the_root() {
        let mut out = Vec::new();
        let mut stack = TransformStack::new();
        stack.translate(Vec2::new(640.0, 720.0));
        grow(&mut out, &mut stack, 350.0, 350.0, 30.0, &TreeShape::default());

        let trunk = out[0];
        assert_eq!(trunk.depth, 0);
        assert_eq!(trunk.start, Vec2::new(640.0, 720.0));
        assert!((trunk.end - Vec2::new(640.0, 370.0)).length() < 1e-3);
        assert_eq!(trunk.thickness, TreeShape::default().trunk_width);
        // Caller's transform is untouched.
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.transform_point(Vec2::ZERO), Vec2::new(640.0, 720.0));
    }

    #[test]
    fn children_start_at_parent_tip_and_shrink() {
        let segments = collect(100.0, 20.0, &TreeShape::new(4.0, 0.5));
        for i in 0..segments.len() {
            for c in children(&segments, i) {
                assert!((segments[c].start - segments[i].end).length() < 1e-3);
                let ratio = segments[c].length() / segments[i].length();
                assert!((ratio - 0.5).abs() < 1e-4);
                assert!(segments[c].thickness <= segments[i].thickness);
            }
        }
    }

    #[test]
    fn siblings_mirror_about_parent_axis() {
        let angle: f32 = 30.0;
        let segments = collect(350.0, angle, &STOCK_SHAPE);

        let mut checked = 0;
        for i in 0..segments.len() {
            let kids = children(&segments, i);
            if kids.is_empty() {
                continue;
            }
            assert_eq!(kids.len(), 2, "segment {i} has {} children", kids.len());

            let axis = segments[i].direction();
            let left = segments[kids[0]].direction();
            let right = segments[kids[1]].direction();

            // Reflect `left` across the parent axis; it must land on `right`.
            let reflected = 2.0 * left.dot(axis) * axis - left;
            assert!((reflected - right).length() < 1e-3, "segment {i} children not mirrored");

            let expected_cos = angle.to_radians().cos();
            assert!((left.dot(axis) - expected_cos).abs() < 1e-3);
            assert!((right.dot(axis) - expected_cos).abs() < 1e-3);

            // `+angle` child turns clockwise on a y-down screen.
            assert!(axis.perp_dot(left) > 0.0);
            assert!(axis.perp_dot(right) < 0.0);
            checked += 1;
        }
        assert_eq!(checked as u64, (1u64 << (STOCK_SHAPE.levels(350.0) - 1)) - 1);
    }

    #[test]
    fn unclamped_angle_still_terminates() {
        let shape = TreeShape::new(4.0, 0.6);
        for angle in [-270.0, 0.0, 135.0, 720.0] {
            let segments = collect(200.0, angle, &shape);
            assert_eq!(segments.len() as u64, shape.segment_count(200.0));
        }
    }

    #[test]
    fn sink_can_be_a_trait_object() {
        let mut out: Vec<Segment> = Vec::new();
        let sink: &mut dyn SegmentSink = &mut out;
        let mut stack = TransformStack::new();
        grow(sink, &mut stack, 16.0, 16.0, 45.0, &TreeShape::new(4.0, 0.5));
        assert_eq!(out.len(), 7);
    }
}
