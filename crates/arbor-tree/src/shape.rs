/// Constants controlling how a tree branches and when it stops.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TreeShape {
    /// Branches shorter than this are not drawn and end the recursion.
    pub min_length: f32,

    /// Child length = parent length * `shrink_factor`. Must lie in (0, 1).
    pub shrink_factor: f32,

    /// Thickness of a branch whose length equals the base length.
    pub trunk_width: f32,

    /// Hard cap on recursion levels, independent of lengths.
    pub max_depth: u32,
}

impl TreeShape {
    /// Thinnest line ever emitted, in pixels.
    pub const MIN_THICKNESS: f32 = 1.0;

    pub fn new(min_length: f32, shrink_factor: f32) -> Self {
        debug_assert!(min_length > 0.0, "min_length must be positive");
        debug_assert!(
            shrink_factor > 0.0 && shrink_factor < 1.0,
            "shrink_factor must lie in (0, 1)"
        );
        Self {
            min_length,
            shrink_factor,
            ..Self::default()
        }
    }

    pub fn with_trunk_width(mut self, width: f32) -> Self {
        self.trunk_width = width;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Whether a branch of `length` at `depth` is drawn.
    #[inline]
    pub fn emits(&self, length: f32, depth: u32) -> bool {
        // NaN compares false here, so it terminates as well.
        depth < self.max_depth && length >= self.min_length
    }

    /// Line thickness for a branch, proportional to its share of the base length.
    #[inline]
    pub fn thickness(&self, length: f32, base_length: f32) -> f32 {
        if base_length <= 0.0 {
            return Self::MIN_THICKNESS;
        }
        (self.trunk_width * length / base_length).max(Self::MIN_THICKNESS)
    }

    /// Number of recursion levels that emit segments for a tree starting at `length`.
    pub fn levels(&self, length: f32) -> u32 {
        let mut current = length;
        let mut depth = 0;
        while self.emits(current, depth) {
            depth += 1;
            current *= self.shrink_factor;
        }
        depth
    }

    /// Total segments a full tree emits: one per node of a complete binary tree.
    pub fn segment_count(&self, length: f32) -> u64 {
        let levels = self.levels(length).min(63);
        (1u64 << levels) - 1
    }
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            min_length: 4.0,
            shrink_factor: 0.67,
            trunk_width: 12.0,
            max_depth: 24,
        }
    }
}
