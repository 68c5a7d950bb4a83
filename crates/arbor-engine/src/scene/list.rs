use super::DrawCmd;

/// Recorded draw stream for a frame.
///
/// Commands are painted in submission order. `clear` keeps the allocation so a
/// list rebuilt every frame stops allocating once warmed up.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns items in submission order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn lines_come_back_in_submission_order() {
        let mut list = DrawList::new();
        list.push_line(Vec2::new(0.0, 0.0), Vec2::new(0.0, -10.0), 2.0, Color::BLACK);
        list.push_line(Vec2::new(0.0, -10.0), Vec2::new(5.0, -15.0), 1.0, Color::WHITE);

        let ends: Vec<Vec2> = list.lines().map(|l| l.end).collect();
        assert_eq!(ends, vec![Vec2::new(0.0, -10.0), Vec2::new(5.0, -15.0)]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut list = DrawList::new();
        for _ in 0..32 {
            list.push_line(Vec2::zero(), Vec2::new(1.0, 1.0), 1.0, Color::BLACK);
        }
        let cap = list.items.capacity();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.items.capacity(), cap);
    }
}
