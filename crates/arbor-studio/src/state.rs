use arbor_engine::render::Camera2D;
use arbor_tree::Vec2;

use crate::config::StudioConfig;

/// Everything the frame loop mutates or reads between frames.
#[derive(Debug, Clone)]
pub struct GameState {
    pub title: String,
    /// Window size in logical pixels.
    pub width: f32,
    pub height: f32,

    pub camera: Camera2D,

    /// Branch angle in degrees. Not clamped.
    pub angle: f32,
    /// Trunk length in pixels. Fixed after startup.
    length: f32,

    /// Draw world X/Y axes under the tree.
    pub show_axes: bool,
}

impl GameState {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width as f32,
            height: config.height as f32,
            camera: Camera2D::with_zoom(config.zoom),
            angle: config.angle,
            length: config.length,
            show_axes: config.show_axes,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// World position of the trunk base.
    ///
    /// With zoom 0.5 and no pan this lands on the bottom-center of the canvas.
    #[inline]
    pub fn tree_root(&self) -> Vec2 {
        Vec2::new(self.width, self.height * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_engine::coords::Vec2 as ScreenVec;

    #[test]
    fn defaults_match_the_demo() {
        let state = GameState::new(&StudioConfig::default());
        assert_eq!(state.camera.zoom, 0.5);
        assert_eq!(state.angle, 30.0);
        assert_eq!(state.length(), 350.0);
        assert_eq!(state.camera.offset, ScreenVec::zero());
    }

    #[test]
    fn root_is_bottom_center_on_screen() {
        let state = GameState::new(&StudioConfig::default());
        let root = state.tree_root();
        let screen = state.camera.world_to_screen(ScreenVec::new(root.x, root.y));
        assert_eq!(screen, ScreenVec::new(state.width / 2.0, state.height));
    }
}
