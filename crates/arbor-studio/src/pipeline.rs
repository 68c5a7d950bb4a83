use anyhow::Result;

use arbor_engine::core::SetupCtx;
use arbor_engine::device::Gpu;
use arbor_engine::paint::Color;
use arbor_engine::render::{LineRenderer, OffscreenTarget, PostProcess, RenderCtx, RenderTarget};
use arbor_engine::scene::DrawList;
use arbor_tree::TreeShape;

use crate::scene::{build_tree_scene, Palette};
use crate::state::GameState;

/// GPU-side resources that live while the loop is running.
pub struct FrameResources {
    pub offscreen: OffscreenTarget,
    pub bloom: PostProcess,
    pub lines: LineRenderer,
    pub draw_list: DrawList,
    pub palette: Palette,
}

impl FrameResources {
    /// Allocates the off-screen target at the surface size and loads the bloom
    /// shader from `shader_path`.
    pub fn create(ctx: &SetupCtx<'_, '_>, shader_path: &std::path::Path) -> Result<Self> {
        let (width, height) = ctx.surface_size();
        let format = ctx.surface_format();

        let offscreen = OffscreenTarget::new(ctx.device(), width, height, format);

        let mut bloom = PostProcess::load(shader_path)?;
        bloom.prepare(ctx.device(), format);

        Ok(Self {
            offscreen,
            bloom,
            lines: LineRenderer::new(),
            draw_list: DrawList::new(),
            palette: Palette::default(),
        })
    }

    /// Reallocates the off-screen target when the drawable size has changed,
    /// e.g. after a scale-factor change. Returns `true` if it was replaced.
    pub fn fit_to_surface(&mut self, gpu: &Gpu<'_>) -> bool {
        let size = gpu.size();
        let Some((width, height)) = resized_extent(self.offscreen.size(), (size.width, size.height))
        else {
            return false;
        };

        self.offscreen = OffscreenTarget::new(gpu.device(), width, height, gpu.surface_format());
        log::info!("offscreen target reallocated at {width}x{height}");
        true
    }
}

/// New off-screen extent for a `surface` size, or `None` if `current` still
/// matches. A minimized (zero-sized) surface keeps the current target.
fn resized_extent(current: (u32, u32), surface: (u32, u32)) -> Option<(u32, u32)> {
    if surface.0 == 0 || surface.1 == 0 || surface == current {
        return None;
    }
    Some(surface)
}

/// Records one frame: tree into the off-screen target, then the bloom
/// composite onto `target`.
pub fn render_frame(
    rctx: &RenderCtx<'_>,
    target: &mut RenderTarget<'_>,
    state: &GameState,
    shape: &TreeShape,
    res: &mut FrameResources,
) {
    build_tree_scene(&mut res.draw_list, state, shape, &res.palette);

    {
        let mut canvas = res.offscreen.bind(target);
        canvas.clear(Color::SKY_BLUE);
        res.lines.render(rctx, &mut canvas, &state.camera, &res.draw_list);
    }

    target.clear(Color::WHITE);
    let source = res.offscreen.composite_source();
    res.bloom.draw(rctx, target, &res.offscreen, source);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_surface_keeps_the_target() {
        assert_eq!(resized_extent((1280, 720), (1280, 720)), None);
    }

    #[test]
    fn scale_factor_change_reallocates_at_the_new_size() {
        assert_eq!(resized_extent((1280, 720), (2560, 1440)), Some((2560, 1440)));
        assert_eq!(resized_extent((2560, 1440), (1280, 720)), Some((1280, 720)));
    }

    #[test]
    fn minimized_surface_keeps_the_target() {
        assert_eq!(resized_extent((1280, 720), (0, 0)), None);
        assert_eq!(resized_extent((1280, 720), (1280, 0)), None);
    }
}
