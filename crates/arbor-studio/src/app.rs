use std::path::PathBuf;

use anyhow::Result;

use arbor_engine::core::{App as EngineApp, AppControl, FrameCtx, SetupCtx};
use arbor_engine::window::Runtime;
use arbor_tree::TreeShape;

use crate::config::StudioConfig;
use crate::controls::{poll_input, Controls};
use crate::lifecycle::Lifecycle;
use crate::pipeline::{render_frame, FrameResources};
use crate::state::GameState;

/// Builder for the fractal tree studio.
///
/// ```rust,ignore
/// Studio::new()
///     .title("Fractal Tree")
///     .size(1280.0, 720.0)
///     .target_fps(60)
///     .run()?;
/// ```
pub struct Studio {
    config: StudioConfig,
}

impl Studio {
    pub fn new() -> Self {
        Self::with_config(StudioConfig::default())
    }

    pub fn with_config(config: StudioConfig) -> Self {
        Self { config }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.config.title = t.into();
        self
    }

    /// Set the window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn target_fps(mut self, fps: u32) -> Self {
        self.config.target_fps = fps;
        self
    }

    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    /// Set the initial branch angle (degrees) and trunk length (pixels).
    pub fn tree(mut self, angle: f32, length: f32) -> Self {
        self.config.angle = angle;
        self.config.length = length;
        self
    }

    pub fn shape(mut self, shape: TreeShape) -> Self {
        self.config.shape = shape;
        self
    }

    pub fn controls(mut self, controls: Controls) -> Self {
        self.config.controls = controls;
        self
    }

    pub fn show_axes(mut self, show: bool) -> Self {
        self.config.show_axes = show;
        self
    }

    pub fn bloom_shader(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.bloom_shader = path.into();
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        let runtime = self.config.runtime_config();
        let gpu = self.config.gpu.clone();
        Runtime::run(runtime, gpu, StudioApp::new(self.config))
    }
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

struct StudioApp {
    config: StudioConfig,
    state: GameState,
    lifecycle: Lifecycle<FrameResources>,
}

impl StudioApp {
    fn new(config: StudioConfig) -> Self {
        let state = GameState::new(&config);
        Self {
            config,
            state,
            lifecycle: Lifecycle::new(),
        }
    }
}

impl EngineApp for StudioApp {
    fn on_start(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let resources = FrameResources::create(ctx, &self.config.bloom_shader)?;
        let (w, h) = resources.offscreen.size();
        self.lifecycle.start(resources)?;

        log::info!(
            "studio running: angle {} deg, length {} px, zoom {}, offscreen {w}x{h}",
            self.state.angle,
            self.state.length(),
            self.state.camera.zoom
        );
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let bindings = &self.config.controls.bindings;

        if bindings.exit.is_some_and(|key| ctx.input_frame.was_pressed(key)) {
            log::info!("exit key pressed");
            return AppControl::Exit;
        }
        if ctx.input_frame.was_pressed(bindings.toggle_axes) {
            self.state.show_axes = !self.state.show_axes;
            log::debug!("axes overlay {}", if self.state.show_axes { "on" } else { "off" });
        }

        poll_input(&mut self.state, ctx.input, ctx.time.dt, &self.config.controls);

        let Some(resources) = self.lifecycle.resources_mut() else {
            return AppControl::Continue;
        };
        resources.fit_to_surface(ctx.gpu);

        let state = &self.state;
        let shape = &self.config.shape;
        ctx.render(|rctx, target| render_frame(rctx, target, state, shape, resources))
    }

    fn on_exit(&mut self) {
        if self.lifecycle.close().is_some() {
            log::info!("render resources released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let studio = Studio::new()
            .title("Bonsai")
            .size(640.0, 480.0)
            .target_fps(30)
            .tree(45.0, 200.0);

        let c = studio.config();
        assert_eq!(c.title, "Bonsai");
        assert_eq!((c.width, c.height), (640.0, 480.0));
        assert_eq!(c.target_fps, 30);
        assert_eq!((c.angle, c.length), (45.0, 200.0));
        assert_eq!(c.zoom, 0.5);
    }

    #[test]
    fn app_starts_uninitialized() {
        let app = StudioApp::new(StudioConfig::default());
        assert!(!app.lifecycle.is_running());
        assert!(!app.lifecycle.is_closed());
    }

    #[test]
    fn exit_without_start_still_closes() {
        let mut app = StudioApp::new(StudioConfig::default());
        app.on_exit();
        assert!(app.lifecycle.is_closed());
    }
}
