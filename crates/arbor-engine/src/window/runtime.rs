use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::{FrameClock, FrameLimiter, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// Redraw rate cap. `0` redraws as fast as the loop allows.
    pub target_fps: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "arbor".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
            target_fps: 60,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, drives `app` until it exits, and returns the first
    /// fatal error raised by window/GPU creation or `App::on_start`.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    limiter: FrameLimiter,

    /// `on_start` succeeded and `on_exit` has not run yet.
    started: bool,
    exit_requested: bool,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let limiter = FrameLimiter::new(config.target_fps);
        Self {
            config,
            gpu_init,
            app,
            window: None,
            limiter,
            started: false,
            exit_requested: false,
            error: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let entry = self.create_window_entry(event_loop)?;
        let app = &mut self.app;

        entry.with(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_start(&mut ctx)
        })?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.started = true;

        log::info!(
            "runtime started: \"{}\" {}x{}, target {} fps",
            self.config.title,
            self.config.initial_size.width,
            self.config.initial_size.height,
            self.config.target_fps
        );
        Ok(())
    }

    /// Runs `on_exit` (once) while the GPU is alive, then drops the window.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if std::mem::take(&mut self.started) {
            self.app.on_exit();
        }
        if self.window.take().is_some() {
            log::info!("window closed");
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.shutdown(event_loop);
    }

    /// Drives one frame. Returns `Exit` if the app asked to stop.
    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        self.limiter.mark_frame(Instant::now());

        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return AppControl::Continue;
        };

        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            // Scope to ensure `ctx` is dropped before mutating frame state.
            {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time: ft,
                };

                control = app.on_frame(&mut ctx);
            }

            // Clear per-frame deltas after the frame is consumed.
            fields.input_frame.clear();
        });

        control
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err.context("failed to start"));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        let Some(entry) = self.window.as_ref() else { return };

        let now = Instant::now();
        if self.limiter.is_due(now) {
            entry.with_window(|w| w.request_redraw());
            event_loop.set_control_flow(ControlFlow::Wait);
        } else if let Some(deadline) = self.limiter.deadline() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let control = entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
            app.on_window_event(window_id, &event)
        });

        if control == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if std::mem::take(&mut self.started) {
            self.app.on_exit();
        }
        self.window = None;
    }
}
