use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Call order: `on_start` once the window and GPU exist, then `on_window_event`
/// / `on_frame` until the loop ends, then `on_exit` exactly once if `on_start`
/// succeeded.
pub trait App {
    /// Called once, before the first frame. An error stops the runtime.
    fn on_start(&mut self, ctx: &mut SetupCtx<'_, '_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the loop ends, while the GPU is still alive.
    fn on_exit(&mut self) {}
}
