use crate::coords::Viewport;
use crate::paint::Color;

/// Renderer-facing context (device/queue + surface format + viewport).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }
}

/// Where row 0 of a color target ends up on screen.
///
/// The window surface is top-left. Off-screen targets are stored bottom-left
/// (GL convention), so compositing them needs a vertically flipped source rect.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TargetOrigin {
    TopLeft,
    BottomLeft,
}

impl TargetOrigin {
    /// Sign applied to NDC y when drawing into a target with this origin.
    #[inline]
    pub fn ndc_y_sign(self) -> f32 {
        match self {
            TargetOrigin::TopLeft => 1.0,
            TargetOrigin::BottomLeft => -1.0,
        }
    }
}

/// Target for drawing (encoder + color view).
///
/// Holding a `RenderTarget` is what "binding" a destination means here: passes
/// recorded through it land in `color_view` until it is dropped.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub origin: TargetOrigin,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        format: wgpu::TextureFormat,
        origin: TargetOrigin,
    ) -> Self {
        Self { encoder, color_view, format, origin }
    }

    /// Re-targets the same encoder at another color view for the lifetime of the
    /// returned value.
    #[inline]
    pub fn redirect<'b>(
        &'b mut self,
        color_view: &'b wgpu::TextureView,
        format: wgpu::TextureFormat,
        origin: TargetOrigin,
    ) -> RenderTarget<'b> {
        RenderTarget::new(self.encoder, color_view, format, origin)
    }

    /// Records a pass that clears the whole target to `color`.
    pub fn clear(&mut self, color: Color) {
        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("arbor clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Begins a pass that keeps the existing contents.
    pub(crate) fn begin_load_pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
