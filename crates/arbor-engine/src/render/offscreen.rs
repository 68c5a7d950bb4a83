use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::Rect;

use super::{RenderTarget, TargetOrigin};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Off-screen color target that can later be sampled as a texture.
///
/// Contents are stored bottom-left (row 0 is the bottom of the picture), so the
/// rect returned by [`composite_source`](Self::composite_source) has a negative
/// height.
pub struct OffscreenTarget {
    id: u64,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Creates a `width` x `height` target. Zero extents are raised to one texel.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("arbor offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("offscreen target created: {width}x{height} {format:?}");

        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            view,
            format,
            width,
            height,
        }
    }

    /// Process-unique identity, used to cache bind groups that sample this target.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Directs subsequent drawing on `target`'s encoder into this texture.
    ///
    /// Dropping the returned value unbinds it; drawing then goes back to `target`.
    #[inline]
    pub fn bind<'a>(&'a self, target: &'a mut RenderTarget<'_>) -> RenderTarget<'a> {
        target.redirect(&self.view, self.format, TargetOrigin::BottomLeft)
    }

    /// Full-texture source rect with the vertical direction reversed.
    #[inline]
    pub fn composite_source(&self) -> Rect {
        composite_rect(self.width, self.height)
    }
}

#[inline]
pub(crate) fn composite_rect(width: u32, height: u32) -> Rect {
    Rect::new(0.0, 0.0, width as f32, height as f32).flipped_y()
}
