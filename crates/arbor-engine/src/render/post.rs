//! Full-target post-process pass.
//!
//! A post-process shader is WGSL with two entry points, `vs_main` and `fs_main`,
//! and this bind group 0 layout:
//!
//! ```text
//! @binding(0) texture_2d<f32>     source texture
//! @binding(1) sampler             linear, clamp-to-edge
//! @binding(2) uniform PostParams  { uv_origin, uv_extent, texel, intensity, threshold }
//! ```
//!
//! The vertex stage is drawn with 6 vertices and no vertex buffers. It is
//! expected to cover the whole target and map its corners to
//! `uv_origin + corner * uv_extent`.

use std::path::Path;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};

use super::offscreen::OffscreenTarget;
use super::shapes::common::{premul_alpha_blend, triangle_list, ubo_min_binding_size};
use super::{RenderCtx, RenderTarget};

/// Tunables forwarded to the post-process shader.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PostParams {
    /// Strength of the added glow.
    pub intensity: f32,
    /// Brightness above which a texel contributes to the glow.
    pub threshold: f32,
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            intensity: 0.9,
            threshold: 0.2,
        }
    }
}

/// Normalized texture-space region sampled by a composite.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvRect {
    pub origin: Vec2,
    pub extent: Vec2,
}

/// Maps a texel-space source rect onto UVs.
///
/// A negative width or height mirrors that axis. The origin stays put and the
/// covered region is `origin .. origin + |size|`, sampled from the far edge back.
pub fn source_uv_rect(src: Rect, texture_size: (u32, u32)) -> UvRect {
    let tw = texture_size.0.max(1) as f32;
    let th = texture_size.1.max(1) as f32;

    let mut origin = Vec2::new(src.origin.x / tw, src.origin.y / th);
    let mut extent = Vec2::new(src.size.x.abs() / tw, src.size.y.abs() / th);

    if src.size.x < 0.0 {
        origin.x += extent.x;
        extent.x = -extent.x;
    }
    if src.size.y < 0.0 {
        origin.y += extent.y;
        extent.y = -extent.y;
    }

    UvRect { origin, extent }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PostUniform {
    uv_origin: [f32; 2],
    uv_extent: [f32; 2],
    texel: [f32; 2],
    intensity: f32,
    threshold: f32,
}

/// Post-process shader program plus the GPU state needed to run it.
pub struct PostProcess {
    label: String,
    source: String,
    pub params: PostParams,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    params_ubo: Option<wgpu::Buffer>,

    /// Bind group for the last sampled target, keyed by `OffscreenTarget::id`.
    bind_group: Option<(u64, wgpu::BindGroup)>,
}

impl PostProcess {
    /// Wraps WGSL source. Fails if either entry point is missing.
    pub fn from_wgsl(label: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let source = source.into();

        for entry in ["fn vs_main", "fn fs_main"] {
            anyhow::ensure!(
                source.contains(entry),
                "post-process shader `{label}` has no `{entry}` entry point"
            );
        }

        Ok(Self {
            label,
            source,
            params: PostParams::default(),
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            sampler: None,
            params_ubo: None,
            bind_group: None,
        })
    }

    /// Reads a WGSL post-process shader from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read post-process shader {}", path.display()))?;

        log::info!("loaded post-process shader {}", path.display());
        Self::from_wgsl(path.display().to_string(), source)
    }

    /// Builds the pipeline for `format` ahead of the first draw.
    pub fn prepare(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("arbor post bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: ubo_min_binding_size::<PostUniform>(),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("arbor post pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("arbor post pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("arbor post sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("arbor post params ubo"),
            size: std::mem::size_of::<PostUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!("post pipeline `{}` built for {format:?}", self.label);

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.sampler = Some(sampler);
        self.params_ubo = Some(params_ubo);
        self.bind_group = None;
    }

    /// Draws `source` over the whole of `target` through this shader.
    ///
    /// `src` selects the sampled region in texels (see [`source_uv_rect`]).
    /// Existing target contents are blended under the result.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: &OffscreenTarget,
        src: Rect,
    ) {
        if src.is_empty() || !src.is_finite() {
            return;
        }

        self.prepare(ctx.device, target.format);
        self.ensure_bind_group(ctx.device, source);

        let Some(ubo) = self.params_ubo.as_ref() else { return };
        let uv = source_uv_rect(src, source.size());
        let (tw, th) = source.size();
        let uniform = PostUniform {
            uv_origin: uv.origin.to_array(),
            uv_extent: uv.extent.to_array(),
            texel: [1.0 / tw as f32, 1.0 / th as f32],
            intensity: self.params.intensity,
            threshold: self.params.threshold,
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some((_, bind_group)) = self.bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("arbor post pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..6, 0..1);
    }

    fn ensure_bind_group(&mut self, device: &wgpu::Device, source: &OffscreenTarget) {
        if matches!(&self.bind_group, Some((id, _)) if *id == source.id()) {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(ubo) = self.params_ubo.as_ref() else { return };

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("arbor post bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ubo.as_entire_binding(),
                },
            ],
        });

        self.bind_group = Some((source.id(), bind_group));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::render::offscreen::composite_rect;
    use crate::render::{Camera2D, TargetOrigin};

    #[test]
    fn upright_source_maps_to_unit_square() {
        let uv = source_uv_rect(Rect::new(0.0, 0.0, 640.0, 360.0), (640, 360));
        assert_eq!(uv.origin, Vec2::new(0.0, 0.0));
        assert_eq!(uv.extent, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn negative_height_starts_sampling_at_the_bottom_row() {
        let uv = source_uv_rect(Rect::new(0.0, 0.0, 640.0, -360.0), (640, 360));
        assert_eq!(uv.origin, Vec2::new(0.0, 1.0));
        assert_eq!(uv.extent, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn negative_width_mirrors_horizontally() {
        let uv = source_uv_rect(Rect::new(0.0, 0.0, -100.0, 50.0), (200, 100));
        assert_eq!(uv.origin, Vec2::new(0.5, 0.0));
        assert_eq!(uv.extent, Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn flipped_partial_region_stays_inside_the_texture() {
        let uv = source_uv_rect(Rect::new(50.0, 25.0, -100.0, -50.0), (200, 100));
        assert_eq!(uv.origin, Vec2::new(0.75, 0.75));
        assert_eq!(uv.extent, Vec2::new(-0.5, -0.5));
    }

    #[test]
    fn composite_puts_offscreen_row_zero_at_the_window_top() {
        let (w, h) = (1280, 720);
        let uv = source_uv_rect(composite_rect(w, h), (w, h));

        let v_top = uv.origin.y;
        let v_bottom = uv.origin.y + uv.extent.y;
        assert_eq!((v_top, v_bottom), (1.0, 0.0));
        for v in [v_top, v_bottom, uv.origin.x, uv.origin.x + uv.extent.x] {
            assert!((0.0..=1.0).contains(&v), "uv {v} leaves the texture");
        }

        // Where the off-screen pass wrote screen rows 0 and h, in texture v.
        let viewport = Viewport::new(w as f32, h as f32);
        let view = Camera2D::default().uniform(viewport, TargetOrigin::BottomLeft);
        let texture_v = |screen_y: f32| (1.0 - view.to_ndc(Vec2::new(0.0, screen_y)).y) * 0.5;
        assert!((texture_v(0.0) - v_top).abs() < 1e-6);
        assert!((texture_v(h as f32) - v_bottom).abs() < 1e-6);
    }

    #[test]
    fn partial_region_is_scaled_by_texture_size() {
        let uv = source_uv_rect(Rect::new(50.0, 25.0, 100.0, 50.0), (200, 100));
        assert_eq!(uv.origin, Vec2::new(0.25, 0.25));
        assert_eq!(uv.extent, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let err = PostProcess::from_wgsl("broken", "@vertex fn vs_main() {}").err();
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("fs_main"), "{msg}");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PostProcess::load("/definitely/not/here/bloom.wgsl").err();
        let msg = err.map(|e| format!("{e:#}")).unwrap_or_default();
        assert!(msg.contains("failed to read post-process shader"), "{msg}");
    }

    #[test]
    fn uniform_is_uniform_buffer_sized() {
        assert_eq!(std::mem::size_of::<PostUniform>() % 16, 0);
    }
}
