use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::camera::{Camera2D, ViewUniform};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawList;

use super::common::{
    premul_alpha_blend, triangle_list, ubo_min_binding_size, QuadVertex, QUAD_INDICES,
    QUAD_VERTICES,
};

/// Thick line renderer.
///
/// Each line is one instanced quad stretched from `start` to `end` and widened
/// along its normal by `thickness`. Geometry is world space; the camera and the
/// target origin are applied in the vertex shader.
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    view_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instances: Vec<LineInstance>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the lines in `draw_list` into `target` through `camera`.
    ///
    /// Degenerate lines are skipped. Existing target contents are kept.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera2D,
        draw_list: &DrawList,
    ) {
        let mut instances = std::mem::take(&mut self.instances);
        build_instances(draw_list, &mut instances);

        if !instances.is_empty() {
            self.draw(ctx, target, camera, &instances);
        }
        self.instances = instances;
    }

    fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera2D,
        instances: &[LineInstance],
    ) {
        self.ensure_pipeline(ctx, target.format);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(ubo) = self.view_ubo.as_ref() else { return };
        let view = camera.uniform(ctx.viewport, target.origin);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&view));

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.begin_load_pass("arbor line pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..instances.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("arbor line shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("arbor line bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: ubo_min_binding_size::<ViewUniform>(),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("arbor line pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("arbor line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), LineInstance::layout()],
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

        log::debug!("line pipeline built for {format:?}");

        self.pipeline_format = Some(format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.view_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.view_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("arbor line view ubo"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("arbor line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_ubo.as_entire_binding(),
            }],
        });

        self.view_ubo = Some(view_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("arbor line quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("arbor line quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = instance_capacity_for(required_instances);
        let new_size = (new_cap * std::mem::size_of::<LineInstance>()) as u64;

        log::debug!("growing line instance buffer to {new_cap} instances");

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("arbor line instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

fn instance_capacity_for(required: usize) -> usize {
    required.next_power_of_two().max(64)
}

/// Converts recorded lines into GPU instances, in submission order.
fn build_instances(draw_list: &DrawList, out: &mut Vec<LineInstance>) {
    out.clear();
    out.extend(
        draw_list
            .lines()
            .filter(|line| !line.is_degenerate())
            .map(|line| LineInstance {
                start: line.start.to_array(),
                end: line.end.to_array(),
                thickness: line.thickness,
                color: line.color.to_array(),
            }),
    );
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LineInstance {
    start: [f32; 2],
    end: [f32; 2],
    thickness: f32,
    color: [f32; 4],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // start
        2 => Float32x2, // end
        3 => Float32,   // thickness
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn degenerate_lines_are_dropped() {
        let mut list = DrawList::new();
        list.push_line(Vec2::new(0.0, 0.0), Vec2::new(0.0, -10.0), 2.0, Color::WHITE);
        list.push_line(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), 2.0, Color::WHITE);
        list.push_line(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), 0.0, Color::WHITE);

        let mut out = Vec::new();
        build_instances(&list, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].end, [0.0, -10.0]);
        assert_eq!(out[0].thickness, 2.0);
    }

    #[test]
    fn rebuilding_replaces_previous_instances() {
        let mut list = DrawList::new();
        list.push_line(Vec2::zero(), Vec2::new(1.0, 0.0), 1.0, Color::BLACK);

        let mut out = Vec::new();
        build_instances(&list, &mut out);
        build_instances(&list, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn instance_stride_has_no_padding() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 9 * 4);
    }

    #[test]
    fn capacity_grows_in_powers_of_two() {
        assert_eq!(instance_capacity_for(1), 64);
        assert_eq!(instance_capacity_for(65), 128);
        assert_eq!(instance_capacity_for(65_535), 65_536);
    }
}
