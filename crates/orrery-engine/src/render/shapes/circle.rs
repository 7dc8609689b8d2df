use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_viewport_ubo, quad_pipeline, resolve_paint, viewport_ubo_layout_entry, InstancedQuads,
    ViewportUniform,
};

/// Renderer for `DrawCmd::Circle`, which carries every projected body.
///
/// Supported paints:
/// - `Paint::Solid`
/// - `Paint::LinearGradient` (2-stop; uses first and last stop for gradients with more stops)
///
/// Instances are uploaded in paint order, so z-sorted discs overlap correctly.
#[derive(Default)]
pub struct CircleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    quads: InstancedQuads,
    warned_multi_stop: bool,
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut instances = Vec::new();
        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Circle(cmd) = &item.cmd else { continue };
            if cmd.radius <= 0.0 || !cmd.center.is_finite() {
                continue;
            }

            let (color0, color1, grad_p0, grad_p1) =
                resolve_paint(&cmd.paint, &mut self.warned_multi_stop);
            instances.push(CircleInstance {
                center: [cmd.center.x, cmd.center.y],
                radius: [cmd.radius, 0.0],
                color0,
                color1,
                grad_p0,
                grad_p1,
            });
        }
        if instances.is_empty() {
            return;
        }

        self.prepare(ctx);
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
        }
        self.quads.upload(ctx, "orrery circle instances", &instances);

        if let (Some(pipeline), Some(bind_group)) = (&self.pipeline, &self.bind_group) {
            self.quads.draw(target, "orrery circle pass", pipeline, bind_group);
        }
    }

    /// (Re)builds the pipeline and its viewport binding when the surface format changes.
    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery circle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/circle.wgsl").into()),
        });
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery circle bgl"),
            entries: &[viewport_ubo_layout_entry()],
        });
        let viewport_ubo = create_viewport_ubo(ctx.device, "orrery circle viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery circle bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.pipeline = Some(quad_pipeline(
            ctx.device,
            ctx.surface_format,
            "orrery circle pipeline",
            &shader,
            &bgl,
            CircleInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (64 bytes):
///
///  offset  0  center   [f32; 2]   loc 1
///  offset  8  radius   [f32; 2]   loc 2  (.y unused)
///  offset 16  color0   [f32; 4]   loc 3
///  offset 32  color1   [f32; 4]   loc 4
///  offset 48  grad_p0  [f32; 2]   loc 5
///  offset 56  grad_p1  [f32; 2]   loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CircleInstance {
    center: [f32; 2],
    radius: [f32; 2],
    color0: [f32; 4],
    color1: [f32; 4],
    grad_p0: [f32; 2],
    grad_p1: [f32; 2],
}

impl CircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius
        3 => Float32x4, // color0
        4 => Float32x4, // color1
        5 => Float32x2, // grad_p0
        6 => Float32x2  // grad_p1
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
