use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::shapes::line::LineCmd;
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    create_viewport_ubo, quad_pipeline, viewport_ubo_layout_entry, InstancedQuads, ViewportUniform,
};

/// Renderer for `DrawCmd::Line` (orbit guides).
///
/// Each segment is one instanced quad, expanded along the segment normal in
/// the vertex shader. Zero-length segments are skipped.
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    quads: InstancedQuads,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let instances: Vec<LineInstance> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Line(cmd) => LineInstance::from_cmd(cmd),
                _ => None,
            })
            .collect();
        if instances.is_empty() {
            return;
        }

        self.prepare(ctx);
        if let Some(ubo) = self.viewport_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)));
        }
        self.quads.upload(ctx, "orrery line instances", &instances);

        if let (Some(pipeline), Some(bind_group)) = (&self.pipeline, &self.bind_group) {
            self.quads.draw(target, "orrery line pass", pipeline, bind_group);
        }
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery line shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery line bgl"),
            entries: &[viewport_ubo_layout_entry()],
        });
        let viewport_ubo = create_viewport_ubo(ctx.device, "orrery line viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery line bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.pipeline = Some(quad_pipeline(
            ctx.device,
            ctx.surface_format,
            "orrery line pipeline",
            &shader,
            &bgl,
            LineInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  from   [f32; 2]   loc 1
///  offset  8  to     [f32; 2]   loc 2
///  offset 16  width  [f32; 2]   loc 3  (.y unused)
///  offset 24  _pad   [f32; 2]
///  offset 32  color  [f32; 4]   loc 4
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    from: [f32; 2],
    to: [f32; 2],
    width: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

impl LineInstance {
    fn from_cmd(cmd: &LineCmd) -> Option<Self> {
        let drawable =
            cmd.width > 0.0 && cmd.from.is_finite() && cmd.to.is_finite() && cmd.from != cmd.to;
        drawable.then(|| Self {
            from: [cmd.from.x, cmd.from.y],
            to: [cmd.to.x, cmd.to.y],
            width: [cmd.width, 0.0],
            _pad: [0.0; 2],
            color: [cmd.color.r, cmd.color.g, cmd.color.b, cmd.color.a],
        })
    }

    const ATTRS: [wgpu::VertexAttribute; 4] = [
        wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 1 },
        wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 8, shader_location: 2 },
        wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 16, shader_location: 3 },
        wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 32, shader_location: 4 },
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

    fn cmd(from: Vec2, to: Vec2, width: f32) -> LineCmd {
        LineCmd { from, to, width, color: Color::GRAY }
    }

    #[test]
    fn degenerate_segments_are_skipped() {
        let p = Vec2::new(4.0, 4.0);
        assert!(LineInstance::from_cmd(&cmd(p, p, 1.0)).is_none());
        assert!(LineInstance::from_cmd(&cmd(p, Vec2::new(5.0, 4.0), 0.0)).is_none());
        assert!(LineInstance::from_cmd(&cmd(p, Vec2::new(f32::NAN, 0.0), 1.0)).is_none());
    }

    #[test]
    fn instance_carries_endpoints_and_color() {
        let inst = LineInstance::from_cmd(&cmd(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 1.5))
            .unwrap();
        assert_eq!(inst.from, [1.0, 2.0]);
        assert_eq!(inst.to, [3.0, 4.0]);
        assert_eq!(inst.width, [1.5, 0.0]);
        assert_eq!(inst.color, [Color::GRAY.r, Color::GRAY.g, Color::GRAY.b, Color::GRAY.a]);
    }
}
