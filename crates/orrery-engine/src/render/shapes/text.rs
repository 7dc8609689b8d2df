use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontSystem;

use super::common::{
    create_viewport_ubo, quad_pipeline, viewport_ubo_layout_entry, InstancedQuads, ViewportUniform,
};

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1;

/// Shelf allocator for glyph bitmaps inside a square atlas.
///
/// Glyphs fill rows left to right; a glyph that overflows the row opens a new
/// shelf below the tallest glyph so far. Once a glyph does not fit vertically
/// the packer stays full.
#[derive(Debug, Clone)]
struct ShelfPacker {
    size: u32,
    padding: u32,
    x: u32,
    y: u32,
    row_height: u32,
    full: bool,
}

impl ShelfPacker {
    fn new(size: u32, padding: u32) -> Self {
        Self { size, padding, x: padding, y: padding, row_height: 0, full: false }
    }

    /// Reserves a `w`×`h` slot and returns its top-left corner.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full || w + 2 * self.padding > self.size || h + 2 * self.padding > self.size {
            return None;
        }
        if self.x + w + self.padding > self.size {
            self.y += self.row_height + self.padding;
            self.x = self.padding;
            self.row_height = 0;
        }
        if self.y + h + self.padding > self.size {
            self.full = true;
            return None;
        }

        let slot = (self.x, self.y);
        self.x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }

    fn uv_rect(&self, (x, y): (u32, u32), w: u32, h: u32) -> ([f32; 2], [f32; 2]) {
        let s = self.size as f32;
        ([x as f32 / s, y as f32 / s], [(x + w) as f32 / s, (y + h) as f32 / s])
    }
}

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// GPU side of the glyph cache: the R8 atlas texture and its bind group.
struct GlyphAtlas {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
}

/// Renderer for `DrawCmd::Text` (body labels, HUD, help overlay).
///
/// Glyphs are rasterized on first use via fontdue into a shelf-packed atlas
/// and cached by `GlyphRasterConfig` for the renderer's lifetime. Labels reuse
/// a handful of sizes, so the atlas warms up within the first frames.
pub struct TextRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    atlas: Option<GlyphAtlas>,
    packer: ShelfPacker,
    glyphs: HashMap<GlyphRasterConfig, CachedGlyph>,
    quads: InstancedQuads,
    layout: Layout<()>,
    warned_unknown_font: bool,
    warned_atlas_full: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            atlas: None,
            packer: ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING),
            glyphs: HashMap::new(),
            quads: InstancedQuads::default(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            warned_unknown_font: false,
            warned_atlas_full: false,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders all `DrawCmd::Text` entries in `draw_list`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.prepare(ctx);

        let mut instances = Vec::new();
        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Text(cmd) = &item.cmd else { continue };
            let Some(font) = fonts.get(cmd.font) else {
                if !self.warned_unknown_font {
                    log::warn!("unknown font {:?}, skipping text", cmd.font);
                    self.warned_unknown_font = true;
                }
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x,
                y: cmd.origin.y,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size, 0));

            let color = [cmd.color.r, cmd.color.g, cmd.color.b, cmd.color.a];
            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }
                if !self.glyphs.contains_key(&g.key) {
                    let (metrics, bitmap) = font.rasterize_config(g.key);
                    let Some(glyph) = upload_glyph(
                        ctx,
                        self.atlas.as_ref(),
                        &mut self.packer,
                        &bitmap,
                        metrics.width as u32,
                        metrics.height as u32,
                    ) else {
                        if self.packer.full && !self.warned_atlas_full {
                            log::warn!(
                                "glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be rendered"
                            );
                            self.warned_atlas_full = true;
                        }
                        continue;
                    };
                    self.glyphs.insert(g.key, glyph);
                }
                let Some(cached) = self.glyphs.get(&g.key) else { continue };

                instances.push(GlyphInstance {
                    dst_min: [g.x, g.y],
                    dst_max: [g.x + g.width as f32, g.y + g.height as f32],
                    uv_min: cached.uv_min,
                    uv_max: cached.uv_max,
                    color,
                });
            }
        }
        if instances.is_empty() {
            return;
        }

        let (Some(pipeline), Some(atlas)) = (&self.pipeline, &self.atlas) else { return };
        ctx.queue.write_buffer(
            &atlas.viewport_ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)),
        );
        self.quads.upload(ctx, "orrery text instances", &instances);
        self.quads.draw(target, "orrery text pass", pipeline, &atlas.bind_group);
    }

    fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orrery text shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/text.wgsl").into()),
        });
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orrery text bgl"),
            entries: &[
                viewport_ubo_layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // The atlas outlives pipeline rebuilds; only its bind group is tied to the layout.
        let texture = match self.atlas.take() {
            Some(atlas) => atlas.texture,
            None => {
                self.glyphs.clear();
                self.packer = ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING);
                ctx.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("orrery text atlas"),
                    size: wgpu::Extent3d {
                        width: ATLAS_SIZE,
                        height: ATLAS_SIZE,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::R8Unorm,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                })
            }
        };
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("orrery text sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let viewport_ubo = create_viewport_ubo(ctx.device, "orrery text viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orrery text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        self.pipeline = Some(quad_pipeline(
            ctx.device,
            ctx.surface_format,
            "orrery text pipeline",
            &shader,
            &bgl,
            GlyphInstance::layout(),
        ));
        self.pipeline_format = Some(ctx.surface_format);
        self.atlas = Some(GlyphAtlas { texture, bind_group, viewport_ubo });
    }
}

/// Copies one rasterized glyph into the atlas.
fn upload_glyph(
    ctx: &RenderCtx<'_>,
    atlas: Option<&GlyphAtlas>,
    packer: &mut ShelfPacker,
    bitmap: &[u8],
    w: u32,
    h: u32,
) -> Option<CachedGlyph> {
    let atlas = atlas?;
    if w == 0 || h == 0 {
        return None;
    }
    let (x, y) = packer.place(w, h)?;

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &atlas.texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        bitmap,
        wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
        wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
    );

    let (uv_min, uv_max) = packer.uv_rect((x, y), w, h);
    Some(CachedGlyph { uv_min, uv_max })
}

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x2,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
