//! Shape renderers.

mod common;

pub mod circle;
pub mod line;
pub mod text;

use crate::scene::DrawList;
use crate::text::FontSystem;

use super::{RenderCtx, RenderTarget};

/// Bundles every shape renderer and draws a full `DrawList` in layer order:
/// lines first (guides sit behind bodies), then discs, then text.
#[derive(Default)]
pub struct SceneRenderer {
    pub lines: line::LineRenderer,
    pub circles: circle::CircleRenderer,
    pub text: text::TextRenderer,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        self.lines.render(ctx, target, draw_list);
        self.circles.render(ctx, target, draw_list);
        self.text.render(ctx, target, draw_list, fonts);
    }
}
