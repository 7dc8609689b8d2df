use std::ops::{Deref, DerefMut};

use glam::Vec3;

use crate::assets::Model;
use crate::camera::FreeCamera;
use crate::coords::{Vec2, Viewport};
use crate::paint::{Color, LinearGradient, Paint};
use crate::scene::{DrawList, ZIndex};
use crate::text::{FontId, FontSystem};

use super::TransformStack;

/// Degrees between guide circle vertices.
const CIRCLE_STEP_DEGREES: usize = 10;
/// Guide circle line width in logical pixels.
const CIRCLE_LINE_WIDTH: f32 = 1.0;
/// Discs smaller than this many pixels are not recorded.
const MIN_DISC_RADIUS: f32 = 0.25;

/// Immediate-mode 3D drawing surface.
///
/// Model and circle calls are placed by the current transform; text calls are
/// in screen space. `world_to_screen` projects world coordinates and does not
/// consult the transform stack.
pub trait Canvas3d {
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);

    /// Rotates the current frame by `degrees` about `axis`.
    fn rotate(&mut self, axis: Vec3, degrees: f32);
    fn translate(&mut self, offset: Vec3);

    fn draw_model(&mut self, model: &Model, position: Vec3, scale: f32, tint: Color);

    /// Draws a circle built in the local XY plane, rotated by `degrees` about
    /// `axis`, centered at `center`.
    fn draw_circle_3d(&mut self, center: Vec3, radius: f32, axis: Vec3, degrees: f32, color: Color);

    fn world_to_screen(&self, point: Vec3, camera: &FreeCamera) -> Vec2;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);

    /// Width of `text` at `size`, in logical pixels.
    fn measure_text(&self, text: &str, size: f32) -> f32;

    /// Pushes the transform stack and returns a guard that pops it on drop.
    fn scope(&mut self) -> TransformScope<'_, Self>
    where
        Self: Sized,
    {
        self.push_matrix();
        TransformScope { canvas: self }
    }
}

/// Balanced push/pop of a canvas transform.
///
/// Dereferences to the canvas so drawing continues through the guard.
pub struct TransformScope<'a, C: Canvas3d> {
    canvas: &'a mut C,
}

impl<C: Canvas3d> Deref for TransformScope<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas3d> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas3d> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        self.canvas.pop_matrix();
    }
}

/// Canvas that records into a [`DrawList`].
///
/// Models become depth-sorted shaded discs colored by their diffuse texture,
/// circles become line segments and text becomes text commands on the overlay
/// layer. Without a font, text calls are dropped.
pub struct Canvas<'a> {
    list: &'a mut DrawList,
    fonts: &'a FontSystem,
    font: Option<FontId>,
    viewport: Viewport,
    camera: FreeCamera,
    transform: TransformStack,
}

impl<'a> Canvas<'a> {
    pub fn new(
        list: &'a mut DrawList,
        fonts: &'a FontSystem,
        font: Option<FontId>,
        viewport: Viewport,
        camera: FreeCamera,
    ) -> Self {
        Self {
            list,
            fonts,
            font,
            viewport,
            camera,
            transform: TransformStack::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> &TransformStack {
        &self.transform
    }

    /// Draws `"{fps} FPS"` at 20px, colored by how far the rate has dropped.
    pub fn draw_fps(&mut self, x: f32, y: f32, fps: u32) {
        let color = match fps {
            30.. => Color::LIME,
            15..=29 => Color::ORANGE,
            _ => Color::RED,
        };
        self.draw_text(&format!("{fps} FPS"), x, y, 20.0, color);
    }

    /// Ends recording. Logs if pushes and pops did not balance.
    pub fn finish(self) {
        let depth = self.transform.depth();
        if depth != 0 {
            log::warn!("canvas finished with {depth} unpopped transform(s)");
        }
    }

    fn project(&self, world: Vec3) -> Option<(Vec2, f32)> {
        self.camera
            .project(world, self.viewport)
            .map(|p| (p.screen, p.depth))
    }

    /// Pixels per world unit at `depth` along the view direction.
    fn pixels_per_unit(&self, depth: f32) -> f32 {
        let half_fov = (self.camera.fovy.to_radians() * 0.5).tan();
        self.viewport.height * 0.5 / (half_fov * depth)
    }
}

impl Canvas3d for Canvas<'_> {
    fn push_matrix(&mut self) {
        self.transform.push();
    }

    fn pop_matrix(&mut self) {
        self.transform.pop();
    }

    fn rotate(&mut self, axis: Vec3, degrees: f32) {
        self.transform.rotate(axis, degrees);
    }

    fn translate(&mut self, offset: Vec3) {
        self.transform.translate(offset);
    }

    fn draw_model(&mut self, model: &Model, position: Vec3, scale: f32, tint: Color) {
        let center = self.transform.transform_point(position);
        let Some((screen, depth)) = self.project(center) else {
            return;
        };

        let world_radius = model.bound_radius() * scale * self.transform.scale();
        let radius = world_radius * self.pixels_per_unit(depth);
        if !radius.is_finite() || radius < MIN_DISC_RADIUS {
            return;
        }

        let base = model
            .diffuse()
            .map_or(Color::WHITE, |t| t.average_color())
            .modulate(tint);

        // Lit from the upper left.
        let reach = Vec2::new(radius, radius) * std::f32::consts::FRAC_1_SQRT_2;
        let gradient = LinearGradient::two_stop(
            screen - reach,
            base.shaded(1.25),
            screen + reach,
            base.shaded(0.35),
        );

        self.list.push_circle(
            ZIndex::from_depth(depth),
            screen,
            radius,
            Paint::LinearGradient(gradient),
        );
    }

    fn draw_circle_3d(&mut self, center: Vec3, radius: f32, axis: Vec3, degrees: f32, color: Color) {
        self.transform.push();
        self.transform.translate(center);
        self.transform.rotate(axis, degrees);

        let point = |deg: usize| {
            let (s, c) = (deg as f32).to_radians().sin_cos();
            Vec3::new(s * radius, c * radius, 0.0)
        };

        for deg in (0..360).step_by(CIRCLE_STEP_DEGREES) {
            let a = self.transform.transform_point(point(deg));
            let b = self.transform.transform_point(point(deg + CIRCLE_STEP_DEGREES));
            let (Some((pa, _)), Some((pb, _))) = (self.project(a), self.project(b)) else {
                continue;
            };
            self.list.push_line(ZIndex::GUIDE, pa, pb, CIRCLE_LINE_WIDTH, color);
        }

        self.transform.pop();
    }

    fn world_to_screen(&self, point: Vec3, camera: &FreeCamera) -> Vec2 {
        camera.world_to_screen(point, self.viewport)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(font) = self.font else {
            return;
        };
        self.list.push_text(ZIndex::OVERLAY, text, font, size, color, Vec2::new(x, y));
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => self.fonts.measure_text(text, font, size).x,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Texture;
    use crate::scene::DrawCmd;

    const VIEW: Viewport = Viewport::new(800.0, 450.0);

    fn camera() -> FreeCamera {
        FreeCamera::new(Vec3::new(20.0, 12.0, 20.0), Vec3::ZERO, Vec3::Y, 45.0)
    }

    fn circles(list: &DrawList) -> Vec<(f32, Vec2, i32)> {
        list.items()
            .iter()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Circle(c) => Some((c.radius, c.center, item.key.z.0)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn model_at_target_draws_centered_disc() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_model(&Model::sphere(), Vec3::ZERO, 2.0, Color::WHITE);
        canvas.finish();

        let c = circles(&list);
        assert_eq!(c.len(), 1);
        let (radius, center, _) = c[0];
        assert!((center.x - 400.0).abs() < 1e-2 && (center.y - 225.0).abs() < 1e-2);

        let distance = camera().distance();
        let expected = 2.0 * 225.0 / ((22.5f32).to_radians().tan() * distance);
        assert!((radius - expected).abs() < 1e-2, "{radius} vs {expected}");
    }

    #[test]
    fn nearer_models_sort_on_top() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_model(&Model::sphere(), Vec3::new(5.0, 0.0, 5.0), 1.0, Color::WHITE);
        canvas.draw_model(&Model::sphere(), Vec3::new(-5.0, 0.0, -5.0), 1.0, Color::WHITE);
        canvas.finish();

        let c = circles(&list);
        assert!(c[0].2 > c[1].2);
    }

    #[test]
    fn translated_model_follows_transform() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        {
            let mut scope = canvas.scope();
            scope.translate(Vec3::new(0.0, 3.0, 0.0));
            scope.draw_model(&Model::sphere(), Vec3::ZERO, 0.5, Color::WHITE);
        }
        assert_eq!(canvas.transform().depth(), 0);
        let expected = camera().world_to_screen(Vec3::new(0.0, 3.0, 0.0), VIEW);
        canvas.finish();

        let (_, center, _) = circles(&list)[0];
        assert!(center.distance(expected) < 1e-2);
    }

    #[test]
    fn disc_is_shaded_from_texture_average() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut model = Model::sphere();
        model.set_diffuse(Texture::placeholder("missing"));
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_model(&model, Vec3::ZERO, 1.0, Color::WHITE);
        canvas.finish();

        let DrawCmd::Circle(c) = &list.items()[0].cmd else { panic!("expected circle") };
        let Paint::LinearGradient(g) = &c.paint else { panic!("expected gradient") };
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].color, Color::MAGENTA.shaded(0.35));
    }

    #[test]
    fn guide_circle_is_closed_ring_of_segments() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_circle_3d(Vec3::ZERO, 10.0, Vec3::X, 90.0, Color::GRAY);
        assert_eq!(canvas.transform().depth(), 0);
        canvas.finish();

        let lines: Vec<_> = list
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Line(l) => Some(l.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 36);
        assert!(lines[35].to.distance(lines[0].from) < 1e-3);
        assert!(list.items().iter().all(|i| i.key.z == ZIndex::GUIDE));

        // Rotated into the XZ plane: the ring passes through (0, 0, ±10).
        let near = camera().world_to_screen(Vec3::new(0.0, 0.0, 10.0), VIEW);
        assert!(lines.iter().any(|l| l.from.distance(near) < 1e-2));
    }

    #[test]
    fn guide_recorded_after_disc_paints_beneath_it() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_model(&Model::sphere(), Vec3::new(-5.0, 0.0, -5.0), 1.0, Color::WHITE);
        canvas.draw_circle_3d(Vec3::ZERO, 3.0, Vec3::X, 90.0, Color::GRAY);
        canvas.finish();

        let first = list.iter_in_paint_order().next().map(|i| &i.cmd);
        assert!(matches!(first, Some(DrawCmd::Line(_))));
        assert!(matches!(list.iter_in_paint_order().last().map(|i| &i.cmd), Some(DrawCmd::Circle(_))));
    }

    #[test]
    fn text_without_font_is_dropped() {
        let fonts = FontSystem::new();
        let mut list = DrawList::new();
        let mut canvas = Canvas::new(&mut list, &fonts, None, VIEW, camera());
        canvas.draw_text("Sun", 10.0, 10.0, 20.0, Color::WHITE);
        canvas.draw_fps(10.0, 10.0, 60);
        assert_eq!(canvas.measure_text("Sun", 20.0), 0.0);
        canvas.finish();
        assert!(list.is_empty());
    }
}
