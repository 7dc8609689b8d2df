//! Per-frame walks over the scene graph.
//!
//! `render_body` advances orbits and draws the tree parent-first; `render_labels`
//! then draws each body's cached label in the same order.

use glam::Vec3;
use orrery_engine::camera::FreeCamera;
use orrery_engine::gfx::Canvas3d;
use orrery_engine::paint::Color;

use crate::graph::{BodyId, SceneGraph};
use crate::sim::Simulation;

pub const LABEL_FONT_SIZE: f32 = 20.0;

/// Draws `id` at the current local origin, then advances, positions and
/// draws each child followed by its orbit guide.
///
/// Every child is drawn inside its own transform scope, so the canvas is back
/// at `id`'s frame before the guide circle is drawn.
pub fn render_body<C: Canvas3d>(
    graph: &mut SceneGraph,
    id: BodyId,
    canvas: &mut C,
    camera: &FreeCamera,
    sim: &Simulation,
) {
    let Some(body) = graph.get_mut(id) else {
        log::warn!("render of unknown body {id}");
        return;
    };

    canvas.draw_model(&body.model, Vec3::ZERO, body.radius, Color::WHITE);

    // World-space projection: the anchor ignores the transforms applied above.
    body.label_position =
        canvas.world_to_screen(Vec3::new(body.orbit_radius, body.radius, 0.0), camera);

    for index in 0..graph.children_count(id) {
        let child = graph.children(id)[index];
        let Some(c) = graph.get_mut(child) else {
            continue;
        };
        c.orbit_position += sim.orbit_step(c.orbit_period);
        let (angle, orbit_radius) = (c.orbit_position, c.orbit_radius);

        {
            let mut scope = canvas.scope();
            scope.rotate(Vec3::Y, angle);
            scope.translate(Vec3::new(orbit_radius, 0.0, 0.0));
            scope.rotate(Vec3::Y, -angle);

            render_body(graph, child, &mut *scope, camera, sim);
        }

        canvas.draw_circle_3d(Vec3::ZERO, orbit_radius, Vec3::X, 90.0, Color::GRAY);
    }
}

/// Draws the label of `id` and its descendants, centered on the anchors
/// cached by the last [`render_body`].
pub fn render_labels<C: Canvas3d>(graph: &SceneGraph, id: BodyId, canvas: &mut C) {
    let Some(body) = graph.get(id) else {
        return;
    };

    let half_width = canvas.measure_text(body.label(), LABEL_FONT_SIZE) / 2.0;
    canvas.draw_text(
        body.label(),
        body.label_position.x - half_width,
        body.label_position.y,
        LABEL_FONT_SIZE,
        Color::WHITE,
    );

    for &child in graph.children(id) {
        render_labels(graph, child, canvas);
    }
}
