use std::path::Path;

use orrery_engine::assets::{Model, Texture};
use orrery_engine::coords::Vec2;

use crate::graph::BodyId;

/// Render-space units per simulation unit, applied to radii and orbit radii.
pub const SCALE: f32 = 10.0;

/// One celestial object in the scene graph.
#[derive(Debug, Clone)]
pub struct Body {
    label: String,

    /// Display radius in render units.
    pub radius: f32,
    /// Distance from the parent's local origin, in render units.
    pub orbit_radius: f32,
    /// Time units per revolution. Zero marks a body that never orbits.
    pub orbit_period: f32,
    /// Stored with the body; nothing spins the model yet.
    pub rotation_period: f32,

    pub model: Model,

    /// Orbit angle in degrees. Accumulates without wrapping.
    pub orbit_position: f32,
    pub rotation_position: f32,

    /// Screen anchor cached by the last render pass.
    pub label_position: Vec2,

    pub(crate) children: Vec<BodyId>,
    pub(crate) parent: Option<BodyId>,
}

impl Body {
    /// Builds a body from render-space values and an already loaded model.
    pub fn new(label: impl Into<String>, radius: f32, orbit_radius: f32, orbit_period: f32, model: Model) -> Self {
        Self {
            label: label.into(),
            radius,
            orbit_radius,
            orbit_period,
            rotation_period: 0.0,
            model,
            orbit_position: 0.0,
            rotation_position: 0.0,
            label_position: Vec2::zero(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Builds a body from simulation units, loading its assets from `assets`.
    ///
    /// Reads `solar_system/sphere.obj` and `solar_system/<texture_name>.png`
    /// under `assets`. Each body loads its own copy of the sphere. Missing or
    /// broken files are replaced by placeholders.
    pub fn create(
        radius: f32,
        orbit_radius: f32,
        orbit_period: f32,
        label: &str,
        texture_name: &str,
        assets: &Path,
    ) -> Self {
        let dir = assets.join("solar_system");

        let mut texture = Texture::load_or_placeholder(dir.join(format!("{texture_name}.png")));
        texture.generate_mipmaps();

        let mut model = Model::load_or_sphere(dir.join("sphere.obj"));
        model.set_diffuse(texture);

        Self::new(label, radius * SCALE, orbit_radius * SCALE, orbit_period, model)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
