use std::path::Path;

use super::{AssetError, Texture};

/// Surface description bound to a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    /// Diffuse map; `None` renders with the tint alone.
    pub diffuse: Option<Texture>,
}

/// Mesh summary used by the canvas.
///
/// Only the bounding radius around the model origin matters for drawing; the
/// vertex count is kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    vertex_count: usize,
    bound_radius: f32,
    pub material: Material,
}

impl Model {
    /// Segments used by the generated placeholder sphere.
    const SPHERE_RINGS: usize = 16;
    const SPHERE_SLICES: usize = 16;

    /// Reads the vertex positions of a Wavefront OBJ file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|source| AssetError::Io { path: path.to_path_buf(), source })?;

        let mut vertex_count = 0usize;
        let mut bound_sq = 0.0f32;

        for (index, line) in source.lines().enumerate() {
            let mut parts = line.split_whitespace();
            if parts.next() != Some("v") {
                continue;
            }

            let mut coord = || -> Result<f32, AssetError> {
                parts
                    .next()
                    .and_then(|p| p.parse::<f32>().ok())
                    .ok_or_else(|| AssetError::MalformedVertex { path: path.to_path_buf(), line: index + 1 })
            };
            let (x, y, z) = (coord()?, coord()?, coord()?);

            bound_sq = bound_sq.max(x * x + y * y + z * z);
            vertex_count += 1;
        }

        if vertex_count == 0 {
            return Err(AssetError::EmptyModel { path: path.to_path_buf() });
        }

        log::debug!("model {} loaded: {vertex_count} vertices", path.display());

        Ok(Self {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            vertex_count,
            bound_radius: bound_sq.sqrt(),
            material: Material::default(),
        })
    }

    /// Unit sphere generated in place of a model that failed to load.
    pub fn sphere() -> Self {
        Self {
            name: "sphere".to_string(),
            vertex_count: (Self::SPHERE_RINGS + 1) * (Self::SPHERE_SLICES + 1),
            bound_radius: 1.0,
            material: Material::default(),
        }
    }

    /// Loads `path`, falling back to [`Model::sphere`] with a warning.
    pub fn load_or_sphere(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using generated sphere");
            Self::sphere()
        })
    }

    /// Binds `texture` to the diffuse slot of the model's material.
    pub fn set_diffuse(&mut self, texture: Texture) {
        self.material.diffuse = Some(texture);
    }

    pub fn diffuse(&self) -> Option<&Texture> {
        self.material.diffuse.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Largest distance of any vertex from the model origin.
    pub fn bound_radius(&self) -> f32 {
        self.bound_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_obj(name: &str, body: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("orrery-obj-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn bound_radius_is_farthest_vertex() {
        let path = write_obj(
            "tri.obj",
            "# comment\nv 1 0 0\nv 0 2 0\nvn 0 0 9\nv 0 0 -0.5\nf 1 2 3\n",
        );
        let model = Model::load(&path).unwrap();
        assert_eq!(model.name(), "tri");
        assert_eq!(model.vertex_count(), 3);
        assert!((model.bound_radius() - 2.0).abs() < 1e-6);
        assert!(model.diffuse().is_none());
    }

    #[test]
    fn malformed_vertex_reports_line() {
        let path = write_obj("bad.obj", "v 1 0 0\nv 1 nope 0\n");
        match Model::load(&path) {
            Err(AssetError::MalformedVertex { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn model_without_vertices_is_rejected() {
        let path = write_obj("empty.obj", "# nothing\n");
        assert!(matches!(Model::load(&path), Err(AssetError::EmptyModel { .. })));
    }

    #[test]
    fn missing_model_becomes_unit_sphere() {
        let mut model = Model::load_or_sphere("definitely/not/here/sphere.obj");
        assert_eq!(model, Model::sphere());
        model.set_diffuse(Texture::placeholder("2k_moon"));
        assert_eq!(model.diffuse().map(Texture::name), Some("2k_moon"));
        assert_eq!(model.bound_radius(), 1.0);
    }
}
