use glam::{Mat4, Vec3};

/// Model transform stack.
///
/// Operations compose onto the current matrix in local space: after
/// `translate(a)` then `rotate(..)`, the rotation happens about the translated
/// origin.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self { current: Mat4::IDENTITY, saved: Vec::new() }
    }

    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Number of saved matrices.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the last pushed matrix. Returns `false` on underflow, leaving
    /// the current matrix untouched.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(m) => {
                self.current = m;
                true
            }
            None => {
                log::warn!("transform stack underflow");
                false
            }
        }
    }

    /// Rotates by `degrees` about `axis`. A zero axis is ignored.
    pub fn rotate(&mut self, axis: Vec3, degrees: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.current *= Mat4::from_axis_angle(axis, degrees.to_radians());
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.current *= Mat4::from_translation(offset);
    }

    /// Maps a point from the current local frame to world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.current.transform_point3(point)
    }

    /// Uniform scale carried by the current matrix.
    pub fn scale(&self) -> f32 {
        self.current.x_axis.truncate().length()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn orbit_composition_places_child_on_circle() {
        let mut t = TransformStack::new();
        t.rotate(Vec3::Y, 90.0);
        t.translate(Vec3::new(10.0, 0.0, 0.0));
        t.rotate(Vec3::Y, -90.0);

        // +90 about Y takes +X to -Z.
        assert!(approx(t.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -10.0)));
        // Counter-rotation keeps the local axes aligned with the parent's.
        assert!(approx(t.transform_point(Vec3::X) - t.transform_point(Vec3::ZERO), Vec3::X));
    }

    #[test]
    fn pop_restores_pushed_matrix() {
        let mut t = TransformStack::new();
        t.translate(Vec3::new(1.0, 2.0, 3.0));
        t.push();
        t.rotate(Vec3::Z, 45.0);
        t.translate(Vec3::X);
        assert_eq!(t.depth(), 1);
        assert!(t.pop());
        assert_eq!(t.depth(), 0);
        assert!(approx(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn underflow_is_reported_and_harmless() {
        let mut t = TransformStack::new();
        t.translate(Vec3::X);
        assert!(!t.pop());
        assert!(approx(t.transform_point(Vec3::ZERO), Vec3::X));
    }

    #[test]
    fn zero_axis_rotation_is_ignored() {
        let mut t = TransformStack::new();
        t.rotate(Vec3::ZERO, 30.0);
        assert_eq!(t.current(), Mat4::IDENTITY);
        assert!((t.scale() - 1.0).abs() < 1e-6);
    }
}
