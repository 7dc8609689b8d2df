use std::path::Path;

use crate::body::Body;
use crate::graph::{BodyId, SceneGraph};

/// Construction parameters of one body, in simulation units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodySpec {
    pub label: &'static str,
    pub radius: f32,
    pub orbit_radius: f32,
    pub orbit_period: f32,
    pub texture: &'static str,
}

const fn spec(radius: f32, orbit_radius: f32, orbit_period: f32, label: &'static str, texture: &'static str) -> BodySpec {
    BodySpec { label, radius, orbit_radius, orbit_period, texture }
}

pub const SUN: BodySpec = spec(0.2, 0.0, 0.0, "sun", "2k_sun");
pub const MOON: BodySpec = spec(0.02, 0.200, 24.0, "moon", "2k_moon");

/// Planets circling the sun, innermost first.
pub const INNER_PLANETS: [BodySpec; 4] = [
    spec(0.05, 0.396, 90.0, "mercury", "2k_mercury"),
    spec(0.05, 0.723, 210.0, "venus", "2k_venus_atmosphere"),
    spec(0.05, 1.000, 365.0, "earth", "2k_earth_daymap"),
    spec(0.05, 1.523, 690.0, "mars", "2k_mars"),
];

/// Built every run; attached to the sun only on request.
pub const OUTER_PLANETS: [BodySpec; 5] = [
    spec(0.05, 5.200, 4260.0, "jupiter", "2k_jupiter"),
    spec(0.05, 9.532, 10620.0, "saturn", "2k_saturn"),
    spec(0.05, 19.180, 30270.0, "uranus", "2k_uranus"),
    spec(0.05, 30.056, 59370.0, "neptune", "2k_neptune"),
    spec(0.05, 39.463, 89310.0, "pluto", "2k_eris_fictional"),
];

/// The populated scene graph and its traversal root.
#[derive(Debug)]
pub struct SolarSystem {
    pub graph: SceneGraph,
    pub root: BodyId,
}

impl SolarSystem {
    /// Loads every body from `assets` and links sun, planets and moon.
    ///
    /// With `outer_planets` the gas giants and pluto orbit the sun as well;
    /// otherwise they stay detached and are never drawn.
    pub fn build(assets: &Path, outer_planets: bool) -> Self {
        let mut graph = SceneGraph::new();
        let mut add = |s: &BodySpec| {
            graph.insert(Body::create(s.radius, s.orbit_radius, s.orbit_period, s.label, s.texture, assets))
        };

        let sun = add(&SUN);
        let moon = add(&MOON);
        let inner: Vec<BodyId> = INNER_PLANETS.iter().map(&mut add).collect();
        let outer: Vec<BodyId> = OUTER_PLANETS.iter().map(&mut add).collect();

        for &planet in &inner {
            graph.add_child(sun, planet);
        }
        if outer_planets {
            for &planet in &outer {
                graph.add_child(sun, planet);
            }
        }

        if let Some(earth) = graph.find("earth") {
            graph.add_child(earth, moon);
        }

        log::info!(
            "solar system ready: {} bodies, {} orbiting the sun",
            graph.len(),
            graph.children_count(sun)
        );

        Self { graph, root: sun }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::SCALE;

    fn labels(sys: &SolarSystem, id: BodyId) -> Vec<&str> {
        sys.graph
            .children(id)
            .iter()
            .map(|&c| sys.graph.get(c).unwrap().label())
            .collect()
    }

    #[test]
    fn default_topology_has_inner_planets_and_moon() {
        let sys = SolarSystem::build(Path::new("no/such/dir"), false);
        assert_eq!(sys.graph.len(), 11);
        assert_eq!(labels(&sys, sys.root), ["mercury", "venus", "earth", "mars"]);

        let earth = sys.graph.find("earth").unwrap();
        assert_eq!(labels(&sys, earth), ["moon"]);

        let pluto = sys.graph.find("pluto").unwrap();
        assert_eq!(sys.graph.parent(pluto), None);
    }

    #[test]
    fn outer_planets_attach_after_inner() {
        let sys = SolarSystem::build(Path::new("no/such/dir"), true);
        assert_eq!(
            labels(&sys, sys.root),
            ["mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune", "pluto"]
        );
    }

    #[test]
    fn bodies_use_scaled_geometry() {
        let sys = SolarSystem::build(Path::new("no/such/dir"), false);
        let sun = sys.graph.get(sys.root).unwrap();
        assert_eq!(sun.label(), "sun");
        assert_eq!(sun.orbit_radius, 0.0);
        assert!((sun.radius - 0.2 * SCALE).abs() < 1e-6);

        let moon = sys.graph.get(sys.graph.find("moon").unwrap()).unwrap();
        assert!((moon.orbit_radius - 2.0).abs() < 1e-6);
        assert_eq!(moon.orbit_period, 24.0);
        assert_eq!(moon.model.diffuse().map(|t| t.name()), Some("2k_moon"));
    }
}
