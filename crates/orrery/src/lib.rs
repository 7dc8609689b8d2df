//! Hierarchical solar system viewer.
//!
//! Bodies live in a [`graph::SceneGraph`]; each frame [`traverse::render_body`]
//! advances their orbits and draws them through a `Canvas3d`, and
//! [`traverse::render_labels`] names them on screen.

pub mod app;
pub mod body;
pub mod cli;
pub mod graph;
pub mod sim;
pub mod system;
pub mod traverse;

pub use body::Body;
pub use graph::{BodyId, SceneGraph, MAX_BODY_CHILDREN};
pub use sim::Simulation;
