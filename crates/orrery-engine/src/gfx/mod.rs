//! Immediate-mode 3D canvas.
//!
//! `Canvas3d` is the drawing surface the scene code talks to. `Canvas` is the
//! engine implementation: it keeps a transform stack, projects through a
//! `FreeCamera`, and lowers every call into 2D commands on a `DrawList`.

mod canvas;
mod transform;

pub use canvas::{Canvas, Canvas3d, TransformScope};
pub use transform::TransformStack;
