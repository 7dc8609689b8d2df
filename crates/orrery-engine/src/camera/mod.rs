//! 3D cameras.

mod free;

pub use free::{FreeCamera, Projected};
