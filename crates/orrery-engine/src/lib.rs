//! Orrery engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the immediate-mode 3D
//! canvas used by the solar system program.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;

pub mod assets;
pub mod camera;
pub mod gfx;
