//! wgpu device and swapchain for a single window.
//!
//! [`Gpu`] owns the surface configuration and hands out one [`GpuFrame`] per
//! redraw; surface failures are classified into a [`SurfaceErrorAction`].

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
