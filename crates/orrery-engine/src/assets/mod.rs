//! CPU-side asset loading.
//!
//! Textures and models are decoded once at start-up and handed to the canvas,
//! which only needs their summary data (average color, bounding radius).
//! Loading is fallible through [`AssetError`]; callers that prefer to keep
//! running use the `*_or_placeholder` helpers, which log and substitute.

mod error;
mod model;
mod texture;

pub use error::AssetError;
pub use model::{Material, Model};
pub use texture::Texture;
