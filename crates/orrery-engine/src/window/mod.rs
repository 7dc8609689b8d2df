//! The winit event loop driving one window.
//!
//! [`Runtime::run`] opens the window, builds its GPU context, paces redraws to
//! the configured frame rate and forwards input and frames to a `core::App`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
