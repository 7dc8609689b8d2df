//! Time subsystem.
//!
//! Provides frame timing utilities without coupling to the runtime:
//! - one `FrameClock` per window, `tick()` once per presented frame
//! - `FpsCounter` smooths frame times for on-screen display
//! - `FramePacer` computes the next redraw deadline for a target frame rate

mod fps;
mod frame_clock;
mod pacer;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::FramePacer;
