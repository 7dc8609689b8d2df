/// Frames-per-second estimate over a sliding window of frame deltas.
///
/// The displayed value only refreshes once per `window` seconds so the HUD
/// stays readable.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    accum: f32,
    frames: u32,
    current: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(0.5)
    }

    pub fn with_window(window: f32) -> Self {
        Self { window: window.max(f32::EPSILON), accum: 0.0, frames: 0, current: 0 }
    }

    /// Records one frame of `dt` seconds.
    pub fn record(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.accum += dt;
        self.frames += 1;
        if self.accum >= self.window {
            self.current = (self.frames as f32 / self.accum).round() as u32;
            self.accum = 0.0;
            self.frames = 0;
        }
    }

    /// Last published estimate; zero until the first window completes.
    pub fn fps(&self) -> u32 {
        self.current
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_sixty_hz_reports_sixty() {
        let mut fps = FpsCounter::with_window(0.5);
        for _ in 0..60 {
            fps.record(1.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }

    #[test]
    fn nothing_published_before_first_window() {
        let mut fps = FpsCounter::with_window(1.0);
        fps.record(0.1);
        assert_eq!(fps.fps(), 0);
    }

    #[test]
    fn invalid_deltas_are_ignored() {
        let mut fps = FpsCounter::with_window(0.1);
        fps.record(f32::NAN);
        fps.record(-1.0);
        assert_eq!(fps.frames, 0);
    }
}
