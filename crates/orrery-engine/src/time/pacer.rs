use std::time::{Duration, Instant};

/// Redraw deadline computation for a target frame rate.
///
/// The runtime asks for the next deadline after each presented frame and
/// sleeps the event loop until then. A target of `0` disables pacing.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next: Option<Instant>,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        let interval = (target_fps > 0).then(|| Duration::from_nanos(1_000_000_000 / target_fps as u64));
        Self { interval, next: None }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Marks a frame as presented at `now` and returns the next redraw deadline.
    ///
    /// Deadlines advance on a fixed grid; if the loop fell behind by more than a
    /// frame, the grid restarts from `now` instead of bursting to catch up.
    pub fn frame_presented(&mut self, now: Instant) -> Option<Instant> {
        let interval = self.interval?;
        let next = match self.next {
            Some(prev) if prev + interval > now => prev + interval,
            _ => now + interval,
        };
        self.next = Some(next);
        Some(next)
    }

    /// Deadline handed out by the last `frame_presented` call.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// True when a redraw is due at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.next.is_none_or(|next| now >= next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_target_disables_pacing() {
        let mut pacer = FramePacer::new(0);
        assert!(pacer.interval().is_none());
        assert!(pacer.frame_presented(Instant::now()).is_none());
        assert!(pacer.is_due(Instant::now()));
    }

    #[test]
    fn deadlines_follow_fixed_grid() {
        let mut pacer = FramePacer::new(50);
        let t0 = Instant::now();
        let d1 = pacer.frame_presented(t0).unwrap();
        assert_eq!(d1, t0 + Duration::from_millis(20));
        assert!(!pacer.is_due(t0 + Duration::from_millis(10)));
        assert!(pacer.is_due(d1));

        let d2 = pacer.frame_presented(t0 + Duration::from_millis(21)).unwrap();
        assert_eq!(d2, t0 + Duration::from_millis(40));

        let d3 = pacer.frame_presented(t0 + Duration::from_millis(100)).unwrap();
        assert_eq!(d3, t0 + Duration::from_millis(120));
    }

    #[test]
    fn early_frame_keeps_grid() {
        let mut pacer = FramePacer::new(50);
        let t0 = Instant::now();
        let d1 = pacer.frame_presented(t0).unwrap();
        let d2 = pacer.frame_presented(t0 + Duration::from_millis(5)).unwrap();
        assert_eq!(d2, d1 + Duration::from_millis(20));
    }
}
