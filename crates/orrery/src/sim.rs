/// Global simulation tunables threaded through the render pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Simulation {
    /// Multiplier on every body's orbital angular speed.
    pub rotation_speed: f32,
}

impl Simulation {
    pub const DEFAULT_SPEED: f32 = 0.2;
    /// Change applied by one speed key press.
    pub const SPEED_STEP: f32 = 0.1;

    pub fn new(rotation_speed: f32) -> Self {
        Self { rotation_speed }
    }

    /// Degrees a body with `orbit_period` advances in one frame.
    ///
    /// The increment is per frame, not per second. Non-positive or non-finite
    /// periods do not advance.
    pub fn orbit_step(&self, orbit_period: f32) -> f32 {
        if !(orbit_period > 0.0 && orbit_period.is_finite()) {
            return 0.0;
        }
        self.rotation_speed * 360.0 / orbit_period
    }

    pub fn speed_up(&mut self) {
        self.rotation_speed += Self::SPEED_STEP;
    }

    /// Lowers the speed by one step. Negative speeds run orbits backwards.
    pub fn slow_down(&mut self) {
        self.rotation_speed -= Self::SPEED_STEP;
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_step_at_default_speed() {
        let step = Simulation::default().orbit_step(365.0);
        assert!((step - 0.2 * 360.0 / 365.0).abs() < 1e-6);
        assert!((step - 0.1973).abs() < 1e-4);
    }

    #[test]
    fn degenerate_periods_do_not_advance() {
        let sim = Simulation::default();
        assert_eq!(sim.orbit_step(0.0), 0.0);
        assert_eq!(sim.orbit_step(-5.0), 0.0);
        assert_eq!(sim.orbit_step(f32::NAN), 0.0);
        assert_eq!(sim.orbit_step(f32::INFINITY), 0.0);
    }

    #[test]
    fn speed_steps_and_may_go_negative() {
        let mut sim = Simulation::default();
        sim.speed_up();
        assert!((sim.rotation_speed - 0.3).abs() < 1e-6);
        for _ in 0..4 {
            sim.slow_down();
        }
        assert!((sim.rotation_speed + 0.1).abs() < 1e-6);
        assert!(sim.orbit_step(90.0) < 0.0);
    }
}
