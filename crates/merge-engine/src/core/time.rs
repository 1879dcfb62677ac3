/// Maximum fixed steps run for a single frame; extra time is discarded.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
/// Physics and gameplay advance in equal steps regardless of frame time.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// Negative or NaN frame times count as zero.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if self.dt <= 0.0 {
            return 0;
        }
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        // Cap to prevent a spiral of death after a long stall (tab in background).
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        if self.dt <= 0.0 {
            0.0
        } else {
            self.accumulator / self.dt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
        assert_eq!(ts.accumulate(0.0), 0);
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(-5.0), 0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn leftover_becomes_alpha() {
        let mut ts = FixedTimestep::new(0.5);
        assert_eq!(ts.accumulate(1.2), 2);
        let a = ts.alpha();
        assert!(a >= 0.0 && a <= 1.0, "alpha was {}", a);
    }
}
