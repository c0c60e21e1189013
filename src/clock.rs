//! Frame callback to simulation tick stepping
//!
//! The host calls [`Stepper::frame`] from its frame callback and runs that many
//! ticks. Per-frame stepping ties game speed to the display refresh rate; the
//! fixed-rate mode decouples them with an accumulator.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum StepMode {
    /// Exactly one tick per frame callback
    #[default]
    PerFrame,
    /// Ticks at `hz` regardless of frame rate
    FixedRate { hz: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stepper {
    mode: StepMode,
    accumulator_ms: f64,
    last_time_ms: Option<f64>,
}

impl Default for Stepper {
    fn default() -> Self {
        Self {
            mode: StepMode::PerFrame,
            accumulator_ms: 0.0,
            last_time_ms: None,
        }
    }
}

impl Stepper {
    pub fn new(mode: StepMode) -> Result<Self, ConfigError> {
        if let StepMode::FixedRate { hz } = mode {
            if !(hz.is_finite() && hz > 0.0) {
                return Err(ConfigError::NonPositive {
                    name: "tick rate",
                    value: hz as f32,
                });
            }
        }
        Ok(Self {
            mode,
            ..Default::default()
        })
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Ticks to run for a frame callback at `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let hz = match self.mode {
            StepMode::PerFrame => return 1,
            StepMode::FixedRate { hz } => hz,
        };
        let step_ms = 1000.0 / hz;

        // First frame runs a single step
        let dt = match self.last_time_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => step_ms,
        };
        self.last_time_ms = Some(now_ms);
        self.accumulator_ms += dt;

        let mut substeps = 0;
        while self.accumulator_ms >= step_ms && substeps < MAX_SUBSTEPS {
            self.accumulator_ms -= step_ms;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than catch up next frame
            self.accumulator_ms = self.accumulator_ms.min(step_ms);
        }
        substeps
    }

    /// Forget accumulated time (after a pause in frame callbacks)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
        self.last_time_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_frame_is_one_tick() {
        let mut stepper = Stepper::default();
        assert_eq!(stepper.frame(0.0), 1);
        assert_eq!(stepper.frame(5.0), 1);
        assert_eq!(stepper.frame(500.0), 1);
    }

    #[test]
    fn test_fixed_rate_accumulates() {
        let mut stepper = Stepper::new(StepMode::FixedRate { hz: 50.0 }).unwrap();
        assert_eq!(stepper.frame(1000.0), 1);
        // Half a step: nothing yet
        assert_eq!(stepper.frame(1010.0), 0);
        assert_eq!(stepper.frame(1020.0), 1);
        assert_eq!(stepper.frame(1060.0), 2);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut stepper = Stepper::new(StepMode::FixedRate { hz: 100.0 }).unwrap();
        stepper.frame(0.0);
        // A 5 s stall counts as 100 ms, capped at the substep limit
        assert_eq!(stepper.frame(5000.0), MAX_SUBSTEPS);
        assert!(stepper.frame(5000.0) <= 1);
    }

    #[test]
    fn test_backwards_time_is_ignored() {
        let mut stepper = Stepper::new(StepMode::FixedRate { hz: 60.0 }).unwrap();
        stepper.frame(100.0);
        assert_eq!(stepper.frame(50.0), 0);
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert!(Stepper::new(StepMode::FixedRate { hz: 0.0 }).is_err());
        assert!(Stepper::new(StepMode::FixedRate { hz: f64::NAN }).is_err());
    }
}
