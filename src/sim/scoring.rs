//! Score and difficulty progression
//!
//! Score is distance based. Crossing into a new score tier raises forward speed
//! by one step, up to the cap.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    /// Best score, retained across resets
    pub high_score: u64,
    /// Tier reached by the previous update
    tier: u64,
}

impl Scoreboard {
    pub fn with_high_score(high_score: u64) -> Self {
        Self {
            high_score,
            ..Default::default()
        }
    }

    pub fn tier(&self) -> u64 {
        self.tier
    }

    /// Recompute the score from the player's x
    ///
    /// Returns the new forward speed when a tier crossing raised it.
    pub fn update(&mut self, player_x: f32, speed: &mut f32, tuning: &Tuning) -> Option<f32> {
        self.score = (player_x / tuning.distance_unit).floor().max(0.0) as u64;

        let tier = self.score / tuning.tier_size.max(1);
        if tier <= self.tier {
            return None;
        }
        self.tier = tier;
        if *speed < tuning.max_speed {
            *speed = (*speed + tuning.speed_step).min(tuning.max_speed);
            Some(*speed)
        } else {
            None
        }
    }

    /// Close out the run: fold the score into the high score, then zero it
    ///
    /// Returns the new high score if this run beat it.
    pub fn finalize(&mut self) -> Option<u64> {
        let beaten = self.score > self.high_score;
        if beaten {
            self.high_score = self.score;
        }
        self.reset_run();
        beaten.then_some(self.high_score)
    }

    pub fn reset_run(&mut self) {
        self.score = 0;
        self.tier = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_from_distance() {
        let tuning = Tuning::default();
        let mut board = Scoreboard::default();
        let mut speed = 5.0;
        board.update(3109.9, &mut speed, &tuning);
        assert_eq!(board.score, 310);
    }

    #[test]
    fn test_single_tier_crossing_over_600_ticks() {
        let tuning = Tuning::default();
        let mut board = Scoreboard::default();
        let mut speed = 5.0;
        let mut raises = 0;
        for t in 1..=600 {
            let x = 100.0 + 5.0 * t as f32;
            if board.update(x, &mut speed, &tuning).is_some() {
                raises += 1;
            }
        }
        assert_eq!(board.score, 310);
        assert_eq!(raises, 1);
        assert_eq!(speed, 6.0);
        assert_eq!(board.tier(), 1);
    }

    #[test]
    fn test_speed_capped() {
        let tuning = Tuning::default();
        let mut board = Scoreboard::default();
        let mut speed = 9.5;
        assert_eq!(board.update(3000.0, &mut speed, &tuning), Some(10.0));
        assert_eq!(board.update(6000.0, &mut speed, &tuning), None);
        assert_eq!(speed, 10.0);
    }

    #[test]
    fn test_finalize_keeps_best() {
        let tuning = Tuning::default();
        let mut board = Scoreboard::with_high_score(50);
        let mut speed = 5.0;

        board.update(300.0, &mut speed, &tuning);
        assert_eq!(board.finalize(), None);
        assert_eq!(board.high_score, 50);
        assert_eq!(board.score, 0);

        board.update(1234.0, &mut speed, &tuning);
        assert_eq!(board.finalize(), Some(123));
        assert_eq!(board.high_score, 123);
        assert_eq!(board.tier(), 0);
    }

    proptest! {
        #[test]
        fn prop_high_score_is_running_max(runs in prop::collection::vec(0.0f32..50_000.0, 1..20)) {
            let tuning = Tuning::default();
            let mut board = Scoreboard::default();
            for x in runs {
                let before = board.high_score;
                let mut speed = tuning.start_speed;
                board.update(x, &mut speed, &tuning);
                let at_death = board.score;
                board.finalize();
                prop_assert_eq!(board.high_score, before.max(at_death));
            }
        }

        #[test]
        fn prop_speed_never_decreases(xs in prop::collection::vec(0.0f32..500.0, 1..200)) {
            let tuning = Tuning::default();
            let mut board = Scoreboard::default();
            let mut speed = tuning.start_speed;
            let mut x = 0.0f32;
            for dx in xs {
                x += dx;
                let before = speed;
                board.update(x, &mut speed, &tuning);
                prop_assert!(speed >= before);
                prop_assert!(speed <= tuning.max_speed);
            }
        }
    }
}
