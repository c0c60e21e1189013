//! Data-driven game balance
//!
//! `Tuning` carries every gameplay constant. Defaults reproduce the classic
//! runner (player at x=100, speed 5, +1 speed every 300 points up to 10).
//! Sizes that depend on the display are derived once per session into
//! [`WorldParams`] and never re-derived mid-run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the terrain generator lays out walkable ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainStyle {
    /// Continuous ground with obstacles standing on it
    #[default]
    Flat,
    /// Floating platforms separated by gaps
    Platforms,
}

/// Inclusive `[min, max]` range for uniform draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanRange {
    pub min: f32,
    pub max: f32,
}

impl SpanRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min <= self.max;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Relative odds for the obstacle placed in each generated slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleWeights {
    pub hazard: u32,
    pub solid_block: u32,
    pub overhead_block: u32,
    /// Slot left empty
    pub none: u32,
}

impl Default for ObstacleWeights {
    fn default() -> Self {
        Self {
            hazard: 30,
            solid_block: 30,
            overhead_block: 10,
            none: 30,
        }
    }
}

impl ObstacleWeights {
    pub fn total(&self) -> u64 {
        [self.hazard, self.solid_block, self.overhead_block, self.none]
            .iter()
            .map(|&w| u64::from(w))
            .sum()
    }

    /// Only empty slots (obstacle-free course)
    pub fn clear_course() -> Self {
        Self {
            hazard: 0,
            solid_block: 0,
            overhead_block: 0,
            none: 1,
        }
    }
}

/// Platform-style generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub gap: SpanRange,
    pub width: SpanRange,
    /// Highest allowed platform top, as a fraction of view height
    pub band_top_ratio: f32,
    /// Fraction of the jump apex used as the vertical window, in `(0, 1)`
    pub reach_factor: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            gap: SpanRange::new(60.0, 160.0),
            width: SpanRange::new(160.0, 360.0),
            band_top_ratio: 0.35,
            reach_factor: 0.75,
        }
    }
}

/// Gameplay constants, loadable from JSON (missing fields use defaults)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub style: TerrainStyle,

    // === Player ===
    pub start_x: f32,
    /// Height above the ground the player respawns at
    pub spawn_drop: f32,
    pub start_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub lateral_control: bool,
    pub lateral_speed: f32,

    // === Scoring ===
    /// World units per score point
    pub distance_unit: f32,
    /// Score points per difficulty tier
    pub tier_size: u64,

    // === Generation ===
    pub obstacle_gap: SpanRange,
    pub obstacle_width: SpanRange,
    pub weights: ObstacleWeights,
    pub platforms: PlatformTuning,
    /// Obstacle-free ground laid at every reset, `[0, safe_start)`
    pub safe_start: f32,
    /// Distance behind the camera before entities are pruned
    pub prune_margin: f32,

    // === Sizing (fractions of the smaller viewport dimension) ===
    pub player_size_ratio: f32,
    pub ground_height_ratio: f32,
    pub jump_ratio: f32,
    pub gravity_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            style: TerrainStyle::Flat,

            start_x: 100.0,
            spawn_drop: 100.0,
            start_speed: 5.0,
            speed_step: 1.0,
            max_speed: 10.0,
            lateral_control: false,
            lateral_speed: 2.0,

            distance_unit: 10.0,
            tier_size: 300,

            obstacle_gap: SpanRange::new(200.0, 500.0),
            obstacle_width: SpanRange::new(30.0, 80.0),
            weights: ObstacleWeights::default(),
            platforms: PlatformTuning::default(),
            safe_start: 400.0,
            prune_margin: 50.0,

            player_size_ratio: 0.1,
            ground_height_ratio: 0.12,
            jump_ratio: 0.035,
            gravity_ratio: 0.0015,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

impl Tuning {
    /// Parse and validate tuning overrides
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every viewport-independent constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("start_speed", self.start_speed)?;
        positive("speed_step", self.speed_step)?;
        positive("max_speed", self.max_speed)?;
        positive("distance_unit", self.distance_unit)?;
        positive("tier_size", self.tier_size as f32)?;
        positive("safe_start", self.safe_start)?;
        positive("player_size_ratio", self.player_size_ratio)?;
        positive("ground_height_ratio", self.ground_height_ratio)?;
        positive("jump_ratio", self.jump_ratio)?;
        positive("gravity_ratio", self.gravity_ratio)?;
        if self.lateral_control {
            positive("lateral_speed", self.lateral_speed)?;
        }
        if !(self.start_x.is_finite() && self.start_x >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "start_x",
                value: self.start_x,
            });
        }
        if !(self.spawn_drop.is_finite() && self.spawn_drop >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "spawn_drop",
                value: self.spawn_drop,
            });
        }
        if !(self.prune_margin.is_finite() && self.prune_margin >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "prune_margin",
                value: self.prune_margin,
            });
        }
        if self.start_speed > self.max_speed {
            return Err(ConfigError::SpeedAboveCap {
                start: self.start_speed,
                max: self.max_speed,
            });
        }

        self.obstacle_gap.validate("obstacle gap")?;
        self.obstacle_width.validate("obstacle width")?;
        if self.weights.total() == 0 {
            return Err(ConfigError::NoObstacleWeight);
        }

        if self.style == TerrainStyle::Platforms {
            self.platforms.gap.validate("platform gap")?;
            self.platforms.width.validate("platform width")?;
            let p = &self.platforms;
            if !(p.band_top_ratio > 0.0 && p.band_top_ratio < 1.0) {
                return Err(ConfigError::NonPositive {
                    name: "band_top_ratio",
                    value: p.band_top_ratio,
                });
            }
            if !(p.reach_factor > 0.0 && p.reach_factor < 1.0) {
                return Err(ConfigError::NonPositive {
                    name: "reach_factor",
                    value: p.reach_factor,
                });
            }
        }
        Ok(())
    }
}

/// Display dimensions supplied by the host at session construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Sizes and forces fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    pub view_width: f32,
    pub view_height: f32,
    pub player_size: f32,
    pub ground_height: f32,
    /// Top of the flat ground
    pub ground_y: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub obstacle_height: f32,
    /// A player whose top passes this y has fallen out of the world
    pub world_floor: f32,
}

impl WorldParams {
    /// Derive session sizes from the viewport and validate the combination
    pub fn derive(viewport: Viewport, tuning: &Tuning) -> Result<Self, ConfigError> {
        let valid = viewport.width.is_finite()
            && viewport.height.is_finite()
            && viewport.width > 0.0
            && viewport.height > 0.0;
        if !valid {
            return Err(ConfigError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        tuning.validate()?;

        let d = viewport.width.min(viewport.height);
        let player_size = d * tuning.player_size_ratio;
        let ground_height = d * tuning.ground_height_ratio;
        let world = Self {
            view_width: viewport.width,
            view_height: viewport.height,
            player_size,
            ground_height,
            ground_y: viewport.height - ground_height,
            gravity: d * tuning.gravity_ratio,
            jump_impulse: d * tuning.jump_ratio,
            obstacle_height: player_size,
            world_floor: viewport.height,
        };

        let spawn_edge = tuning.start_x + player_size;
        if tuning.safe_start <= spawn_edge {
            return Err(ConfigError::UnsafeStart {
                safe_start: tuning.safe_start,
                spawn_edge,
            });
        }

        if tuning.style == TerrainStyle::Platforms {
            let band_top = viewport.height * tuning.platforms.band_top_ratio;
            if band_top >= world.ground_y {
                return Err(ConfigError::InvalidRange {
                    name: "platform band",
                    min: band_top,
                    max: world.ground_y,
                });
            }
            let reach = world.jump_reach(tuning.start_speed, tuning.platforms.reach_factor);
            if tuning.platforms.gap.max > reach {
                return Err(ConfigError::UnreachableGap {
                    max_gap: tuning.platforms.gap.max,
                    reach,
                });
            }
        }

        Ok(world)
    }

    /// Height gained `n` ticks into a jump from rest
    ///
    /// Each tick adds gravity before moving, so the rise is
    /// `n·v - g·n(n+1)/2`.
    fn rise_after(&self, n: f32) -> f32 {
        n * self.jump_impulse - self.gravity * n * (n + 1.0) / 2.0
    }

    /// Apex height of a jump from rest, as the tick integrator reaches it
    pub fn jump_apex(&self) -> f32 {
        let climbing = ((self.jump_impulse / self.gravity).ceil() - 1.0).max(0.0);
        self.rise_after(climbing)
    }

    /// Largest vertical step between consecutive platforms
    pub fn max_rise(&self, reach_factor: f32) -> f32 {
        self.jump_apex() * reach_factor
    }

    /// Tick on which a jump from rest comes down onto a surface `rise` above
    /// the takeoff surface
    pub fn landing_tick(&self, rise: f32) -> f32 {
        let (v, g) = (self.jump_impulse, self.gravity);
        let b = v - g / 2.0;
        let disc = (b * b - 2.0 * g * rise).max(0.0);
        // First tick past the later root of rise_after(n) = rise, falling
        let n = ((b + disc.sqrt()) / g).floor() + 1.0;
        n.max((v / g).ceil())
    }

    /// Gap a jump can always clear onto a platform `max_rise` higher
    ///
    /// The last supported position can be up to one tick's travel short of
    /// the edge, so one tick of the flight is not counted.
    pub fn jump_reach(&self, speed: f32, reach_factor: f32) -> f32 {
        let air_ticks = self.landing_tick(self.max_rise(reach_factor));
        speed * (air_ticks - 1.0)
    }
}

/// Everything fixed at session construction
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub seed: u64,
    pub viewport: Viewport,
    pub tuning: Tuning,
}

impl SessionConfig {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            viewport: Viewport::new(width, height),
            tuning: Tuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Validate and derive the session's world parameters
    pub fn world(&self) -> Result<WorldParams, ConfigError> {
        WorldParams::derive(self.viewport, &self.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_derive_uses_smaller_dimension() {
        let world = WorldParams::derive(Viewport::new(800.0, 600.0), &Tuning::default()).unwrap();
        assert!((world.player_size - 60.0).abs() < 1e-3);
        assert!((world.ground_height - 72.0).abs() < 1e-3);
        assert!((world.ground_y - 528.0).abs() < 1e-3);
        assert!((world.jump_impulse - 21.0).abs() < 1e-3);
        assert!((world.gravity - 0.9).abs() < 1e-4);
        assert_eq!(world.obstacle_height, world.player_size);
        assert_eq!(world.world_floor, 600.0);
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = WorldParams::derive(Viewport::new(-10.0, 600.0), &Tuning::default());
        assert!(matches!(err, Err(ConfigError::InvalidViewport { .. })));

        let err = WorldParams::derive(Viewport::new(800.0, 0.0), &Tuning::default());
        assert!(matches!(err, Err(ConfigError::InvalidViewport { .. })));
    }

    #[test]
    fn test_rejects_inverted_gap_range() {
        let tuning = Tuning {
            obstacle_gap: SpanRange::new(500.0, 200.0),
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::InvalidRange { name: "obstacle gap", .. })
        ));

        let tuning = Tuning {
            obstacle_width: SpanRange::new(0.0, 80.0),
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn test_rejects_zero_weights() {
        let tuning = Tuning {
            weights: ObstacleWeights {
                hazard: 0,
                solid_block: 0,
                overhead_block: 0,
                none: 0,
            },
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::NoObstacleWeight)));
    }

    #[test]
    fn test_rejects_speed_above_cap() {
        let tuning = Tuning {
            start_speed: 12.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::SpeedAboveCap { .. })));
    }

    #[test]
    fn test_rejects_spawn_past_safe_ground() {
        let tuning = Tuning {
            safe_start: 120.0,
            ..Default::default()
        };
        let err = WorldParams::derive(Viewport::new(800.0, 600.0), &tuning);
        assert!(matches!(err, Err(ConfigError::UnsafeStart { .. })));
    }

    #[test]
    fn test_platform_gap_must_be_reachable() {
        let mut tuning = Tuning {
            style: TerrainStyle::Platforms,
            ..Default::default()
        };
        assert!(WorldParams::derive(Viewport::new(800.0, 600.0), &tuning).is_ok());

        tuning.platforms.gap = SpanRange::new(100.0, 900.0);
        let err = WorldParams::derive(Viewport::new(800.0, 600.0), &tuning);
        assert!(matches!(err, Err(ConfigError::UnreachableGap { .. })));
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let json = r#"{ "weights": {
            "hazard": 4294967295,
            "solid_block": 1,
            "overhead_block": 4294967295,
            "none": 7
        } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.weights.total(), 2 * u64::from(u32::MAX) + 8);
    }

    #[test]
    fn test_apex_matches_tick_integration() {
        let world = WorldParams::derive(Viewport::new(800.0, 600.0), &Tuning::default()).unwrap();
        let (mut vy, mut rise, mut best) = (-world.jump_impulse, 0.0f32, 0.0f32);
        for _ in 0..100 {
            vy += world.gravity;
            rise -= vy;
            best = best.max(rise);
        }
        assert!((world.jump_apex() - best).abs() < 1e-2);
        assert!((world.jump_apex() - 234.6).abs() < 1e-2);
        // Continuous v^2/2g overstates it
        assert!(world.jump_apex() < world.jump_impulse.powi(2) / (2.0 * world.gravity) - 10.0);
    }

    #[test]
    fn test_reach_factor_must_stay_below_apex() {
        let mut tuning = Tuning {
            style: TerrainStyle::Platforms,
            ..Default::default()
        };
        tuning.platforms.reach_factor = 1.0;
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonPositive { name: "reach_factor", .. })
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let tuning = Tuning::from_json(r#"{ "start_speed": 6.0, "tier_size": 100 }"#).unwrap();
        assert_eq!(tuning.start_speed, 6.0);
        assert_eq!(tuning.tier_size, 100);
        assert_eq!(tuning.max_speed, 10.0);

        assert!(matches!(Tuning::from_json("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Tuning::from_json(r#"{ "distance_unit": -1.0 }"#),
            Err(ConfigError::NonPositive { name: "distance_unit", .. })
        ));
    }
}
