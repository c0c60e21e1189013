//! Procedural terrain and obstacle generation
//!
//! Terrain is generated lazily ahead of the player and pruned once it falls
//! behind the camera. Both collections stay sorted by x and never overlap, so
//! right edges are sorted too and pruning is a single prefix drain.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, ObstacleKind, TerrainSegment};
use crate::tuning::{ObstacleWeights, PlatformTuning, SpanRange, TerrainStyle, Tuning, WorldParams};

/// Overhead blocks leave this many player heights of clearance above the ground
const OVERHEAD_CLEARANCE: f32 = 1.6;
const OVERHEAD_HEIGHT_RATIO: f32 = 0.6;
const HAZARD_HEIGHT_RATIO: f32 = 0.5;

/// Generation inputs captured once per session
#[derive(Debug, Clone, Copy, PartialEq)]
struct GenParams {
    style: TerrainStyle,
    ground_y: f32,
    ground_height: f32,
    player_size: f32,
    obstacle_height: f32,
    obstacle_gap: SpanRange,
    obstacle_width: SpanRange,
    weights: ObstacleWeights,
    platforms: PlatformTuning,
    band_top: f32,
    max_rise: f32,
    safe_start: f32,
    prune_margin: f32,
}

/// Generated course ahead of the player
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    segments: Vec<TerrainSegment>,
    obstacles: Vec<Obstacle>,
    /// Everything left of this x has been generated
    cursor: f32,
    /// Top of the most recent platform
    last_top: f32,
    rng: Pcg32,
    params: GenParams,
}

impl Terrain {
    pub fn new(seed: u64, world: &WorldParams, tuning: &Tuning) -> Self {
        let params = GenParams {
            style: tuning.style,
            ground_y: world.ground_y,
            ground_height: world.ground_height,
            player_size: world.player_size,
            obstacle_height: world.obstacle_height,
            obstacle_gap: tuning.obstacle_gap,
            obstacle_width: tuning.obstacle_width,
            weights: tuning.weights,
            platforms: tuning.platforms,
            band_top: world.view_height * tuning.platforms.band_top_ratio,
            max_rise: world.max_rise(tuning.platforms.reach_factor),
            safe_start: tuning.safe_start,
            prune_margin: tuning.prune_margin,
        };
        Self {
            segments: Vec::new(),
            obstacles: Vec::new(),
            cursor: 0.0,
            last_top: world.ground_y,
            rng: Pcg32::seed_from_u64(seed),
            params,
        }
    }

    pub fn segments(&self) -> &[TerrainSegment] {
        &self.segments
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Bulk clear, rewinding the cursor
    pub fn clear(&mut self) {
        self.segments.clear();
        self.obstacles.clear();
        self.cursor = 0.0;
        self.last_top = self.params.ground_y;
    }

    /// Clear and lay the obstacle-free starting ground `[0, safe_start)`
    pub fn reset(&mut self) {
        self.clear();
        let start = TerrainSegment {
            x: 0.0,
            y: self.params.ground_y,
            width: self.params.safe_start,
            height: self.params.ground_height,
        };
        self.cursor = start.right();
        self.segments.push(start);
    }

    /// Generate until the course covers `[0, player_x + view_width]`
    ///
    /// Returns the number of slots generated (0 if already far enough ahead).
    pub fn extend(&mut self, player_x: f32, view_width: f32) -> usize {
        let target = player_x + view_width;
        let mut slots = 0;
        while self.cursor < target {
            match self.params.style {
                TerrainStyle::Flat => self.generate_flat_slot(),
                TerrainStyle::Platforms => self.generate_platform(),
            }
            slots += 1;
        }
        slots
    }

    /// Remove entities whose right edge is left of `camera_x - prune_margin`
    ///
    /// Returns how many entities were dropped.
    pub fn prune(&mut self, camera_x: f32) -> usize {
        let bound = camera_x - self.params.prune_margin;
        let seg_cut = self.segments.partition_point(|s| s.right() < bound);
        let obs_cut = self.obstacles.partition_point(|o| o.right() < bound);
        self.segments.drain(..seg_cut);
        self.obstacles.drain(..obs_cut);
        seg_cut + obs_cut
    }

    /// Place a hand-authored obstacle, keeping x order
    ///
    /// The caller is responsible for not overlapping existing obstacles.
    #[cfg(test)]
    pub(crate) fn insert_obstacle(&mut self, obstacle: Obstacle) {
        let idx = self.obstacles.partition_point(|o| o.x <= obstacle.x);
        self.cursor = self.cursor.max(obstacle.right());
        self.obstacles.insert(idx, obstacle);
    }

    /// Continuous ground with one obstacle slot after a gap
    fn generate_flat_slot(&mut self) {
        let gap = self.draw(self.params.obstacle_gap);
        let width = self.draw(self.params.obstacle_width);
        let start = self.cursor;
        let x = start + gap;

        let ground = TerrainSegment {
            x: start,
            y: self.params.ground_y,
            width: gap + width,
            height: self.params.ground_height,
        };
        let mut end = ground.right();
        self.segments.push(ground);

        if let Some(kind) = self.roll_kind() {
            let obstacle = self.place_obstacle(kind, x, width, self.params.ground_y);
            end = end.max(obstacle.right());
            self.obstacles.push(obstacle);
        }
        self.cursor = end;
    }

    /// Floating platform within jump reach of the previous one
    fn generate_platform(&mut self) {
        let PlatformTuning { gap, width, .. } = self.params.platforms;
        let gap = self.draw(gap);
        let width = self.draw(width);

        let rise = self.params.max_rise;
        let delta = if rise > 0.0 {
            self.rng.random_range(-rise..=rise)
        } else {
            0.0
        };
        let top = (self.last_top + delta).clamp(self.params.band_top, self.params.ground_y);

        let platform = TerrainSegment {
            x: self.cursor + gap,
            y: top,
            width,
            height: self.params.ground_height,
        };
        let mut end = platform.right();
        self.segments.push(platform);
        self.last_top = top;

        if let Some(kind) = self.roll_kind() {
            let max_width = platform.width / 4.0;
            let w = self.draw(self.params.obstacle_width).min(max_width);
            // Middle half of the platform, so the runner can land before it
            let lo = platform.x + platform.width * 0.25;
            let hi = platform.x + platform.width * 0.75 - w;
            let x = if hi > lo { self.rng.random_range(lo..=hi) } else { lo };
            let obstacle = self.place_obstacle(kind, x, w, top);
            end = end.max(obstacle.right());
            self.obstacles.push(obstacle);
        }
        self.cursor = end;
    }

    fn draw(&mut self, range: SpanRange) -> f32 {
        if range.max > range.min {
            self.rng.random_range(range.min..=range.max)
        } else {
            range.min
        }
    }

    /// Weighted obstacle draw; `None` leaves the slot empty
    fn roll_kind(&mut self) -> Option<ObstacleKind> {
        let w = self.params.weights;
        let total = w.total();
        if total == 0 {
            return None;
        }
        let mut roll = self.rng.random_range(0..total);
        let table = [
            (w.hazard, Some(ObstacleKind::Hazard)),
            (w.solid_block, Some(ObstacleKind::SolidBlock)),
            (w.overhead_block, Some(ObstacleKind::OverheadBlock)),
            (w.none, None),
        ];
        for (weight, kind) in table {
            let weight = u64::from(weight);
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        None
    }

    /// Position an obstacle relative to the surface it rides on
    fn place_obstacle(&self, kind: ObstacleKind, x: f32, width: f32, top: f32) -> Obstacle {
        let (y, height) = match kind {
            ObstacleKind::Hazard => {
                let h = self.params.obstacle_height * HAZARD_HEIGHT_RATIO;
                (top - h, h)
            }
            ObstacleKind::SolidBlock => {
                let h = self.params.obstacle_height;
                (top - h, h)
            }
            ObstacleKind::OverheadBlock => {
                let h = self.params.obstacle_height * OVERHEAD_HEIGHT_RATIO;
                let bottom = top - self.params.player_size * OVERHEAD_CLEARANCE;
                (bottom - h, h)
            }
        };
        Obstacle {
            kind,
            x,
            y,
            width,
            height,
        }
    }
}
