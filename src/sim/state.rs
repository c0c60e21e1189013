//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the session owns exactly one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scoring::Scoreboard;
use super::terrain::Terrain;
use crate::error::ConfigError;
use crate::tuning::{SessionConfig, Tuning, WorldParams};

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Position before the last integration step
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    /// Forward speed (world units per tick)
    pub speed: f32,
    pub jump_impulse: f32,
    /// No supporting contact this tick
    pub airborne: bool,
    /// Supported by a solid block rather than terrain
    pub on_block: bool,
}

impl Player {
    /// Fresh player at the start line, `spawn_drop` above the ground
    pub fn spawn(world: &WorldParams, tuning: &Tuning) -> Self {
        let pos = Vec2::new(
            tuning.start_x,
            world.ground_y - world.player_size - tuning.spawn_drop,
        );
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            width: world.player_size,
            height: world.player_size,
            speed: tuning.start_speed,
            jump_impulse: world.jump_impulse,
            airborne: tuning.spawn_drop > 0.0,
            on_block: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn prev_bottom(&self) -> f32 {
        self.prev_pos.y + self.height
    }

    /// Place the body so its bottom rests on `top`
    pub fn snap_onto(&mut self, top: f32) {
        self.pos.y = top - self.height;
        self.vel.y = 0.0;
        self.airborne = false;
    }
}

/// Walkable ground or platform covering `[x, x + width)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub x: f32,
    /// Walkable top
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TerrainSegment {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Lethal on any contact
    Hazard,
    /// Landable on top, lethal from the side or below
    SolidBlock,
    /// Floats above the ground, lethal on any contact
    OverheadBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub world: WorldParams,
    pub tuning: Tuning,
    pub player: Player,
    /// Segments, obstacles, cursor and RNG
    pub terrain: Terrain,
    pub scoreboard: Scoreboard,
    /// Left edge of the view, derived from the player each tick
    pub camera_x: f32,
    /// Simulation ticks since the session began
    pub time_ticks: u64,
    /// Ticks since the last reset
    pub run_ticks: u64,
    /// Resets triggered by deaths
    pub deaths: u32,
}

impl GameState {
    /// Idle state: player at the start line, no terrain generated yet
    pub fn new(seed: u64, world: WorldParams, tuning: Tuning) -> Self {
        let player = Player::spawn(&world, &tuning);
        let terrain = Terrain::new(seed, &world, &tuning);
        let camera_x = camera_for(&player, &world);
        Self {
            seed,
            world,
            tuning,
            player,
            terrain,
            scoreboard: Scoreboard::default(),
            camera_x,
            time_ticks: 0,
            run_ticks: 0,
            deaths: 0,
        }
    }

    /// Validate a session config and build its idle state
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let world = config.world()?;
        Ok(Self::new(config.seed, world, config.tuning.clone()))
    }

    /// Reinitialize player, terrain and score for a new run
    ///
    /// The high score and the RNG stream carry over.
    pub fn respawn(&mut self) {
        self.player = Player::spawn(&self.world, &self.tuning);
        self.scoreboard.reset_run();
        self.terrain.reset();
        self.terrain.extend(self.player.pos.x, self.world.view_width);
        self.run_ticks = 0;
        self.update_camera();
    }

    /// Drop every per-run entity (back to idle)
    pub fn clear(&mut self) {
        self.player = Player::spawn(&self.world, &self.tuning);
        self.scoreboard.reset_run();
        self.terrain.clear();
        self.run_ticks = 0;
        self.update_camera();
    }

    pub fn update_camera(&mut self) {
        self.camera_x = camera_for(&self.player, &self.world);
    }
}

/// Camera keeps the player horizontally centered
pub fn camera_for(player: &Player, world: &WorldParams) -> f32 {
    player.pos.x - world.view_width / 2.0 + player.width / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Viewport;

    fn world() -> WorldParams {
        WorldParams::derive(Viewport::new(800.0, 600.0), &Tuning::default()).unwrap()
    }

    #[test]
    fn test_spawn_above_ground() {
        let world = world();
        let player = Player::spawn(&world, &Tuning::default());
        assert_eq!(player.pos.x, 100.0);
        assert!((player.bottom() - (world.ground_y - 100.0)).abs() < 1e-3);
        assert!(player.airborne);
        assert_eq!(player.speed, 5.0);
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = GameState::new(7, world(), Tuning::default());
        assert!(state.terrain.segments().is_empty());
        assert!(state.terrain.obstacles().is_empty());
        assert_eq!(state.scoreboard.score, 0);
    }

    #[test]
    fn test_respawn_generates_ahead() {
        let mut state = GameState::new(7, world(), Tuning::default());
        state.respawn();
        assert!(state.terrain.cursor() >= state.player.pos.x + state.world.view_width);
        assert_eq!(state.terrain.segments()[0].x, 0.0);

        state.clear();
        assert!(state.terrain.segments().is_empty());
        assert_eq!(state.terrain.cursor(), 0.0);
    }

    #[test]
    fn test_camera_centers_player() {
        let world = world();
        let player = Player::spawn(&world, &Tuning::default());
        let camera = camera_for(&player, &world);
        assert!((camera - (100.0 - 400.0 + 30.0)).abs() < 1e-3);
    }
}
