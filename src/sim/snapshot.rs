//! Read-only view handed to the renderer each tick

use serde::Serialize;

use super::rect::Rect;
use super::state::{GameState, Obstacle, TerrainSegment};

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub player: Rect,
    pub airborne: bool,
    pub camera_x: f32,
    /// Ordered by x
    pub terrain: &'a [TerrainSegment],
    /// Ordered by x
    pub obstacles: &'a [Obstacle],
    pub score: u64,
    pub high_score: u64,
    pub speed: f32,
}

impl Snapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            player: self.player.rect(),
            airborne: self.player.airborne,
            camera_x: self.camera_x,
            terrain: self.terrain.segments(),
            obstacles: self.terrain.obstacles(),
            score: self.scoreboard.score,
            high_score: self.scoreboard.high_score,
            speed: self.player.speed,
        }
    }
}
