//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (by x)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod physics;
pub mod rect;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{DeathCause, Resolution, Support, resolve};
pub use input::{Drained, InputEvent, InputQueue, TickInput};
pub use rect::Rect;
pub use scoring::Scoreboard;
pub use snapshot::Snapshot;
pub use state::{GameState, Obstacle, ObstacleKind, Player, TerrainSegment, camera_for};
pub use terrain::Terrain;
pub use tick::{GameEvent, TickResult, tick};
