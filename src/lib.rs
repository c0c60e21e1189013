//! Jump Runner - a side-scrolling auto-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, physics, collisions, scoring)
//! - `session`: Idle/Running state machine wired to the collaborators
//! - `clock`: Frame callback to simulation tick stepping
//! - `tuning`: Data-driven game balance and session sizing
//! - `highscores`, `settings`, `audio`: thin I/O collaborators
//! - `web`: Browser bindings (wasm32 only)

pub mod audio;
pub mod clock;
pub mod error;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, PersistError};
pub use highscores::HighScoreStore;
pub use session::{Session, SessionPhase};
pub use settings::Settings;
pub use tuning::{SessionConfig, TerrainStyle, Tuning, Viewport, WorldParams};

/// Game configuration constants
pub mod consts {
    /// Simulation rate used by the fixed-rate stepper
    pub const DEFAULT_TICK_HZ: f64 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap (ms) fed into the accumulator
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Pending input events kept between ticks
    pub const INPUT_QUEUE_CAPACITY: usize = 32;

    /// Viewport used by the headless runner
    pub const DEFAULT_VIEW_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEW_HEIGHT: f32 = 600.0;
}
