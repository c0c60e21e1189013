//! Error types
//!
//! Nothing inside a tick can fail. Errors only come from building a session
//! out of bad configuration, or from the file-backed collaborators.

use thiserror::Error;

/// Rejected session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Viewport must be strictly positive in both dimensions
    #[error("viewport must have positive dimensions, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// A `[min, max]` range is empty, negative or not finite
    #[error("{name} range must satisfy 0 < min <= max, got [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    /// A scalar that must be strictly positive
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    /// Every obstacle weight (including "none") is zero
    #[error("obstacle weights must not all be zero")]
    NoObstacleWeight,

    /// Starting speed is already beyond the cap
    #[error("start speed {start} exceeds speed cap {max}")]
    SpeedAboveCap { start: f32, max: f32 },

    /// The player would spawn past the end of the safe starting ground
    #[error("safe start {safe_start} must extend past the player spawn edge {spawn_edge}")]
    UnsafeStart { safe_start: f32, spawn_edge: f32 },

    /// Platform gaps wider than one jump can cover at start speed
    #[error("platform gap {max_gap} is wider than the reachable jump distance {reach}")]
    UnreachableGap { max_gap: f32, reach: f32 },

    /// Tuning JSON could not be parsed
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reading or writing a persisted record
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),
}
