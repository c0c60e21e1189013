//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically:
//! jump → terrain → physics → collision → scoring → camera/prune.
//! A death resets the run inside the same tick and ends it early.

use serde::{Deserialize, Serialize};

use super::autopilot;
use super::collision::{self, DeathCause, Support};
use super::input::TickInput;
use super::physics;
use super::state::GameState;

/// Things that happened during a tick, for the session's collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Touched down after being airborne
    Landed { support: Support },
    /// Difficulty tier reached
    SpeedUp { speed: f32 },
    /// Run ended; `score` is the score at death
    Died { cause: DeathCause, score: u64 },
    NewHighScore { score: u64 },
}

/// Result of a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub events: Vec<GameEvent>,
    /// The run was reset this tick
    pub reset: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickResult {
    let mut result = TickResult::default();
    state.time_ticks += 1;
    state.run_ticks += 1;

    let jump = input.jump || (input.autopilot && autopilot::wants_jump(state));
    if jump && physics::jump(&mut state.player) {
        result.events.push(GameEvent::Jumped);
    }

    state.terrain.extend(state.player.pos.x, state.world.view_width);

    let lateral = if state.tuning.lateral_control {
        input.steer() * state.tuning.lateral_speed
    } else {
        0.0
    };
    let was_airborne = state.player.airborne;
    physics::integrate(&mut state.player, state.world.gravity, lateral);

    let resolution = collision::resolve(
        &mut state.player,
        state.terrain.segments(),
        state.terrain.obstacles(),
        state.world.world_floor,
    );
    if let Some(cause) = resolution.death {
        reset_after_death(state, cause, &mut result);
        return result;
    }
    if was_airborne {
        if let Some(support) = resolution.support {
            result.events.push(GameEvent::Landed { support });
        }
    }

    if let Some(speed) =
        state
            .scoreboard
            .update(state.player.pos.x, &mut state.player.speed, &state.tuning)
    {
        log::debug!("Speed tier {} -> speed {}", state.scoreboard.tier(), speed);
        result.events.push(GameEvent::SpeedUp { speed });
    }

    state.update_camera();
    state.terrain.prune(state.camera_x);
    result
}

/// Fold the score into the high score and start a fresh run
fn reset_after_death(state: &mut GameState, cause: DeathCause, result: &mut TickResult) {
    let score = state.scoreboard.score;
    log::debug!(
        "Died ({:?}) at x={:.1} after {} ticks, score {}",
        cause,
        state.player.pos.x,
        state.run_ticks,
        score
    );
    result.events.push(GameEvent::Died { cause, score });
    if let Some(best) = state.scoreboard.finalize() {
        result.events.push(GameEvent::NewHighScore { score: best });
    }
    state.deaths += 1;
    state.respawn();
    result.reset = true;
}
