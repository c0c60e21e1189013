//! Demo-mode player
//!
//! Deliberately simple: hop over whatever blocks the lane, hop off platform
//! edges, and stay grounded under overhead blocks.

use super::state::{GameState, ObstacleKind};
use crate::tuning::TerrainStyle;

/// Ticks of travel ahead at which a ground obstacle triggers a jump
const OBSTACLE_LEAD_TICKS: f32 = 4.0;
/// Ticks of travel ahead at which a platform edge triggers a jump
const EDGE_LEAD_TICKS: f32 = 2.0;

/// Whether the autopilot would jump this tick
pub fn wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    if player.airborne {
        return false;
    }

    let front = player.right();
    let lead = player.speed * OBSTACLE_LEAD_TICKS;
    let obstacles = state.terrain.obstacles();
    let first = obstacles.partition_point(|o| o.right() <= player.pos.x);
    if let Some(next) = obstacles[first..].first() {
        let distance = next.x - front;
        if next.kind != ObstacleKind::OverheadBlock && distance <= lead {
            return true;
        }
    }

    if state.tuning.style == TerrainStyle::Platforms {
        let segments = state.terrain.segments();
        let first = segments.partition_point(|s| s.right() <= player.pos.x);
        if let Some(under) = segments[first..].first() {
            if under.right() < front + player.speed * EDGE_LEAD_TICKS {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::{ObstacleWeights, Tuning, Viewport, WorldParams};

    fn grounded_state(tuning: Tuning) -> GameState {
        let tuning = Tuning {
            spawn_drop: 0.0,
            ..tuning
        };
        let world = WorldParams::derive(Viewport::new(800.0, 600.0), &tuning).unwrap();
        let mut state = GameState::new(1, world, tuning);
        state.respawn();
        state.player.airborne = false;
        state
    }

    fn obstacle(kind: ObstacleKind, x: f32) -> Obstacle {
        Obstacle {
            kind,
            x,
            y: 498.0,
            width: 40.0,
            height: 30.0,
        }
    }

    #[test]
    fn test_jumps_before_hazard() {
        let tuning = Tuning {
            weights: ObstacleWeights::clear_course(),
            ..Default::default()
        };
        let mut state = grounded_state(tuning);
        assert!(!wants_jump(&state));

        // Player front is at x = 160
        state.terrain.insert_obstacle(obstacle(ObstacleKind::Hazard, 175.0));
        assert!(wants_jump(&state));

        state.player.airborne = true;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_stays_down_under_overhead() {
        let tuning = Tuning {
            weights: ObstacleWeights::clear_course(),
            ..Default::default()
        };
        let mut state = grounded_state(tuning);
        state.terrain.insert_obstacle(obstacle(ObstacleKind::OverheadBlock, 170.0));
        assert!(!wants_jump(&state));
    }
}
