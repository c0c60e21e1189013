//! Collision detection and response
//!
//! Runs after integration. Landing on terrain is checked first, then every
//! obstacle overlapping the (possibly snapped) body, then the world floor.
//! Overlaps use strict inequalities, so a body flush against an edge is not
//! colliding.

use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleKind, Player, TerrainSegment};

/// Slack for "was at or above the surface last tick", absorbing the rounding of
/// `top - height + height` after a snap
const CONTACT_EPSILON: f32 = 1e-3;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    OverheadBlock,
    /// Ran into the side of a solid block, or hit it from below
    BlockSide,
    FellOffWorld,
}

/// What is holding the player up after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    Terrain,
    Block,
}

/// Outcome of one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub support: Option<Support>,
    pub death: Option<DeathCause>,
}

impl Resolution {
    fn died(support: Option<Support>, cause: DeathCause) -> Self {
        Self {
            support,
            death: Some(cause),
        }
    }
}

/// Falling onto `top` this tick, coming from at or above it
#[inline]
fn lands_on(player: &Player, top: f32) -> bool {
    player.vel.y >= 0.0 && player.prev_bottom() <= top + CONTACT_EPSILON && player.bottom() > top
}

/// Resolve the player against the course, snapping landings in place
///
/// `segments` and `obstacles` must be sorted by x and non-overlapping.
pub fn resolve(
    player: &mut Player,
    segments: &[TerrainSegment],
    obstacles: &[Obstacle],
    world_floor: f32,
) -> Resolution {
    // Support is re-established every tick
    player.airborne = true;
    player.on_block = false;
    let mut support = None;

    // 1. Terrain landing (first match wins)
    let body = player.rect();
    let first = segments.partition_point(|s| s.right() <= body.x);
    for seg in segments[first..].iter().take_while(|s| s.x < body.right()) {
        if body.overlaps_x(&seg.rect()) && lands_on(player, seg.y) {
            player.snap_onto(seg.y);
            support = Some(Support::Terrain);
            break;
        }
    }

    // 2. Obstacles
    let first = obstacles.partition_point(|o| o.right() <= body.x);
    for obstacle in obstacles[first..].iter().take_while(|o| o.x < body.right()) {
        if !player.rect().overlaps(&obstacle.rect()) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Hazard => return Resolution::died(support, DeathCause::Hazard),
            ObstacleKind::OverheadBlock => {
                return Resolution::died(support, DeathCause::OverheadBlock);
            }
            ObstacleKind::SolidBlock => {
                if lands_on(player, obstacle.y) {
                    player.snap_onto(obstacle.y);
                    player.on_block = true;
                    support = Some(Support::Block);
                } else {
                    return Resolution::died(support, DeathCause::BlockSide);
                }
            }
        }
    }

    // 3. Missed every surface
    if player.pos.y > world_floor {
        return Resolution::died(support, DeathCause::FellOffWorld);
    }

    Resolution {
        support,
        death: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::integrate;
    use glam::Vec2;

    const GRAVITY: f32 = 0.9;
    const FLOOR: f32 = 600.0;
    const GROUND: f32 = 528.0;

    fn player_at(x: f32, bottom: f32) -> Player {
        let pos = Vec2::new(x, bottom - 60.0);
        Player {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            width: 60.0,
            height: 60.0,
            speed: 5.0,
            jump_impulse: 21.0,
            airborne: false,
            on_block: false,
        }
    }

    fn ground(x: f32, width: f32) -> TerrainSegment {
        TerrainSegment {
            x,
            y: GROUND,
            width,
            height: 72.0,
        }
    }

    fn obstacle(kind: ObstacleKind, x: f32, y: f32, width: f32, height: f32) -> Obstacle {
        Obstacle {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    fn step(
        player: &mut Player,
        segments: &[TerrainSegment],
        obstacles: &[Obstacle],
    ) -> Resolution {
        integrate(player, GRAVITY, 0.0);
        resolve(player, segments, obstacles, FLOOR)
    }

    #[test]
    fn test_lands_on_ground_from_above() {
        let segments = [ground(0.0, 10_000.0)];
        let mut p = player_at(100.0, GROUND - 50.0);
        p.airborne = true;
        let mut landed = false;
        for _ in 0..60 {
            let res = step(&mut p, &segments, &[]);
            assert_eq!(res.death, None);
            if res.support == Some(Support::Terrain) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(p.bottom(), GROUND);
        assert_eq!(p.vel.y, 0.0);
        assert!(!p.airborne);
    }

    #[test]
    fn test_resting_is_idempotent() {
        let segments = [ground(0.0, 4000.0), ground(4000.0, 4000.0)];
        let mut p = player_at(100.0, GROUND);
        for _ in 0..1000 {
            let res = step(&mut p, &segments, &[]);
            assert_eq!(res.support, Some(Support::Terrain));
            assert_eq!(p.vel.y, 0.0);
            assert!(!p.airborne);
        }
        assert_eq!(p.pos.x, 5100.0);
    }

    #[test]
    fn test_rising_body_passes_through_platform() {
        let platform = TerrainSegment {
            x: 0.0,
            y: 400.0,
            width: 1000.0,
            height: 20.0,
        };
        let mut p = player_at(100.0, 410.0);
        p.vel.y = -15.0;
        let res = step(&mut p, &[platform], &[]);
        assert_eq!(res.support, None);
        assert!(p.airborne);
    }

    #[test]
    fn test_hazard_contact_is_fatal() {
        let segments = [ground(0.0, 1000.0)];
        let spikes = [obstacle(ObstacleKind::Hazard, 162.0, GROUND - 30.0, 40.0, 30.0)];
        let mut p = player_at(100.0, GROUND);
        let res = step(&mut p, &segments, &spikes);
        assert_eq!(res.death, Some(DeathCause::Hazard));
    }

    #[test]
    fn test_flush_edge_is_not_contact() {
        let segments = [ground(0.0, 1000.0)];
        // After one step the body's right edge is exactly at x = 165
        let spikes = [obstacle(ObstacleKind::Hazard, 165.0, GROUND - 30.0, 40.0, 30.0)];
        let mut p = player_at(100.0, GROUND);
        let res = step(&mut p, &segments, &spikes);
        assert_eq!(res.death, None);
        assert_eq!(p.right(), 165.0);
    }

    #[test]
    fn test_overhead_block_is_fatal_when_jumping_into_it() {
        let segments = [ground(0.0, 1000.0)];
        let beam = [obstacle(ObstacleKind::OverheadBlock, 100.0, GROUND - 132.0, 80.0, 36.0)];

        // Standing player passes underneath
        let mut p = player_at(100.0, GROUND);
        assert_eq!(step(&mut p, &segments, &beam).death, None);

        // Jumping player hits it
        let mut p = player_at(100.0, GROUND);
        p.vel.y = -21.0;
        p.airborne = true;
        let mut death = None;
        for _ in 0..10 {
            death = step(&mut p, &segments, &beam).death;
            if death.is_some() {
                break;
            }
        }
        assert_eq!(death, Some(DeathCause::OverheadBlock));
    }

    #[test]
    fn test_solid_block_landing_from_rest_height() {
        // Block top is exactly at the resting bottom of the player
        let top = GROUND - 60.0;
        let blocks = [obstacle(ObstacleKind::SolidBlock, 90.0, top, 200.0, 60.0)];
        let mut p = player_at(100.0, top);
        let res = step(&mut p, &[ground(0.0, 1000.0)], &blocks);
        assert_eq!(res.death, None);
        assert_eq!(res.support, Some(Support::Block));
        assert!(!p.airborne);
        assert!(p.on_block);
        assert_eq!(p.bottom(), top);
    }

    #[test]
    fn test_solid_block_side_is_fatal() {
        let segments = [ground(0.0, 1000.0)];
        let blocks = [obstacle(ObstacleKind::SolidBlock, 162.0, GROUND - 60.0, 50.0, 60.0)];
        let mut p = player_at(100.0, GROUND);
        let res = step(&mut p, &segments, &blocks);
        assert_eq!(res.death, Some(DeathCause::BlockSide));
    }

    #[test]
    fn test_falling_off_the_world() {
        let mut p = player_at(100.0, FLOOR + 90.0);
        p.airborne = true;
        let res = step(&mut p, &[], &[]);
        assert_eq!(res.death, Some(DeathCause::FellOffWorld));
    }

    #[test]
    fn test_first_segment_wins() {
        let low = TerrainSegment {
            x: 0.0,
            y: GROUND,
            width: 130.0,
            height: 72.0,
        };
        let high = TerrainSegment {
            x: 130.0,
            y: GROUND - 1.0,
            width: 500.0,
            height: 72.0,
        };
        // Drop onto the seam of both segments
        let mut p = player_at(100.0, GROUND - 2.0);
        p.vel.y = 2.0;
        p.airborne = true;
        let res = step(&mut p, &[low, high], &[]);
        assert_eq!(res.support, Some(Support::Terrain));
        assert_eq!(p.bottom(), GROUND);
    }
}
