//! Player physics
//!
//! One tick is one explicit Euler step in per-tick units. No substeps, no
//! interpolation: collision outcomes must be reproducible.

use super::state::Player;

/// Advance the body by one tick
///
/// `lateral` is the steering offset added to the forward speed (0 unless
/// lateral control is enabled). Horizontal velocity never goes negative.
pub fn integrate(player: &mut Player, gravity: f32, lateral: f32) {
    player.prev_pos = player.pos;
    player.vel.x = (player.speed + lateral).max(0.0);
    player.vel.y += gravity;
    player.pos.x += player.vel.x;
    player.pos.y += player.vel.y;
}

/// Start a jump if the player is supported
///
/// Returns `true` when the impulse was applied. Requests while airborne are
/// dropped, not queued.
pub fn jump(player: &mut Player) -> bool {
    if player.airborne {
        return false;
    }
    player.vel.y = -player.jump_impulse;
    player.airborne = true;
    player.on_block = false;
    true
}
