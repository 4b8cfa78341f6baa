//! Player vertical motion: jump, double jump, duck
//!
//! Velocity follows the screen convention: negative is upward, gravity is
//! added each tick, and height integrates as `jump_y -= velocity`.

use super::state::Player;
use crate::consts::*;

/// Apply a jump input edge. From the ground this starts the first jump;
/// while airborne on the first jump (and high enough) it starts the double
/// jump; a third press is ignored. Jumping always cancels a duck.
pub fn jump(player: &mut Player) {
    if player.ducking {
        player.ducking = false;
        player.duck_timer_ms = 0.0;
    }

    match player.jump_count {
        0 if player.jump_y <= 0.0 => {
            player.jump_velocity = JUMP_VELOCITY;
            player.jump_count = 1;
        }
        1 if player.jump_y > DOUBLE_JUMP_MIN_HEIGHT => {
            player.jump_velocity = DOUBLE_JUMP_VELOCITY;
            player.jump_count = 2;
        }
        _ => {}
    }
}

/// Apply a duck input edge. Only initiable while grounded; re-pressing
/// while already ducking just re-arms the timer.
pub fn duck(player: &mut Player) {
    if player.grounded() || player.ducking {
        player.ducking = true;
        player.duck_timer_ms = DUCK_DURATION_MS;
    }
}

/// Integrate one tick of vertical motion and run down all timed effects.
pub fn integrate(player: &mut Player, dt_ms: f32) {
    if player.jump_count > 0 {
        player.jump_velocity += GRAVITY;
        player.jump_y -= player.jump_velocity;
        if player.jump_y <= 0.0 {
            player.jump_y = 0.0;
            player.jump_velocity = 0.0;
            player.jump_count = 0;
        }
    }

    if player.ducking {
        player.duck_timer_ms -= dt_ms;
        if player.duck_timer_ms <= 0.0 {
            player.ducking = false;
            player.duck_timer_ms = 0.0;
        }
    }

    player.invincible_ms = (player.invincible_ms - dt_ms).max(0.0);
    player.boost_ms = (player.boost_ms - dt_ms).max(0.0);
    player.magnet_ms = (player.magnet_ms - dt_ms).max(0.0);
    player.double_score_ms = (player.double_score_ms - dt_ms).max(0.0);
}
