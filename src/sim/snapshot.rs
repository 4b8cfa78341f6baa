//! Read-only per-tick view for the renderer
//!
//! The renderer consumes this and must not feed anything back into the
//! simulation; everything here is copied out of the state.

use glam::Vec2;
use serde::Serialize;

use super::state::{Coin, Obstacle, PowerUp, RacePhase, RaceState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub hp: u8,
    pub jump_y: f32,
    pub ducking: bool,
    pub shield: bool,
    pub invincible: bool,
    pub boost_active: bool,
    pub magnet_active: bool,
    pub double_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    /// 3, 2, 1 during countdown; 0 otherwise
    pub countdown_step: u32,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub fever_active: bool,
    pub elapsed_ms: f32,
    pub speed: f32,
    pub distance: f32,
    pub player: PlayerView,
    pub player_pos: Vec2,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<PowerUp>,
    pub coins: Vec<Coin>,
}

impl RaceSnapshot {
    pub fn capture(state: &RaceState) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            countdown_step: if state.phase == RacePhase::Countdown {
                state.countdown_step()
            } else {
                0
            },
            score: state.score,
            combo: state.combo.combo,
            max_combo: state.combo.max_combo,
            fever_active: state.combo.fever_active,
            elapsed_ms: state.clock.elapsed_ms,
            speed: state.clock.speed,
            distance: state.clock.distance,
            player: PlayerView {
                hp: player.hp,
                jump_y: player.jump_y,
                ducking: player.ducking,
                shield: player.shield,
                invincible: player.invincible(),
                boost_active: player.boost_ms > 0.0,
                magnet_active: player.magnet_active(),
                double_active: player.double_active(),
            },
            player_pos: Vec2::new(crate::consts::PLAYER_X, player.jump_y),
            obstacles: state.obstacles.clone(),
            powerups: state.powerups.clone(),
            coins: state.coins.clone(),
        }
    }
}
