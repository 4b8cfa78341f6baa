//! Collision detection and outcome classification
//!
//! Everything here is pure geometry: axis-aligned boxes in track space
//! (x scrolls right-to-left, y is height above the ground line). The tick
//! loop owns all mutation; these functions only look and classify.

use glam::Vec2;

use super::state::{Obstacle, Player};
use crate::consts::*;

/// Axis-aligned bounding box; `min` is the left/bottom corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// What a live obstacle did to the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleOutcome {
    /// Unshielded overlap: damage, combo reset, penalty
    Hit,
    /// Overlap absorbed by the one-shot shield
    ShieldedHit,
    /// Overlap during invincibility: not latched, retested next tick
    Ignored,
    /// Trailing edge passed the player's leading edge without contact
    Dodge {
        /// Cleared within the tight proximity window
        near_miss: bool,
    },
    /// Still approaching; nothing to do
    Pending,
}

/// Current player hitbox: low and wide while ducking, tall otherwise,
/// vertical position tracking `jump_y`.
pub fn player_hitbox(player: &Player) -> Aabb {
    let (w, h) = if player.ducking {
        (PLAYER_DUCK_W, PLAYER_DUCK_H)
    } else {
        (PLAYER_STAND_W, PLAYER_STAND_H)
    };
    Aabb::from_pos_size(Vec2::new(PLAYER_X, player.jump_y), Vec2::new(w, h))
}

pub fn obstacle_aabb(obstacle: &Obstacle) -> Aabb {
    Aabb::from_pos_size(obstacle.pos, obstacle.size)
}

/// Classify one live (`hit == false`) obstacle against the player.
pub fn classify_obstacle(
    player_box: &Aabb,
    obstacle: &Obstacle,
    invincible: bool,
    shielded: bool,
) -> ObstacleOutcome {
    let obs_box = obstacle_aabb(obstacle);

    if player_box.overlaps(&obs_box) {
        if invincible {
            return ObstacleOutcome::Ignored;
        }
        if shielded {
            return ObstacleOutcome::ShieldedHit;
        }
        return ObstacleOutcome::Hit;
    }

    if obs_box.max.x < player_box.min.x {
        return ObstacleOutcome::Dodge {
            near_miss: is_near_miss(player_box, &obs_box),
        };
    }

    ObstacleOutcome::Pending
}

/// Tighter-than-dodge proximity check in both axes. The caller applies the
/// cooldown so at most one near-miss bonus fires per window.
pub fn is_near_miss(player_box: &Aabb, obs_box: &Aabb) -> bool {
    let trailing_gap = player_box.min.x - obs_box.max.x;
    if !(0.0..=NEAR_MISS_X).contains(&trailing_gap) {
        return false;
    }

    let vertical_gap = if obs_box.min.y >= player_box.max.y {
        obs_box.min.y - player_box.max.y
    } else if player_box.min.y >= obs_box.max.y {
        player_box.min.y - obs_box.max.y
    } else {
        // Boxes overlap vertically now that the obstacle is past
        0.0
    };
    vertical_gap <= NEAR_MISS_Y
}

/// Pickup test point, drawn toward `target` while the magnet is active.
pub fn effective_center(player: &Player, target: Vec2) -> Vec2 {
    let center = player_hitbox(player).center();
    if player.magnet_active() {
        let to_target = target - center;
        let dist = to_target.length();
        if dist > 0.0 && dist <= MAGNET_RANGE {
            return center + to_target * MAGNET_PULL;
        }
    }
    center
}
