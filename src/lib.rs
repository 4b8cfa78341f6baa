//! Slime Race - an endless-runner mini-game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `session`: Select/countdown/playing/result orchestration and the host seam
//!
//! The simulation is a pure fixed-timestep step function over a serializable
//! state value; the host drives it with whatever scheduling primitive it has
//! and reads back per-tick snapshots for rendering.

pub mod session;
pub mod sim;

pub use session::{Character, FinalizeRequest, HostError, RaceHost, RaceReward, SessionController};
pub use sim::{RacePhase, RaceState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: f32 = 16.0;

    /// Track dimensions (gameplay coordinates, pixels)
    pub const TRACK_WIDTH: f32 = 800.0;
    /// Obstacles enter just off the right edge
    pub const SPAWN_X: f32 = TRACK_WIDTH + 20.0;
    /// Entities are culled once fully off the left edge
    pub const CULL_X: f32 = -50.0;
    /// Left edge of the player hitbox
    pub const PLAYER_X: f32 = 120.0;

    /// Player defaults
    pub const MAX_HP: u8 = 3;
    pub const PLAYER_STAND_W: f32 = 30.0;
    pub const PLAYER_STAND_H: f32 = 48.0;
    pub const PLAYER_DUCK_W: f32 = 34.0;
    pub const PLAYER_DUCK_H: f32 = 24.0;

    /// Jump physics (per-tick units; negative velocity is upward)
    pub const GRAVITY: f32 = 0.75;
    pub const JUMP_VELOCITY: f32 = -13.0;
    pub const DOUBLE_JUMP_VELOCITY: f32 = -10.0;
    /// Minimum height before the second jump becomes available
    pub const DOUBLE_JUMP_MIN_HEIGHT: f32 = 20.0;
    pub const DUCK_DURATION_MS: f32 = 600.0;

    /// Scroll speed in pixels per tick, ramping with elapsed time
    pub const BASE_SPEED: f32 = 6.0;
    pub const SPEED_GAIN_PER_SEC: f32 = 0.08;
    pub const MAX_SPEED: f32 = 14.0;

    /// Obstacle spawn interval shrinks from 1200ms toward the 350ms floor
    pub const SPAWN_INTERVAL_START_MS: f32 = 1200.0;
    pub const SPAWN_INTERVAL_MIN_MS: f32 = 350.0;
    pub const SPAWN_INTERVAL_DECAY_PER_SEC: f32 = 8.0;

    /// Multi-obstacle pattern gating
    pub const PATTERN_MIN_ELAPSED_S: f32 = 6.0;
    pub const PATTERN_CHANCE_BASE: f64 = 0.1;
    pub const PATTERN_CHANCE_GAIN_PER_SEC: f64 = 0.005;
    pub const PATTERN_CHANCE_MAX: f64 = 0.4;
    pub const PATTERN_COOLDOWN_START_MS: f32 = 3000.0;
    pub const PATTERN_COOLDOWN_MIN_MS: f32 = 1500.0;
    pub const PATTERN_COOLDOWN_DECAY_PER_SEC: f32 = 20.0;

    /// Obstacle pool growth
    pub const AERIAL_UNLOCK_S: f32 = 5.0;
    pub const AERIAL_WEIGHT_S: f32 = 15.0;
    /// Aerial obstacles hover with their bottom edge at this height,
    /// so a duck (24px tall) passes underneath
    pub const AERIAL_CLEARANCE: f32 = 30.0;

    /// Power-up timer is re-armed to a uniform value in [5000, 9000) ms
    pub const POWERUP_DELAY_MIN_MS: f32 = 5000.0;
    pub const POWERUP_DELAY_MAX_MS: f32 = 9000.0;
    pub const POWERUP_PICKUP_DIST: f32 = 36.0;

    /// Coin cadence and odds
    pub const COIN_CADENCE_MS: f32 = 350.0;
    pub const COIN_CHANCE: f64 = 0.4;
    pub const BIG_COIN_CHANCE: f64 = 0.1;
    pub const COIN_VALUE: u32 = 10;
    pub const BIG_COIN_VALUE: u32 = 30;
    pub const COIN_PICKUP_DIST: f32 = 30.0;
    /// Heights coins and power-ups spawn at (ground, low-air, high-air)
    pub const PICKUP_LANES: [f32; 3] = [20.0, 60.0, 100.0];

    /// Magnet (granted by Boost) extends coin collection reach
    pub const MAGNET_RANGE: f32 = 110.0;
    /// Fraction of the gap the effective center is drawn toward a coin
    pub const MAGNET_PULL: f32 = 0.8;

    /// Collision outcomes
    pub const HIT_GRACE_MS: f32 = 1500.0;
    pub const HIT_PENALTY: u32 = 80;
    pub const NEAR_MISS_X: f32 = 18.0;
    pub const NEAR_MISS_Y: f32 = 26.0;
    pub const NEAR_MISS_COOLDOWN_MS: f32 = 400.0;
    pub const NEAR_MISS_BONUS: u32 = 30;

    /// Combo / fever economy
    pub const FEVER_COMBO_STEP: u32 = 15;
    pub const FEVER_DURATION_MS: f32 = 5000.0;
    /// Fever invincibility outlasts the multiplier slightly
    pub const FEVER_INVINCIBLE_MS: f32 = 5500.0;
    pub const FEVER_MULTIPLIER: u32 = 15;
    /// Every 5th combo pays a lump bonus of combo * 10
    pub const COMBO_LUMP_STEP: u32 = 5;

    /// Distance milestones: first at 500, step grows by 250 per crossing
    pub const MILESTONE_FIRST: f32 = 500.0;
    pub const MILESTONE_STEP_FIRST: f32 = 500.0;
    pub const MILESTONE_STEP_GROWTH: f32 = 250.0;

    /// Timed power-up effects
    pub const BOOST_DURATION_MS: f32 = 3000.0;
    pub const BOOST_DISTANCE_MULT: f32 = 1.5;
    pub const DOUBLE_DURATION_MS: f32 = 5000.0;

    /// Countdown before the race starts: 3 steps of 800ms
    pub const COUNTDOWN_STEP_MS: f32 = 800.0;
    pub const COUNTDOWN_STEPS: u32 = 3;
}
