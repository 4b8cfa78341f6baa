//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, carried inside the state
//! - Stable iteration order (by entity ID)
//! - No rendering, timers, or platform dependencies

pub mod collision;
pub mod physics;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, ObstacleOutcome, player_hitbox};
pub use snapshot::RaceSnapshot;
pub use state::{
    Coin, ComboState, Obstacle, ObstacleKind, Player, PowerUp, PowerUpKind, RaceClock, RacePhase,
    RaceState,
};
pub use tick::{TickInput, tick};
