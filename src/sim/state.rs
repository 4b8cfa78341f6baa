//! Race state and core simulation types
//!
//! Everything the simulation mutates lives in [`RaceState`]; it is fully
//! serializable so a run can be captured and replayed deterministically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a race session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Choosing a character, no simulation running
    Select,
    /// Pre-race countdown (3..2..1)
    Countdown,
    /// Tick loop active
    Playing,
    /// Terminal; entered once, finalized once
    Result,
}

/// Obstacle flavors. Ground kinds must be jumped, aerial kinds ducked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Spike,
    Stump,
    Bird,
    Bee,
}

impl ObstacleKind {
    pub fn is_aerial(&self) -> bool {
        matches!(self, ObstacleKind::Bird | ObstacleKind::Bee)
    }

    /// Hitbox size (width, height) in track pixels
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Rock => Vec2::new(36.0, 32.0),
            ObstacleKind::Spike => Vec2::new(28.0, 36.0),
            ObstacleKind::Stump => Vec2::new(30.0, 44.0),
            ObstacleKind::Bird => Vec2::new(34.0, 26.0),
            ObstacleKind::Bee => Vec2::new(26.0, 24.0),
        }
    }
}

/// A scrolling obstacle. `pos` is the left/bottom corner of the hitbox
/// (y is height above the ground line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Latched once the obstacle has produced its one collision outcome
    /// (hit, shielded hit, or dodge). Never cleared.
    pub hit: bool,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, x: f32) -> Self {
        let y = if kind.is_aerial() { AERIAL_CLEARANCE } else { 0.0 };
        Self {
            id,
            kind,
            pos: Vec2::new(x, y),
            size: kind.size(),
            hit: false,
        }
    }

    pub fn aerial(&self) -> bool {
        self.kind.is_aerial()
    }
}

/// Power-up flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Distance multiplier + coin magnet for a few seconds
    Boost,
    /// One-shot hit block
    Shield,
    /// +1 hp (never offered at full hp)
    Heart,
    /// 2x score for a few seconds
    Double,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Latched on pickup; a collected power-up is never re-evaluated
    pub collected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    /// Big coins are worth 3x
    pub big: bool,
    pub collected: bool,
}

impl Coin {
    pub fn value(&self) -> u32 {
        if self.big { BIG_COIN_VALUE } else { COIN_VALUE }
    }
}

/// The player slime. `jump_y` is height above ground; velocity is negative
/// while rising (screen convention, integrated as `jump_y -= velocity`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub hp: u8,
    pub jump_y: f32,
    pub jump_velocity: f32,
    /// 0 = grounded, 1 = first jump used, 2 = double jump used
    pub jump_count: u8,
    pub ducking: bool,
    pub duck_timer_ms: f32,
    /// Post-hit grace / fever invincibility countdown
    pub invincible_ms: f32,
    /// One-shot block, consumed by the next unavoided overlap
    pub shield: bool,
    pub boost_ms: f32,
    pub magnet_ms: f32,
    pub double_score_ms: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            hp: MAX_HP,
            jump_y: 0.0,
            jump_velocity: 0.0,
            jump_count: 0,
            ducking: false,
            duck_timer_ms: 0.0,
            invincible_ms: 0.0,
            shield: false,
            boost_ms: 0.0,
            magnet_ms: 0.0,
            double_score_ms: 0.0,
        }
    }
}

impl Player {
    pub fn grounded(&self) -> bool {
        self.jump_y <= 0.0 && self.jump_count == 0
    }

    pub fn invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_ms > 0.0
    }

    pub fn double_active(&self) -> bool {
        self.double_score_ms > 0.0
    }
}

/// Dodge streak and fever bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboState {
    pub combo: u32,
    /// Running maximum of `combo` over the session
    pub max_combo: u32,
    pub fever_active: bool,
    pub fever_timer_ms: f32,
}

/// Elapsed time, scroll speed and distance accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceClock {
    pub elapsed_ms: f32,
    /// Pixels per tick; monotone non-decreasing function of elapsed time
    pub speed: f32,
    pub distance: f32,
    pub next_milestone: f32,
    pub milestone_step: f32,
}

impl Default for RaceClock {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            speed: BASE_SPEED,
            distance: 0.0,
            next_milestone: MILESTONE_FIRST,
            milestone_step: MILESTONE_STEP_FIRST,
        }
    }
}

impl RaceClock {
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_ms / 1000.0
    }
}

/// Spawner timers, all tick-driven countdowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnState {
    /// Accumulates dt; fires when it exceeds the current spawn interval
    pub obstacle_timer_ms: f32,
    /// Countdown blocking the next multi-obstacle pattern
    pub pattern_cooldown_ms: f32,
    /// Countdown to the next power-up, re-armed randomly on fire
    pub powerup_timer_ms: f32,
    /// Fixed-cadence coin roll accumulator
    pub coin_timer_ms: f32,
}

impl Default for SpawnState {
    fn default() -> Self {
        Self {
            obstacle_timer_ms: 0.0,
            pattern_cooldown_ms: 0.0,
            powerup_timer_ms: POWERUP_DELAY_MIN_MS,
            coin_timer_ms: 0.0,
        }
    }
}

/// Complete race state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, carried in-state so replays are exact
    pub rng: Pcg32,
    pub phase: RacePhase,
    /// Countdown remaining before Playing (3 steps of 800ms)
    pub countdown_ms: f32,
    pub clock: RaceClock,
    pub player: Player,
    pub combo: ComboState,
    pub score: u32,
    pub spawn: SpawnState,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<PowerUp>,
    pub coins: Vec<Coin>,
    /// Blocks a second near-miss bonus inside a short window
    pub near_miss_cooldown_ms: f32,
    /// Tick counter, for logs and tests
    pub time_ticks: u64,
    next_id: u32,
}

impl RaceState {
    /// Fresh state in `Select`, every field at initial values
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RacePhase::Select,
            countdown_ms: 0.0,
            clock: RaceClock::default(),
            player: Player::default(),
            combo: ComboState::default(),
            score: 0,
            spawn: SpawnState::default(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            coins: Vec::new(),
            near_miss_cooldown_ms: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin the pre-race countdown. The session layer checks the quota
    /// before calling this.
    pub fn begin_countdown(&mut self) {
        self.phase = RacePhase::Countdown;
        self.countdown_ms = COUNTDOWN_STEPS as f32 * COUNTDOWN_STEP_MS;
    }

    /// Countdown step currently displayed (3, 2, 1), 0 once racing
    pub fn countdown_step(&self) -> u32 {
        (self.countdown_ms / COUNTDOWN_STEP_MS).ceil() as u32
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
        self.powerups.sort_by_key(|p| p.id);
        self.coins.sort_by_key(|c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_in_select_with_full_hp() {
        let state = RaceState::new(7);
        assert_eq!(state.phase, RacePhase::Select);
        assert_eq!(state.player.hp, MAX_HP);
        assert_eq!(state.score, 0);
        assert_eq!(state.combo.combo, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn countdown_steps_count_down() {
        let mut state = RaceState::new(7);
        state.begin_countdown();
        assert_eq!(state.phase, RacePhase::Countdown);
        assert_eq!(state.countdown_step(), 3);
        state.countdown_ms = COUNTDOWN_STEP_MS * 1.5;
        assert_eq!(state.countdown_step(), 2);
        state.countdown_ms = 10.0;
        assert_eq!(state.countdown_step(), 1);
    }

    #[test]
    fn aerial_obstacles_hover_at_clearance_height() {
        let bird = Obstacle::new(1, ObstacleKind::Bird, 500.0);
        assert!(bird.aerial());
        assert_eq!(bird.pos.y, AERIAL_CLEARANCE);

        let rock = Obstacle::new(2, ObstacleKind::Rock, 500.0);
        assert!(!rock.aerial());
        assert_eq!(rock.pos.y, 0.0);
    }

    #[test]
    fn entity_ids_are_monotonic() {
        let mut state = RaceState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
