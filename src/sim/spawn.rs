//! Procedural content spawning with a time-based difficulty ramp
//!
//! Obstacles fire from an accumulating timer whose interval shrinks with
//! elapsed time; multi-obstacle patterns unlock after 6 seconds behind a
//! probability roll and a cooldown; the obstacle pool grows as the run goes
//! on. Power-ups and coins run on their own independent timers. All
//! randomness comes from the seeded RNG carried in the state.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Obstacle, ObstacleKind, PowerUp, PowerUpKind, RaceState};
use crate::consts::*;

/// Run every spawner for one tick. Called only while `Playing`.
pub fn run(state: &mut RaceState, dt_ms: f32) {
    spawn_obstacles(state, dt_ms);
    spawn_powerups(state, dt_ms);
    spawn_coins(state, dt_ms);
}

/// Current obstacle spawn interval: shrinks from 1200ms, floored at 350ms.
pub fn spawn_interval_ms(elapsed_s: f32) -> f32 {
    (SPAWN_INTERVAL_START_MS - elapsed_s * SPAWN_INTERVAL_DECAY_PER_SEC)
        .max(SPAWN_INTERVAL_MIN_MS)
}

fn spawn_obstacles(state: &mut RaceState, dt_ms: f32) {
    state.spawn.pattern_cooldown_ms = (state.spawn.pattern_cooldown_ms - dt_ms).max(0.0);
    state.spawn.obstacle_timer_ms += dt_ms;

    let elapsed_s = state.clock.elapsed_secs();
    if state.spawn.obstacle_timer_ms <= spawn_interval_ms(elapsed_s) {
        return;
    }
    state.spawn.obstacle_timer_ms = 0.0;

    let pattern_chance = (PATTERN_CHANCE_BASE + elapsed_s as f64 * PATTERN_CHANCE_GAIN_PER_SEC)
        .min(PATTERN_CHANCE_MAX);
    let pattern_ready =
        elapsed_s > PATTERN_MIN_ELAPSED_S && state.spawn.pattern_cooldown_ms <= 0.0;

    if pattern_ready && state.rng.random_bool(pattern_chance) {
        emit_pattern(state);
        state.spawn.pattern_cooldown_ms =
            (PATTERN_COOLDOWN_START_MS - elapsed_s * PATTERN_COOLDOWN_DECAY_PER_SEC)
                .max(PATTERN_COOLDOWN_MIN_MS);
    } else {
        let kind = draw_kind(state);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, kind, SPAWN_X));
    }
}

/// Emit one of the four fixed multi-obstacle patterns at staggered offsets.
fn emit_pattern(state: &mut RaceState) {
    use ObstacleKind::*;

    let sequence: &[(ObstacleKind, f32)] = match state.rng.random_range(0..4u32) {
        // Ground then aerial: jump, then drop into a duck
        0 => &[(Rock, 0.0), (Bird, 110.0)],
        // Ground triple: forces a double jump or two quick hops
        1 => &[(Spike, 0.0), (Spike, 90.0), (Spike, 180.0)],
        // Aerial then ground
        2 => &[(Bee, 0.0), (Stump, 120.0)],
        // Aerial double
        _ => &[(Bird, 0.0), (Bird, 100.0)],
    };

    for &(kind, dx) in sequence {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, kind, SPAWN_X + dx));
    }
    log::debug!(
        "pattern emitted at {:.1}s ({} obstacles)",
        state.clock.elapsed_secs(),
        sequence.len()
    );
}

/// Draw a single obstacle kind from the pool for the current elapsed time.
/// Ground kinds are always in; aerial kinds join after 5s and are entered
/// twice after 15s so they dominate the draw (deliberate weighting).
fn draw_kind(state: &mut RaceState) -> ObstacleKind {
    use ObstacleKind::*;

    let elapsed_s = state.clock.elapsed_secs();
    let mut pool = vec![Rock, Spike, Stump];
    if elapsed_s > AERIAL_UNLOCK_S {
        pool.extend([Bird, Bee]);
    }
    if elapsed_s > AERIAL_WEIGHT_S {
        pool.extend([Bird, Bee]);
    }
    pool[state.rng.random_range(0..pool.len())]
}

fn spawn_powerups(state: &mut RaceState, dt_ms: f32) {
    state.spawn.powerup_timer_ms -= dt_ms;
    if state.spawn.powerup_timer_ms > 0.0 {
        return;
    }
    state.spawn.powerup_timer_ms = state
        .rng
        .random_range(POWERUP_DELAY_MIN_MS..POWERUP_DELAY_MAX_MS);

    let kind = draw_powerup_kind(state);
    let lane = PICKUP_LANES[state.rng.random_range(0..PICKUP_LANES.len())];
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(SPAWN_X, lane),
        collected: false,
    });
}

/// Heart is pointless at full hp, so it leaves the draw pool there.
fn draw_powerup_kind(state: &mut RaceState) -> PowerUpKind {
    use PowerUpKind::*;

    let mut pool = vec![Boost, Shield, Double];
    if state.player.hp < MAX_HP {
        pool.push(Heart);
    }
    pool[state.rng.random_range(0..pool.len())]
}

fn spawn_coins(state: &mut RaceState, dt_ms: f32) {
    state.spawn.coin_timer_ms += dt_ms;
    while state.spawn.coin_timer_ms >= COIN_CADENCE_MS {
        state.spawn.coin_timer_ms -= COIN_CADENCE_MS;
        if !state.rng.random_bool(COIN_CHANCE) {
            continue;
        }
        let big = state.rng.random_bool(BIG_COIN_CHANCE);
        let lane = PICKUP_LANES[state.rng.random_range(0..PICKUP_LANES.len())];
        let id = state.next_entity_id();
        state.coins.push(Coin {
            id,
            pos: Vec2::new(SPAWN_X, lane),
            big,
            collected: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RacePhase;

    fn playing_state(seed: u64) -> RaceState {
        let mut state = RaceState::new(seed);
        state.phase = RacePhase::Playing;
        state
    }

    #[test]
    fn interval_shrinks_and_floors() {
        assert_eq!(spawn_interval_ms(0.0), 1200.0);
        assert!(spawn_interval_ms(30.0) < 1200.0);
        // Far past the crossover the floor holds
        assert_eq!(spawn_interval_ms(500.0), 350.0);
    }

    #[test]
    fn first_obstacle_appears_after_the_initial_interval() {
        let mut state = playing_state(42);
        let mut ticks = 0;
        while state.obstacles.is_empty() && ticks < 200 {
            spawn_obstacles(&mut state, TICK_MS);
            ticks += 1;
        }
        // 1200ms / 16ms = 75 ticks to exceed the interval
        assert_eq!(ticks, 76);
    }

    #[test]
    fn no_aerial_obstacles_before_unlock() {
        let mut state = playing_state(42);
        for _ in 0..200 {
            let kind = draw_kind(&mut state);
            assert!(!kind.is_aerial(), "aerial kind drawn before 5s: {kind:?}");
        }
    }

    #[test]
    fn aerial_obstacles_join_the_pool_after_unlock() {
        let mut state = playing_state(42);
        state.clock.elapsed_ms = 8_000.0;
        let aerial = (0..200)
            .filter(|_| draw_kind(&mut state).is_aerial())
            .count();
        assert!(aerial > 0);
        // 2 aerial entries out of 5: roughly 40% of draws
        assert!(aerial < 150);
    }

    #[test]
    fn late_pool_weights_aerial_kinds_heavier() {
        let mut early = playing_state(7);
        early.clock.elapsed_ms = 8_000.0;
        let early_aerial = (0..1000)
            .filter(|_| draw_kind(&mut early).is_aerial())
            .count();

        let mut late = playing_state(7);
        late.clock.elapsed_ms = 20_000.0;
        let late_aerial = (0..1000)
            .filter(|_| draw_kind(&mut late).is_aerial())
            .count();

        // 2/5 of the pool early, 4/7 late
        assert!(late_aerial > early_aerial);
    }

    #[test]
    fn patterns_emit_multiple_obstacles_and_arm_the_cooldown() {
        let mut state = playing_state(42);
        state.clock.elapsed_ms = 10_000.0;
        emit_pattern(&mut state);
        assert!(state.obstacles.len() >= 2 && state.obstacles.len() <= 3);
        for obstacle in &state.obstacles {
            assert!(obstacle.pos.x >= SPAWN_X);
            assert!(!obstacle.hit);
        }
    }

    #[test]
    fn heart_excluded_at_full_hp() {
        let mut state = playing_state(42);
        assert_eq!(state.player.hp, MAX_HP);
        for _ in 0..200 {
            assert_ne!(draw_powerup_kind(&mut state), PowerUpKind::Heart);
        }

        state.player.hp = 1;
        let hearts = (0..200)
            .filter(|_| draw_powerup_kind(&mut state) == PowerUpKind::Heart)
            .count();
        assert!(hearts > 0);
    }

    #[test]
    fn powerup_timer_rearms_into_the_configured_window() {
        let mut state = playing_state(42);
        state.spawn.powerup_timer_ms = 0.0;
        spawn_powerups(&mut state, TICK_MS);
        assert_eq!(state.powerups.len(), 1);
        assert!(state.spawn.powerup_timer_ms >= POWERUP_DELAY_MIN_MS);
        assert!(state.spawn.powerup_timer_ms < POWERUP_DELAY_MAX_MS);
    }

    #[test]
    fn coin_cadence_rolls_at_350ms() {
        let mut state = playing_state(42);
        // 35 seconds worth of cadence: 100 rolls at 40% each
        for _ in 0..(35_000 / TICK_MS as u32) {
            spawn_coins(&mut state, TICK_MS);
        }
        let total = state.coins.len();
        assert!((20..=60).contains(&total), "unexpected coin count {total}");
        let big = state.coins.iter().filter(|c| c.big).count();
        assert!(big < total / 2);
    }

    #[test]
    fn same_seed_spawns_identically() {
        let mut a = playing_state(99);
        let mut b = playing_state(99);
        for _ in 0..2000 {
            a.clock.elapsed_ms += TICK_MS;
            b.clock.elapsed_ms += TICK_MS;
            run(&mut a, TICK_MS);
            run(&mut b, TICK_MS);
        }
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.coins.len(), b.coins.len());
        for (x, y) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.pos, y.pos);
        }
    }
}
