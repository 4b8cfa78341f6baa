//! Fixed timestep simulation tick
//!
//! One call advances the race by one 16ms step: spawn, physics, collision,
//! combo/fever, scoring, in that order. The phase is checked first so a tick
//! fired for a session that already ended is a no-op.

use super::state::{PowerUpKind, RacePhase, RaceState};
use super::{collision, physics, score, spawn};
use crate::consts::*;

/// Input signals for a single tick, pre-filtered by the host to edges only.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump edge (also double-jump while airborne; always cancels a duck)
    pub jump: bool,
    /// Duck edge (only takes effect while grounded)
    pub duck: bool,
    /// External stop request; ends the race this tick
    pub stop: bool,
    /// Autoplay for the headless demo and soak tests
    pub idle_mode: bool,
}

/// Advance the race state by one fixed timestep.
pub fn tick(state: &mut RaceState, input: &TickInput, dt_ms: f32) {
    match state.phase {
        // Nothing runs outside the race
        RacePhase::Select | RacePhase::Result => return,
        RacePhase::Countdown => {
            state.countdown_ms -= dt_ms;
            if state.countdown_ms <= 0.0 {
                state.countdown_ms = 0.0;
                state.phase = RacePhase::Playing;
                log::info!("countdown finished, race on (seed {})", state.seed);
            }
            return;
        }
        RacePhase::Playing => {}
    }

    state.time_ticks += 1;

    if input.stop {
        state.phase = RacePhase::Result;
        log::info!("race stopped at tick {}", state.time_ticks);
        return;
    }

    // Clock: speed ramps with elapsed time, boost multiplies distance gain
    state.clock.elapsed_ms += dt_ms;
    state.clock.speed =
        (BASE_SPEED + state.clock.elapsed_secs() * SPEED_GAIN_PER_SEC).min(MAX_SPEED);
    let distance_mult = if state.player.boost_ms > 0.0 {
        BOOST_DISTANCE_MULT
    } else {
        1.0
    };
    state.clock.distance += state.clock.speed * distance_mult;

    spawn::run(state, dt_ms);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    if input.jump {
        physics::jump(&mut state.player);
    } else if input.duck {
        physics::duck(&mut state.player);
    }
    physics::integrate(&mut state.player, dt_ms);

    // World scroll
    let scroll = state.clock.speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= scroll;
    }
    for powerup in &mut state.powerups {
        powerup.pos.x -= scroll;
    }
    for coin in &mut state.coins {
        coin.pos.x -= scroll;
    }

    state.near_miss_cooldown_ms = (state.near_miss_cooldown_ms - dt_ms).max(0.0);

    if resolve_obstacles(state) {
        // hp reached zero: the race ends immediately, nothing else this tick
        state.phase = RacePhase::Result;
        log::info!(
            "race over at tick {} (score {}, max combo {})",
            state.time_ticks,
            state.score,
            state.combo.max_combo
        );
        return;
    }

    collect_pickups(state);

    // Cull: obstacles once fully off the left edge, pickups also on collection
    state.obstacles.retain(|o| o.pos.x >= CULL_X);
    state.powerups.retain(|p| !p.collected && p.pos.x >= CULL_X);
    state.coins.retain(|c| !c.collected && c.pos.x >= CULL_X);

    score::accrue(state, dt_ms);

    state.normalize_order();
}

/// Test every live obstacle against the player and apply the outcome.
/// Returns true when hp reached zero.
fn resolve_obstacles(state: &mut RaceState) -> bool {
    use collision::ObstacleOutcome::*;

    let player_box = collision::player_hitbox(&state.player);

    for i in 0..state.obstacles.len() {
        if state.obstacles[i].hit {
            continue;
        }
        // Re-read per obstacle: a hit earlier in the loop grants grace that
        // covers the rest of the tick
        let invincible = state.player.invincible();
        let shielded = state.player.shield;

        match collision::classify_obstacle(&player_box, &state.obstacles[i], invincible, shielded) {
            Hit => {
                state.obstacles[i].hit = true;
                state.player.hp = state.player.hp.saturating_sub(1);
                state.player.invincible_ms = HIT_GRACE_MS;
                score::on_hit(state);
                log::debug!("hit by {:?}, hp {}", state.obstacles[i].kind, state.player.hp);
                if state.player.hp == 0 {
                    return true;
                }
            }
            ShieldedHit => {
                state.obstacles[i].hit = true;
                state.player.shield = false;
                log::debug!("shield absorbed {:?}", state.obstacles[i].kind);
            }
            Ignored | Pending => {}
            Dodge { near_miss } => {
                state.obstacles[i].hit = true;
                score::on_dodge(state);
                if near_miss && state.near_miss_cooldown_ms <= 0.0 {
                    score::on_near_miss(state);
                    state.near_miss_cooldown_ms = NEAR_MISS_COOLDOWN_MS;
                }
            }
        }
    }

    false
}

fn collect_pickups(state: &mut RaceState) {
    let center = collision::player_hitbox(&state.player).center();

    let mut collected: Vec<PowerUpKind> = Vec::new();
    for powerup in &mut state.powerups {
        if !powerup.collected && powerup.pos.distance(center) <= POWERUP_PICKUP_DIST {
            powerup.collected = true;
            collected.push(powerup.kind);
        }
    }
    for kind in collected {
        apply_powerup(state, kind);
    }

    let mut coin_values: Vec<u32> = Vec::new();
    for coin in &mut state.coins {
        if coin.collected {
            continue;
        }
        let reach = collision::effective_center(&state.player, coin.pos);
        if coin.pos.distance(reach) <= COIN_PICKUP_DIST {
            coin.collected = true;
            coin_values.push(coin.value());
        }
    }
    for value in coin_values {
        score::on_coin(state, value);
    }
}

fn apply_powerup(state: &mut RaceState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Boost => {
            state.player.boost_ms = BOOST_DURATION_MS;
            state.player.magnet_ms = BOOST_DURATION_MS;
        }
        PowerUpKind::Shield => state.player.shield = true,
        PowerUpKind::Heart => state.player.hp = (state.player.hp + 1).min(MAX_HP),
        PowerUpKind::Double => state.player.double_score_ms = DOUBLE_DURATION_MS,
    }
    log::debug!("collected power-up {kind:?}");
}

/// Demo-mode pilot: duck under the nearest aerial obstacle, jump the rest.
fn autopilot(state: &RaceState, input: &mut TickInput) {
    let leading_edge = PLAYER_X + PLAYER_STAND_W;
    let next = state
        .obstacles
        .iter()
        .filter(|o| !o.hit && o.pos.x + o.size.x >= PLAYER_X)
        .min_by(|a, b| {
            a.pos
                .x
                .partial_cmp(&b.pos.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(obstacle) = next {
        let gap = obstacle.pos.x - leading_edge;
        if obstacle.aerial() {
            if gap < state.clock.speed * 12.0 {
                input.duck = true;
                input.jump = false;
            }
        } else if (0.0..state.clock.speed * 9.0).contains(&gap) && state.player.grounded() {
            input.jump = true;
        }
    }
}
