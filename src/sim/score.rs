//! Combo streaks, fever mode, and the score economy
//!
//! Base score accrues every tick as `combo_multiplier x double_bonus x
//! fever_multiplier`; discrete bonuses (dodge lumps, near-misses, distance
//! milestones, coins) layer on top, and the hit penalty floors at zero.

use super::state::RaceState;
use crate::consts::*;

/// Step-function multiplier over the current combo count.
pub fn combo_multiplier(combo: u32) -> u32 {
    match combo {
        0..=2 => 1,
        3..=4 => 2,
        5..=9 => 3,
        10..=14 => 4,
        15..=19 => 5,
        _ => 6,
    }
}

fn double_bonus(state: &RaceState) -> u32 {
    if state.player.double_active() { 2 } else { 1 }
}

fn fever_multiplier(state: &RaceState) -> u32 {
    if state.combo.fever_active {
        FEVER_MULTIPLIER
    } else {
        1
    }
}

/// A successful dodge: extend the streak, pay the every-5th lump bonus,
/// and possibly start fever.
pub fn on_dodge(state: &mut RaceState) {
    state.combo.combo += 1;
    state.combo.max_combo = state.combo.max_combo.max(state.combo.combo);

    if state.combo.combo.is_multiple_of(COMBO_LUMP_STEP) {
        state.score += state.combo.combo * 10;
    }

    maybe_start_fever(state);
}

/// Fever activates exactly once per crossing of a multiple of 15, and never
/// while a fever is already running. Invincibility outlasts the multiplier.
fn maybe_start_fever(state: &mut RaceState) {
    let combo = state.combo.combo;
    if state.combo.fever_active || combo == 0 || !combo.is_multiple_of(FEVER_COMBO_STEP) {
        return;
    }
    state.combo.fever_active = true;
    state.combo.fever_timer_ms = FEVER_DURATION_MS;
    state.player.invincible_ms = state.player.invincible_ms.max(FEVER_INVINCIBLE_MS);
    log::info!("fever started at combo {combo}");
}

pub fn on_near_miss(state: &mut RaceState) {
    state.score += NEAR_MISS_BONUS;
}

/// An unshielded hit: streak resets, a capped penalty comes off the score.
/// Hp and the grace window are the collision step's business.
pub fn on_hit(state: &mut RaceState) {
    state.combo.combo = 0;
    state.score = state.score.saturating_sub(HIT_PENALTY);
}

/// A collected coin, scaled by the combo and double multipliers (fever does
/// not scale coins).
pub fn on_coin(state: &mut RaceState, value: u32) {
    state.score += value * combo_multiplier(state.combo.combo) * double_bonus(state);
}

/// End-of-tick accrual: run the fever timer, add the per-tick base rate,
/// and pay any distance milestones crossed this tick.
pub fn accrue(state: &mut RaceState, dt_ms: f32) {
    if state.combo.fever_active {
        state.combo.fever_timer_ms -= dt_ms;
        if state.combo.fever_timer_ms <= 0.0 {
            state.combo.fever_active = false;
            state.combo.fever_timer_ms = 0.0;
            log::info!("fever ended at tick {}", state.time_ticks);
        }
    }

    state.score += combo_multiplier(state.combo.combo) * double_bonus(state) * fever_multiplier(state);

    while state.clock.distance >= state.clock.next_milestone {
        let bonus = 2 * state.clock.next_milestone as u32;
        state.score += bonus;
        log::debug!(
            "milestone {} crossed, +{bonus}",
            state.clock.next_milestone
        );
        state.clock.next_milestone += state.clock.milestone_step;
        state.clock.milestone_step += MILESTONE_STEP_GROWTH;
    }
}
