//! Session orchestration and the host seam
//!
//! Drives select -> countdown -> playing -> result around the pure tick
//! function. All host traffic (quota check, score submission) happens here,
//! at phase boundaries, never inside the tick path. Finalization is latched
//! so re-entrant termination paths submit at most once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;
use crate::sim::{RacePhase, RaceSnapshot, RaceState, TickInput, tick};

/// A selectable runner. Purely cosmetic; no gameplay-affecting stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    /// Display tint, e.g. "#8fd14f"
    pub color: String,
}

/// One-shot result submission payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub character_id: u32,
    pub final_score: u32,
}

/// Server response to a finalized race
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceReward {
    pub score: u32,
    pub gold_reward: u32,
    pub exp_reward: u32,
}

/// Host-side failure. Always recoverable: the session still reaches its
/// result with the locally computed score and zero reward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Transport-level failure (timeout, connection drop)
    Network(String),
    /// Server rejected the submission
    Server(u16),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Network(msg) => write!(f, "network failure: {msg}"),
            HostError::Server(code) => write!(f, "server rejected submission ({code})"),
        }
    }
}

impl std::error::Error for HostError {}

/// What the surrounding app provides: the attempts quota and the score
/// submission endpoint.
pub trait RaceHost {
    fn attempts_remaining(&self) -> u32;
    fn submit_result(&mut self, request: &FinalizeRequest) -> Result<RaceReward, HostError>;
}

/// Top-level state machine owning one race state at a time.
pub struct SessionController<H: RaceHost> {
    host: H,
    state: RaceState,
    seed: u64,
    character: Option<Character>,
    finalized: bool,
    reward: Option<RaceReward>,
}

impl<H: RaceHost> SessionController<H> {
    pub fn new(host: H, seed: u64) -> Self {
        Self {
            host,
            state: RaceState::new(seed),
            seed,
            character: None,
            finalized: false,
            reward: None,
        }
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn phase(&self) -> RacePhase {
        self.state.phase
    }

    /// Reward from the finalized race, if any. Zero reward after a host
    /// failure.
    pub fn reward(&self) -> Option<RaceReward> {
        self.reward
    }

    /// Read-only view for the renderer.
    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot::capture(&self.state)
    }

    /// Attempt select -> countdown. Refused silently (no side effects) when
    /// the quota is exhausted or a race is already underway. On success every
    /// simulation field resets to initial values.
    pub fn start(&mut self, character: Character) -> bool {
        if self.state.phase != RacePhase::Select {
            return false;
        }
        if self.host.attempts_remaining() == 0 {
            log::info!("quota exhausted, staying in select");
            return false;
        }

        // New seed per session so consecutive runs differ but stay replayable
        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state = RaceState::new(self.seed);
        self.finalized = false;
        self.reward = None;
        log::info!("session started as {} (seed {})", character.name, self.seed);
        self.character = Some(character);
        self.state.begin_countdown();
        true
    }

    /// Run one fixed 16ms step. A stale call after the race ended is a no-op
    /// apart from re-checking the finalize latch.
    pub fn advance(&mut self, input: &TickInput) {
        tick(&mut self.state, input, TICK_MS);
        if self.state.phase == RacePhase::Result {
            self.finalize();
        }
    }

    /// External stop. Ends a running race (finalizing it); aborts a countdown
    /// back to select without consuming the attempt.
    pub fn request_stop(&mut self) {
        match self.state.phase {
            RacePhase::Playing => {
                self.state.phase = RacePhase::Result;
                self.finalize();
            }
            RacePhase::Countdown => {
                self.state = RaceState::new(self.seed);
                self.character = None;
            }
            RacePhase::Select | RacePhase::Result => {}
        }
    }

    /// Back to character select after a finished race.
    pub fn reset(&mut self) {
        if self.state.phase == RacePhase::Result {
            self.state = RaceState::new(self.seed);
            self.character = None;
        }
    }

    /// One-shot score submission. The latch makes re-entrant termination
    /// paths (hp hitting zero inside a tick that also reports a stop) submit
    /// at most once.
    fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        let request = FinalizeRequest {
            character_id: self.character.as_ref().map(|c| c.id).unwrap_or(0),
            final_score: self.state.score,
        };
        match self.host.submit_result(&request) {
            Ok(reward) => {
                log::info!(
                    "race finalized: score {} gold {} exp {}",
                    reward.score,
                    reward.gold_reward,
                    reward.exp_reward
                );
                self.reward = Some(reward);
            }
            Err(err) => {
                // Recoverable: keep the local score, zero reward
                log::warn!("finalize failed ({err}), keeping local result");
                self.reward = Some(RaceReward {
                    score: self.state.score,
                    gold_reward: 0,
                    exp_reward: 0,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Obstacle, ObstacleKind};

    /// Scripted host for tests: counts submissions, optionally fails.
    struct StubHost {
        attempts: u32,
        fail: bool,
        submissions: Vec<FinalizeRequest>,
    }

    impl StubHost {
        fn new(attempts: u32) -> Self {
            Self {
                attempts,
                fail: false,
                submissions: Vec::new(),
            }
        }
    }

    impl RaceHost for StubHost {
        fn attempts_remaining(&self) -> u32 {
            self.attempts
        }

        fn submit_result(&mut self, request: &FinalizeRequest) -> Result<RaceReward, HostError> {
            self.submissions.push(request.clone());
            if self.fail {
                return Err(HostError::Network("offline".into()));
            }
            Ok(RaceReward {
                score: request.final_score,
                gold_reward: 100,
                exp_reward: 50,
            })
        }
    }

    fn slime() -> Character {
        Character {
            id: 7,
            name: "Mint".into(),
            color: "#8fd14f".into(),
        }
    }

    fn run_to_playing<H: RaceHost>(session: &mut SessionController<H>) {
        let steps = (COUNTDOWN_STEPS as f32 * COUNTDOWN_STEP_MS / TICK_MS).ceil() as u32 + 1;
        for _ in 0..steps {
            session.advance(&TickInput::default());
        }
        assert_eq!(session.phase(), RacePhase::Playing);
    }

    /// Drop the player to 1 hp, put them on the ground, and park a rock on
    /// them so the next tick ends the race.
    fn force_race_over<H: RaceHost>(session: &mut SessionController<H>) {
        session.state.player.hp = 1;
        session.state.player.jump_y = 0.0;
        session.state.player.jump_velocity = 0.0;
        session.state.player.jump_count = 0;
        session.state.player.invincible_ms = 0.0;
        session.state.player.shield = false;
        session.state.obstacles.clear();
        let id = session.state.next_entity_id();
        session
            .state
            .obstacles
            .push(Obstacle::new(id, ObstacleKind::Rock, PLAYER_X));
        session.advance(&TickInput::default());
        assert_eq!(session.phase(), RacePhase::Result);
    }

    #[test]
    fn start_enters_countdown_when_quota_allows() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        assert!(session.start(slime()));
        assert_eq!(session.phase(), RacePhase::Countdown);
    }

    #[test]
    fn quota_exhausted_start_is_refused_silently() {
        // Scenario D
        let mut session = SessionController::new(StubHost::new(0), 1);
        assert!(!session.start(slime()));
        assert_eq!(session.phase(), RacePhase::Select);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().time_ticks, 0);
        assert!(session.host().submissions.is_empty());
    }

    #[test]
    fn start_during_a_race_is_refused() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        assert!(session.start(slime()));
        assert!(!session.start(slime()));
    }

    #[test]
    fn finalize_fires_exactly_once() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        session.start(slime());
        run_to_playing(&mut session);
        force_race_over(&mut session);

        // Stale ticks after the end must not re-submit
        for _ in 0..10 {
            session.advance(&TickInput::default());
        }
        assert_eq!(session.host().submissions.len(), 1);
        assert_eq!(session.host().submissions[0].character_id, 7);
        assert_eq!(session.reward().unwrap().gold_reward, 100);
    }

    #[test]
    fn host_failure_finalizes_locally_with_zero_reward() {
        let mut host = StubHost::new(3);
        host.fail = true;
        let mut session = SessionController::new(host, 1);
        session.start(slime());
        run_to_playing(&mut session);
        session.state.score = 555;
        force_race_over(&mut session);

        let reward = session.reward().unwrap();
        // Penalty came off the local score before the race ended
        assert_eq!(reward.score, 555 - HIT_PENALTY);
        assert_eq!(reward.gold_reward, 0);
        assert_eq!(reward.exp_reward, 0);
        assert_eq!(session.host().submissions.len(), 1);
    }

    #[test]
    fn stop_during_play_finalizes() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        session.start(slime());
        run_to_playing(&mut session);
        session.request_stop();
        assert_eq!(session.phase(), RacePhase::Result);
        assert_eq!(session.host().submissions.len(), 1);

        // Stop again: latch holds
        session.request_stop();
        assert_eq!(session.host().submissions.len(), 1);
    }

    #[test]
    fn stop_during_countdown_aborts_without_submitting() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        session.start(slime());
        session.request_stop();
        assert_eq!(session.phase(), RacePhase::Select);
        assert!(session.host().submissions.is_empty());
    }

    #[test]
    fn new_session_resets_every_field() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        session.start(slime());
        run_to_playing(&mut session);
        for _ in 0..300 {
            session.advance(&TickInput { idle_mode: true, ..Default::default() });
        }
        force_race_over(&mut session);
        session.reset();
        assert_eq!(session.phase(), RacePhase::Select);

        assert!(session.start(slime()));
        let state = session.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.player.hp, MAX_HP);
        assert_eq!(state.combo.combo, 0);
        assert_eq!(state.combo.max_combo, 0);
        assert_eq!(state.clock.distance, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.coins.is_empty());
    }

    #[test]
    fn snapshot_is_exposed_every_phase() {
        let mut session = SessionController::new(StubHost::new(3), 1);
        assert_eq!(session.snapshot().phase, RacePhase::Select);
        session.start(slime());
        assert_eq!(session.snapshot().countdown_step, 3);
        run_to_playing(&mut session);
        let snap = session.snapshot();
        assert_eq!(snap.phase, RacePhase::Playing);
        assert_eq!(snap.player.hp, MAX_HP);
    }
}
