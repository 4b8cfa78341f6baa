//! Slime Race entry point
//!
//! Headless autoplay: runs one full session against a stub host and dumps
//! the final snapshot as JSON. The simulation itself is platform-free; a
//! renderer front-end drives `SessionController` the same way this does.

use slime_race::consts::*;
use slime_race::{
    Character, FinalizeRequest, HostError, RaceHost, RacePhase, RaceReward, SessionController,
    TickInput,
};

/// Stand-in for the real backend: a fixed attempt quota and a flat reward.
struct LocalHost {
    attempts: u32,
}

impl RaceHost for LocalHost {
    fn attempts_remaining(&self) -> u32 {
        self.attempts
    }

    fn submit_result(&mut self, request: &FinalizeRequest) -> Result<RaceReward, HostError> {
        self.attempts = self.attempts.saturating_sub(1);
        Ok(RaceReward {
            score: request.final_score,
            gold_reward: request.final_score / 20,
            exp_reward: request.final_score / 50,
        })
    }
}

fn main() {
    env_logger::init();
    log::info!("Slime Race (headless) starting...");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = SessionController::new(LocalHost { attempts: 3 }, seed);

    let started = session.start(Character {
        id: 1,
        name: "Mint".into(),
        color: "#8fd14f".into(),
    });
    if !started {
        log::error!("could not start a session");
        return;
    }

    // Autopilot until the run ends; cap at 2 minutes of sim time
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let max_ticks = (120_000.0 / TICK_MS) as u32;
    for _ in 0..max_ticks {
        session.advance(&input);
        if session.phase() == RacePhase::Result {
            break;
        }
    }
    if session.phase() != RacePhase::Result {
        session.request_stop();
    }

    let snapshot = session.snapshot();
    println!(
        "race over: score {} (max combo {}) after {:.1}s, {:.0} px travelled",
        snapshot.score,
        snapshot.max_combo,
        snapshot.elapsed_ms / 1000.0,
        snapshot.distance,
    );
    if let Some(reward) = session.reward() {
        println!(
            "reward: {} gold, {} exp",
            reward.gold_reward, reward.exp_reward
        );
    }

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
