//! Determinism verification.
//!
//! Plays the same seed several times in parallel and compares state hashes,
//! then checks that a game saved halfway and reloaded ends in the same state
//! as one played straight through.

use aurora_core::config::GameConfig;
use aurora_core::game::Game;
use aurora_core::save;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::runner::{play, RunOptions};

/// Outcome of a verification.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    /// Galaxy seed.
    pub seed: u64,
    /// Turns per run.
    pub turns: u32,
    /// Final hash of each run.
    pub hashes: Vec<u64>,
    /// Every run ended in the same state.
    pub deterministic: bool,
    /// A reload at the halfway turn ended in the same state.
    pub save_continuation: bool,
}

impl VerifyReport {
    /// Whether every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.deterministic && self.save_continuation
    }
}

fn explore_run(turns: u32) -> RunOptions {
    RunOptions {
        turns,
        explore: true,
        save: None,
    }
}

/// Runs `runs` copies of the game and the save continuation check.
///
/// A zero seed is resolved once so every run shares the same galaxy.
///
/// # Errors
///
/// Returns an error if the halfway save cannot be decoded.
pub fn verify_game(mut config: GameConfig, turns: u32, runs: usize) -> Result<VerifyReport> {
    let seed = Game::new(config.clone()).seed();
    config.galaxy.seed = seed;

    let hashes: Vec<u64> = (0..runs.max(1))
        .into_par_iter()
        .map(|_| {
            let mut game = Game::new(config.clone());
            play(&mut game, &explore_run(turns)).map(|summary| summary.state_hash)
        })
        .collect::<Result<_>>()?;
    let deterministic = hashes.windows(2).all(|pair| pair[0] == pair[1]);

    let half = turns / 2;
    let mut straight = Game::new(config.clone());
    play(&mut straight, &explore_run(turns))?;
    let mut first_half = Game::new(config.clone());
    play(&mut first_half, &explore_run(half))?;
    let mut reloaded = save::decode(&save::encode(&first_half), config)?;
    play(&mut reloaded, &explore_run(turns - half))?;
    let save_continuation = reloaded.state_hash() == straight.state_hash();

    if deterministic && save_continuation {
        tracing::info!(seed, turns, runs, "Determinism verified");
    } else {
        tracing::error!(seed, turns, deterministic, save_continuation, "Determinism check failed");
    }

    Ok(VerifyReport {
        seed,
        turns,
        hashes,
        deterministic,
        save_continuation,
    })
}
