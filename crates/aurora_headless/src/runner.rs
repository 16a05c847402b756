//! Plays a game for a number of turns without a front end.

use std::path::PathBuf;

use aurora_core::game::{Game, GameStatus};
use serde::Serialize;

use crate::error::Result;

/// How to play a headless game.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Turns to advance.
    pub turns: u32,
    /// Survey one system per turn, cycling through the galaxy.
    pub explore: bool,
    /// Where to save the game afterwards.
    pub save: Option<PathBuf>,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Galaxy seed.
    pub seed: u64,
    /// Turns played in this run.
    pub turns_played: u32,
    /// Final state hash.
    pub state_hash: u64,
    /// Final game status.
    pub status: GameStatus,
    /// Text of every turn and survey, in order.
    #[serde(skip)]
    pub log: Vec<String>,
}

impl RunSummary {
    /// Multi-line text report.
    #[must_use]
    pub fn to_text(&self) -> String {
        let status = &self.status;
        let mut lines = vec![
            format!("Seed: {}", self.seed),
            format!("Turns played: {} (now turn {})", self.turns_played, status.turn),
            format!("Explored systems: {}/{}", status.explored, status.systems),
            format!(
                "{}: {} colonies, population {}, {} ships, {} technologies",
                status.player.name,
                status.player.colonies,
                status.player.population,
                status.player.ships,
                status.player.researched
            ),
        ];
        for hostile in &status.hostiles {
            lines.push(format!(
                "{}: {} colonies, {} ships, war: {}",
                hostile.empire.name,
                hostile.empire.colonies,
                hostile.empire.ships,
                if hostile.at_war { "yes" } else { "no" }
            ));
        }
        lines.push(format!("State hash: {:016x}", self.state_hash));
        lines.join("\n")
    }
}

/// Advances `game` according to `options`.
///
/// With exploration on, the system at index `turn % systems` is surveyed
/// before each turn, which eventually contacts every hostile.
///
/// # Errors
///
/// Returns an error only if the final save fails.
pub fn play(game: &mut Game, options: &RunOptions) -> Result<RunSummary> {
    let mut log = Vec::new();
    for _ in 0..options.turns {
        if options.explore {
            let index = game.turn() as usize % game.galaxy().len().max(1);
            if let Some(name) = game.galaxy().systems().get(index).map(|sys| sys.name.clone()) {
                log.push(game.explore_system(&name));
            }
        }
        log.push(game.advance_turn());
    }
    tracing::info!(
        seed = game.seed(),
        turn = game.turn(),
        turns = options.turns,
        "Headless run finished"
    );

    if let Some(path) = &options.save {
        game.save(path)?;
    }

    Ok(RunSummary {
        seed: game.seed(),
        turns_played: options.turns,
        state_hash: game.state_hash(),
        status: game.status(),
        log,
    })
}
