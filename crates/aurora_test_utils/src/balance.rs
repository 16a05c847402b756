//! Balance testing utilities.
//!
//! Runs many seeded duels between fleets to check that ship classes line up
//! the way their hull tables suggest.

use aurora_core::combat::{Combat, Side, Victory};
use aurora_core::ships::ShipClass;

use crate::fixtures::{fleet_of, seeded_rng};

/// Result of a simulated battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    /// Winning side.
    pub winner: Side,
    /// How the battle was decided.
    pub victory: Victory,
    /// Rounds fought.
    pub rounds: u32,
    /// Starting strength of the attacker.
    pub strength_a: u64,
    /// Starting strength of the defender.
    pub strength_b: u64,
    /// Remaining strength of the attacker.
    pub remaining_a: u64,
    /// Remaining strength of the defender.
    pub remaining_b: u64,
}

/// Statistics for a set of battles.
#[derive(Debug, Clone, Default)]
pub struct BattleStats {
    /// Total battles run.
    pub total_battles: u32,
    /// Wins for the attacker.
    pub wins_a: u32,
    /// Wins for the defender.
    pub wins_b: u32,
    /// Battles decided by attrition.
    pub attrition: u32,
    /// Average rounds to resolution.
    pub avg_rounds: f64,
}

impl BattleStats {
    /// Win rate for the attacker (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_a(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.wins_a) / f64::from(self.total_battles)
    }

    /// Win rate for the defender (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_b(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.wins_b) / f64::from(self.total_battles)
    }

    /// Check if the matchup is balanced (attacker rate within range).
    #[must_use]
    pub fn is_balanced(&self, min_rate: f64, max_rate: f64) -> bool {
        let rate = self.win_rate_a();
        rate >= min_rate && rate <= max_rate
    }

    fn record(&mut self, result: &BattleResult) {
        let previous = self.avg_rounds * f64::from(self.total_battles);
        self.total_battles += 1;
        match result.winner {
            Side::Attacker => self.wins_a += 1,
            Side::Defender => self.wins_b += 1,
        }
        if result.victory == Victory::Attrition {
            self.attrition += 1;
        }
        self.avg_rounds = (previous + f64::from(result.rounds)) / f64::from(self.total_battles);
    }
}

/// Fights one seeded battle between two baseline fleets.
#[must_use]
pub fn run_battle(a: &[ShipClass], b: &[ShipClass], max_rounds: u32, seed: u64) -> BattleResult {
    let mut red = fleet_of("Red", "Red Empire", a);
    let mut blue = fleet_of("Blue", "Blue Empire", b);
    let strength_a = red.combat_strength();
    let strength_b = blue.combat_strength();

    let mut rng = seeded_rng(seed);
    let outcome = Combat::new(&mut red, &mut blue)
        .with_max_rounds(max_rounds)
        .resolve(&mut rng);

    BattleResult {
        winner: outcome.winner,
        victory: outcome.victory,
        rounds: outcome.rounds,
        strength_a,
        strength_b,
        remaining_a: red.combat_strength(),
        remaining_b: blue.combat_strength(),
    }
}

/// Fights `battles` seeded battles and aggregates the results.
#[must_use]
pub fn run_matchup(a: &[ShipClass], b: &[ShipClass], max_rounds: u32, battles: u32) -> BattleStats {
    let mut stats = BattleStats::default();
    for seed in 0..u64::from(battles) {
        stats.record(&run_battle(a, b, max_rounds, seed));
    }
    tracing::debug!(
        battles,
        wins_a = stats.wins_a,
        wins_b = stats.wins_b,
        "Matchup finished"
    );
    stats
}

/// Attacker win rate for every one-on-one class pairing.
#[must_use]
pub fn generate_duel_matrix(max_rounds: u32, battles: u32) -> Vec<(ShipClass, ShipClass, f64)> {
    let mut results = Vec::new();
    for attacker in ShipClass::ALL {
        for defender in ShipClass::ALL {
            let stats = run_matchup(&[attacker], &[defender], max_rounds, battles);
            results.push((attacker, defender, stats.win_rate_a()));
        }
    }
    results
}
