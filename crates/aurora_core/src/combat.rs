//! Multi-round fleet combat.
//!
//! This module implements a bounded, stochastic engagement between two fleets:
//! - The attacker fires first each round, then the defender answers with
//!   whatever survived the attacker's volley
//! - Each ship picks a uniformly random operational target and fires every
//!   weapon once
//! - Destroyed ships are purged from both fleets at the end of each round
//! - A side with no operational ships loses immediately
//! - When the round cap is reached, the side with more hull plus shields wins
//!   by attrition; ties go to the defender
//!
//! The textual log is the observable trace of a battle and is reproducible
//! for a fixed random stream. Per-round [`CombatFrame`] snapshots are kept
//! for read-only viewers.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ships::{Fleet, Ship, ShipClass};

/// Round cap for player-initiated combat.
pub const DEFAULT_MAX_ROUNDS: u32 = 10;

/// Round cap for raids launched by hostile empires.
pub const RAID_MAX_ROUNDS: u32 = 6;

const FLEET_BAR_WIDTH: usize = 20;
const SHIP_BAR_WIDTH: usize = 12;

/// One side of an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The fleet that initiated combat.
    Attacker,
    /// The fleet that was engaged.
    Defender,
}

/// How a battle was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Victory {
    /// The loser has no operational ships left.
    Annihilation,
    /// Round cap reached; decided on remaining hull plus shields.
    Attrition,
}

/// Final result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Winning side.
    pub winner: Side,
    /// How the battle was decided.
    pub victory: Victory,
    /// Rounds fought.
    pub rounds: u32,
}

/// Combat state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatState {
    /// Still fighting.
    Active {
        /// Rounds resolved so far.
        rounds_resolved: u32,
    },
    /// Finished.
    Resolved(CombatOutcome),
}

/// Read-only snapshot of one ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipFrame {
    /// Ship name.
    pub name: String,
    /// Ship class.
    pub class: ShipClass,
    /// Current hull.
    pub hull: u32,
    /// Maximum hull.
    pub max_hull: u32,
    /// Current shields.
    pub shields: u32,
    /// Maximum shields.
    pub max_shields: u32,
}

impl From<&Ship> for ShipFrame {
    fn from(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            class: ship.class,
            hull: ship.hull(),
            max_hull: ship.max_hull(),
            shields: ship.shields(),
            max_shields: ship.max_shields(),
        }
    }
}

/// Read-only snapshot of both fleets after a round. Round 0 is the opening state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatFrame {
    /// Round number.
    pub round: u32,
    /// Attacker fleet name.
    pub attacker: String,
    /// Defender fleet name.
    pub defender: String,
    /// Attacker ships.
    pub attacker_ships: Vec<ShipFrame>,
    /// Defender ships.
    pub defender_ships: Vec<ShipFrame>,
}

/// An engagement between two fleets, mutated in place.
#[derive(Debug)]
pub struct Combat<'a> {
    attacker: &'a mut Fleet,
    defender: &'a mut Fleet,
    max_rounds: u32,
    state: CombatState,
    log: Vec<String>,
    frames: Vec<CombatFrame>,
    attacker_start: u64,
    defender_start: u64,
}

impl<'a> Combat<'a> {
    /// Binds two fleets with the default round cap.
    pub fn new(attacker: &'a mut Fleet, defender: &'a mut Fleet) -> Self {
        let attacker_start = attacker.combat_strength();
        let defender_start = defender.combat_strength();
        let mut combat = Self {
            attacker,
            defender,
            max_rounds: DEFAULT_MAX_ROUNDS,
            state: CombatState::Active { rounds_resolved: 0 },
            log: Vec::new(),
            frames: Vec::new(),
            attacker_start,
            defender_start,
        };
        combat.record_frame(0);
        combat
    }

    /// Builder: set the round cap.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Round cap.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Log lines so far.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Snapshots so far, opening state first.
    #[must_use]
    pub fn frames(&self) -> &[CombatFrame] {
        &self.frames
    }

    /// Consumes the engagement, returning the log and the snapshots.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<CombatFrame>) {
        (self.log, self.frames)
    }

    /// Name of the fleet on `side`.
    #[must_use]
    pub fn fleet_name(&self, side: Side) -> &str {
        match side {
            Side::Attacker => &self.attacker.name,
            Side::Defender => &self.defender.name,
        }
    }

    /// Advances the state machine by at most one round.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> CombatState {
        let CombatState::Active { rounds_resolved } = self.state else {
            return self.state;
        };

        if let Some(outcome) = self.check_annihilation(rounds_resolved) {
            return self.finish(outcome);
        }
        if rounds_resolved >= self.max_rounds {
            return self.finish(self.attrition(rounds_resolved));
        }

        let round = rounds_resolved + 1;
        self.log.push(format!("=== Combat Round {round} ==="));
        volley(self.attacker, self.defender, rng, &mut self.log);
        volley(self.defender, self.attacker, rng, &mut self.log);
        self.attacker.remove_destroyed();
        self.defender.remove_destroyed();
        self.push_status();
        self.record_frame(round);
        self.state = CombatState::Active {
            rounds_resolved: round,
        };

        if let Some(outcome) = self.check_annihilation(round) {
            return self.finish(outcome);
        }
        if round >= self.max_rounds {
            return self.finish(self.attrition(round));
        }
        self.state
    }

    /// Runs rounds until the battle is decided.
    pub fn resolve<R: Rng>(&mut self, rng: &mut R) -> CombatOutcome {
        loop {
            if let CombatState::Resolved(outcome) = self.step(rng) {
                return outcome;
            }
        }
    }

    fn check_annihilation(&self, rounds: u32) -> Option<CombatOutcome> {
        let winner = if self.attacker.is_defeated() {
            Side::Defender
        } else if self.defender.is_defeated() {
            Side::Attacker
        } else {
            return None;
        };
        Some(CombatOutcome {
            winner,
            victory: Victory::Annihilation,
            rounds,
        })
    }

    fn attrition(&self, rounds: u32) -> CombatOutcome {
        let winner = if self.attacker.combat_strength() > self.defender.combat_strength() {
            Side::Attacker
        } else {
            Side::Defender
        };
        CombatOutcome {
            winner,
            victory: Victory::Attrition,
            rounds,
        }
    }

    fn finish(&mut self, outcome: CombatOutcome) -> CombatState {
        let winner = self.fleet_name(outcome.winner).to_string();
        let line = match outcome.victory {
            Victory::Annihilation => format!("{winner} wins!"),
            Victory::Attrition => format!("{winner} wins by attrition!"),
        };
        self.log.push(line);
        tracing::debug!(
            attacker = %self.attacker.name,
            defender = %self.defender.name,
            winner = %winner,
            rounds = outcome.rounds,
            victory = ?outcome.victory,
            "Combat resolved"
        );
        self.state = CombatState::Resolved(outcome);
        self.state
    }

    fn push_status(&mut self) {
        self.log.push("--- Status ---".to_string());
        for (fleet, start) in [
            (&*self.attacker, self.attacker_start),
            (&*self.defender, self.defender_start),
        ] {
            let strength = fleet.combat_strength();
            self.log.push(format!(
                "{}: [{}] {strength}/{start} ({} ships)",
                fleet.name,
                bar(strength, start, FLEET_BAR_WIDTH),
                fleet.operational_count()
            ));
            for ship in &fleet.ships {
                self.log.push(format!(
                    "  {} H[{}] {}/{} S[{}] {}/{}",
                    ship.name,
                    bar(u64::from(ship.hull()), u64::from(ship.max_hull()), SHIP_BAR_WIDTH),
                    ship.hull(),
                    ship.max_hull(),
                    bar(
                        u64::from(ship.shields()),
                        u64::from(ship.max_shields()),
                        SHIP_BAR_WIDTH
                    ),
                    ship.shields(),
                    ship.max_shields()
                ));
            }
        }
    }

    fn record_frame(&mut self, round: u32) {
        self.frames.push(CombatFrame {
            round,
            attacker: self.attacker.name.clone(),
            defender: self.defender.name.clone(),
            attacker_ships: self.attacker.ships.iter().map(ShipFrame::from).collect(),
            defender_ships: self.defender.ships.iter().map(ShipFrame::from).collect(),
        });
    }
}

/// Every operational ship in `shooters` fires once at a random operational
/// ship in `targets`.
fn volley<R: Rng>(shooters: &Fleet, targets: &mut Fleet, rng: &mut R, log: &mut Vec<String>) {
    for shooter in shooters.ships.iter().filter(|ship| ship.is_operational()) {
        let candidates = targets.operational_indices();
        if candidates.is_empty() {
            return;
        }
        let target_index = candidates[rng.gen_range(0..candidates.len())];
        let damage = shooter.fire_volley(rng);
        let target = &mut targets.ships[target_index];
        if damage == 0 {
            log.push(format!("{} misses {}", shooter.name, target.name));
            continue;
        }
        log.push(format!(
            "{} hits {} for {damage} damage",
            shooter.name, target.name
        ));
        target.take_damage(damage);
        if !target.is_operational() {
            log.push(format!("{} destroyed!", target.name));
        }
    }
}

fn bar(current: u64, max: u64, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        usize::try_from(current.min(max) * width as u64 / max).unwrap_or(width)
    };
    let mut out = "#".repeat(filled);
    out.push_str(&"-".repeat(width - filled));
    out
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attacker => f.write_str("attacker"),
            Self::Defender => f.write_str("defender"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::ships::Weapon;

    fn duelist(fleet: &str, ship: &str, accuracy: f64) -> Fleet {
        Fleet::new(fleet, "Test").with_ship(
            Ship::new(ship, ShipClass::Corvette, 100, 50)
                .with_weapon(Weapon::new("Laser Cannon", 10, accuracy, 5)),
        )
    }

    fn is_shot(line: &str) -> bool {
        line.contains(" hits ") || line.contains(" misses ")
    }

    #[test]
    fn test_single_round_duel() {
        let mut a = duelist("Red", "Alpha", 0.7);
        let mut b = duelist("Blue", "Bravo", 0.7);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut combat = Combat::new(&mut a, &mut b).with_max_rounds(1);
        let outcome = combat.resolve(&mut rng);

        let log = combat.log();
        assert_eq!(log.iter().filter(|l| l.contains("Round 1")).count(), 1);
        assert!(log.iter().filter(|l| is_shot(l)).count() <= 2);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.victory, Victory::Attrition);
    }

    #[test]
    fn test_equal_strength_tie_goes_to_defender() {
        let mut a = duelist("Red", "Alpha", 0.0);
        let mut b = duelist("Blue", "Bravo", 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut combat = Combat::new(&mut a, &mut b).with_max_rounds(3);
        let outcome = combat.resolve(&mut rng);
        assert_eq!(outcome.winner, Side::Defender);
        assert_eq!(outcome.victory, Victory::Attrition);
        assert_eq!(outcome.rounds, 3);
        assert_eq!(combat.log().last().map(String::as_str), Some("Blue wins by attrition!"));
    }

    #[test]
    fn test_annihilation_ends_early() {
        let mut a = Fleet::new("Hammer", "Test").with_ship(
            Ship::new("Big", ShipClass::Battleship, 900, 450)
                .with_weapon(Weapon::new("Lance", 1_000, 1.0, 9)),
        );
        let mut b = duelist("Anvil", "Small", 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut combat = Combat::new(&mut a, &mut b);
        let outcome = combat.resolve(&mut rng);
        assert_eq!(outcome.winner, Side::Attacker);
        assert_eq!(outcome.victory, Victory::Annihilation);
        assert_eq!(outcome.rounds, 1);
        assert!(combat.log().iter().any(|l| l == "Small destroyed!"));
        // The defender never got to shoot back.
        assert!(!combat.log().iter().any(|l| l.starts_with("Small hits")));
        drop(combat);
        assert!(b.is_empty());
        assert_eq!(a.ships[0].hull(), 900);
    }

    #[test]
    fn test_empty_defender_loses_without_rounds() {
        let mut a = duelist("Red", "Alpha", 1.0);
        let mut b = Fleet::new("Ghost", "Test");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = Combat::new(&mut a, &mut b).resolve(&mut rng);
        assert_eq!(outcome.winner, Side::Attacker);
        assert_eq!(outcome.rounds, 0);
    }

    #[test]
    fn test_terminates_within_cap() {
        for seed in 0..20 {
            let mut a = duelist("Red", "Alpha", 0.5);
            let mut b = duelist("Blue", "Bravo", 0.5);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut combat = Combat::new(&mut a, &mut b).with_max_rounds(4);
            let outcome = combat.resolve(&mut rng);
            assert!(outcome.rounds <= 4);
            let frames = combat.frames().len();
            drop(combat);
            assert_eq!(frames as u32, outcome.rounds + 1);
            let winner = match outcome.winner {
                Side::Attacker => &a,
                Side::Defender => &b,
            };
            assert!(outcome.victory == Victory::Attrition || !winner.is_defeated());
        }
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut a = duelist("Red", "Alpha", 0.6);
            let mut b = duelist("Blue", "Bravo", 0.6);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut combat = Combat::new(&mut a, &mut b);
            combat.resolve(&mut rng);
            combat.into_parts().0
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_frames_capture_damage() {
        let mut a = duelist("Red", "Alpha", 1.0);
        let mut b = duelist("Blue", "Bravo", 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut combat = Combat::new(&mut a, &mut b).with_max_rounds(2);
        combat.resolve(&mut rng);
        let frames = combat.frames();
        assert_eq!(frames[0].defender_ships[0].shields, 50);
        assert_eq!(frames[1].defender_ships[0].shields, 40);
        assert_eq!(frames[2].defender_ships[0].shields, 30);
        assert_eq!(frames[2].attacker, "Red");
    }

    #[test]
    fn test_status_bars() {
        assert_eq!(bar(10, 20, 4), "##--");
        assert_eq!(bar(0, 0, 3), "---");
        assert_eq!(bar(50, 20, 2), "##");
    }
}
