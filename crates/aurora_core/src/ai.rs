//! Hostile empire decision making.
//!
//! Each turn a hostile empire produces an [`AiDecision`] from a read-only
//! [`AiView`] of the world and its own random stream. Deciding never mutates
//! anything; the orchestrator applies the decision afterwards. Random draws
//! happen in a fixed order (colonize roll, build roll, class pick, attack
//! roll, fleet picks) so that a given stream always yields the same decision
//! for the same state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::hull_profile;
use crate::empire::Empire;
use crate::galaxy::{Galaxy, PlanetId};
use crate::ships::{Fleet, ShipClass};

/// Per-turn action probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Chance to found a colony.
    pub colonize_chance: f64,
    /// Chance to build a ship.
    pub build_chance: f64,
    /// Chance to raid the player while at war.
    pub attack_chance: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            colonize_chance: 0.25,
            build_chance: 0.45,
            attack_chance: 0.25,
        }
    }
}

/// Classes in the order hostile shipyards offer them.
pub const AI_BUILD_ORDER: [ShipClass; 8] = [
    ShipClass::Fighter,
    ShipClass::Scout,
    ShipClass::Corvette,
    ShipClass::Frigate,
    ShipClass::Destroyer,
    ShipClass::Cruiser,
    ShipClass::Battleship,
    ShipClass::Carrier,
];

/// Classes a hostile empire can build on its `turn`.
#[must_use]
pub fn build_pool(turn: u32) -> Vec<ShipClass> {
    AI_BUILD_ORDER
        .into_iter()
        .filter(|&class| hull_profile(class).ai_unlock_turn <= turn)
        .collect()
}

/// Raid target selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPlan {
    /// Index of the raiding fleet in the hostile's fleet list.
    pub fleet: usize,
    /// Index of the targeted fleet in the player's fleet list.
    pub target: usize,
}

/// Everything a hostile empire decided to do this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    /// Technology to start researching.
    pub research: Option<String>,
    /// Planet to colonize.
    pub colonize: Option<PlanetId>,
    /// Ship class to build into the first fleet.
    pub build: Option<ShipClass>,
    /// Raid to launch against the player.
    pub attack: Option<AttackPlan>,
}

impl AiDecision {
    /// Whether the decision changes anything.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.research.is_none()
            && self.colonize.is_none()
            && self.build.is_none()
            && self.attack.is_none()
    }
}

/// Read-only world state visible to one hostile empire.
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    /// The deciding empire.
    pub empire: &'a Empire,
    /// The galaxy.
    pub galaxy: &'a Galaxy,
    /// The player's fleets, potential raid targets.
    pub player_fleets: &'a [Fleet],
    /// Whether this empire is at war with the player.
    pub at_war: bool,
}

/// Decides one turn of hostile behaviour.
pub fn decide<R: Rng>(view: &AiView<'_>, tuning: &AiTuning, rng: &mut R) -> AiDecision {
    let empire = view.empire;

    let research = if empire.current_research().is_none() {
        empire
            .research
            .available_techs()
            .first()
            .map(|tech| tech.id.clone())
    } else {
        None
    };

    let wants_colony = rng.gen::<f64>() < tuning.colonize_chance;
    let wants_ship = rng.gen::<f64>() < tuning.build_chance;

    let colonize = wants_colony
        .then(|| {
            let home = empire.fleets.first()?.location?;
            view.galaxy.colonizable_planets(home).first().copied()
        })
        .flatten();

    let build = if wants_ship && !empire.fleets.is_empty() {
        let pool = build_pool(empire.turn());
        (!pool.is_empty()).then(|| pool[rng.gen_range(0..pool.len())])
    } else {
        None
    };

    let wants_raid = rng.gen::<f64>() < tuning.attack_chance;
    let attack = if view.at_war && wants_raid {
        pick_raid(&empire.fleets, view.player_fleets, rng)
    } else {
        None
    };

    AiDecision {
        research,
        colonize,
        build,
        attack,
    }
}

fn pick_raid<R: Rng>(own: &[Fleet], targets: &[Fleet], rng: &mut R) -> Option<AttackPlan> {
    let ready: Vec<usize> = own
        .iter()
        .enumerate()
        .filter(|(_, fleet)| !fleet.is_defeated())
        .map(|(index, _)| index)
        .collect();
    let exposed: Vec<usize> = targets
        .iter()
        .enumerate()
        .filter(|(_, fleet)| !fleet.is_defeated())
        .map(|(index, _)| index)
        .collect();
    if ready.is_empty() || exposed.is_empty() {
        return None;
    }
    let fleet = ready[rng.gen_range(0..ready.len())];
    let target = exposed[rng.gen_range(0..exposed.len())];
    Some(AttackPlan { fleet, target })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::galaxy::GalaxyConfig;
    use crate::shipyard::build_baseline_ship;

    fn always() -> AiTuning {
        AiTuning {
            colonize_chance: 1.0,
            build_chance: 1.0,
            attack_chance: 1.0,
        }
    }

    fn hostile(galaxy: &Galaxy) -> Empire {
        let mut empire = Empire::new("Zorg Collective");
        let fleet = Fleet::new("Zorg Collective Fleet", "Zorg Collective")
            .with_location(galaxy.home())
            .with_ship(build_baseline_ship("Raider-Corvette-1", ShipClass::Corvette));
        empire.fleets.push(fleet);
        empire
    }

    #[test]
    fn test_build_pool_widens() {
        assert_eq!(
            build_pool(0),
            vec![ShipClass::Fighter, ShipClass::Scout, ShipClass::Corvette]
        );
        assert_eq!(build_pool(4).len(), 4);
        assert_eq!(build_pool(16).len(), 8);
    }

    #[test]
    fn test_idle_research_picks_first_available() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(1).with_num_systems(3));
        let empire = hostile(&galaxy);
        let view = AiView {
            empire: &empire,
            galaxy: &galaxy,
            player_fleets: &[],
            at_war: false,
        };
        let never = AiTuning {
            colonize_chance: 0.0,
            build_chance: 0.0,
            attack_chance: 0.0,
        };
        let decision = decide(&view, &never, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(decision.research.as_deref(), Some("basic_mining"));
        assert!(decision.colonize.is_none() && decision.build.is_none());
        assert!(!decision.is_idle());

        let mut busy = hostile(&galaxy);
        busy.set_research("basic_mining").unwrap();
        let view = AiView {
            empire: &busy,
            ..view
        };
        let decision = decide(&view, &never, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(decision.is_idle());
    }

    #[test]
    fn test_no_raid_without_war() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(2).with_num_systems(3));
        let empire = hostile(&galaxy);
        let targets = [Fleet::new("Home Defense Fleet", "Earth Empire")
            .with_ship(build_baseline_ship("Scout-1", ShipClass::Scout))];
        let mut view = AiView {
            empire: &empire,
            galaxy: &galaxy,
            player_fleets: &targets,
            at_war: false,
        };
        let decision = decide(&view, &always(), &mut ChaCha8Rng::seed_from_u64(3));
        assert!(decision.attack.is_none());
        assert!(decision.build.is_some());

        view.at_war = true;
        let decision = decide(&view, &always(), &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(decision.attack, Some(AttackPlan { fleet: 0, target: 0 }));
    }

    #[test]
    fn test_colonizes_in_first_fleet_system() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(4).with_num_systems(3));
        let empire = hostile(&galaxy);
        let view = AiView {
            empire: &empire,
            galaxy: &galaxy,
            player_fleets: &[],
            at_war: false,
        };
        let decision = decide(&view, &always(), &mut ChaCha8Rng::seed_from_u64(9));
        let expected = galaxy.colonizable_planets(galaxy.home()).first().copied();
        assert_eq!(decision.colonize, expected);
    }

    #[test]
    fn test_decisions_are_reproducible() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(5).with_num_systems(4));
        let empire = hostile(&galaxy);
        let view = AiView {
            empire: &empire,
            galaxy: &galaxy,
            player_fleets: &[],
            at_war: true,
        };
        let tuning = AiTuning::default();
        for seed in 0..10 {
            let a = decide(&view, &tuning, &mut ChaCha8Rng::seed_from_u64(seed));
            let b = decide(&view, &tuning, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(a, b);
        }
    }
}
