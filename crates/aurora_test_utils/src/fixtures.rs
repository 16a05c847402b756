//! Test fixtures and helpers.
//!
//! Pre-built games, fleets and a scripted player for consistent testing.

use aurora_core::ai::AiTuning;
use aurora_core::config::GameConfig;
use aurora_core::game::Game;
use aurora_core::ships::{Fleet, ShipClass};
use aurora_core::shipyard::build_baseline_ship;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Galaxy size used by the standard fixtures.
pub const STANDARD_SYSTEMS: usize = 10;

/// Default settings with a fixed seed and a small galaxy.
#[must_use]
pub fn standard_config(seed: u64) -> GameConfig {
    GameConfig::default()
        .with_seed(seed)
        .with_num_systems(STANDARD_SYSTEMS)
}

/// Hostiles that never act beyond research.
#[must_use]
pub fn peaceful_config(seed: u64) -> GameConfig {
    standard_config(seed).with_ai(AiTuning {
        colonize_chance: 0.0,
        build_chance: 0.0,
        attack_chance: 0.0,
    })
}

/// Hostiles that colonize, build and raid every turn they can.
#[must_use]
pub fn aggressive_config(seed: u64) -> GameConfig {
    standard_config(seed).with_ai(AiTuning {
        colonize_chance: 1.0,
        build_chance: 1.0,
        attack_chance: 1.0,
    })
}

/// A new game with [`standard_config`].
#[must_use]
pub fn standard_game(seed: u64) -> Game {
    Game::new(standard_config(seed))
}

/// Deterministic RNG for combat tests.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A fleet of baseline ships, named `"<Class>-<n>"` in order.
#[must_use]
pub fn fleet_of(name: &str, owner: &str, classes: &[ShipClass]) -> Fleet {
    classes
        .iter()
        .enumerate()
        .fold(Fleet::new(name, owner), |fleet, (index, &class)| {
            fleet.with_ship(build_baseline_ship(
                format!("{}-{}", class.name(), index + 1),
                class,
            ))
        })
}

/// Two single-ship fleets, `"Red"` and `"Blue"`.
#[must_use]
pub fn duel_fleets(red: ShipClass, blue: ShipClass) -> (Fleet, Fleet) {
    (
        fleet_of("Red", "Red Empire", &[red]),
        fleet_of("Blue", "Blue Empire", &[blue]),
    )
}

/// Explores the home system of the hostile at `index`, contacting it and
/// declaring war. Returns the exploration message.
///
/// # Panics
///
/// Panics if the hostile has no located fleet.
pub fn declare_war(game: &mut Game, index: usize) -> String {
    let system = game.hostiles()[index].empire.fleets[0]
        .location
        .expect("hostile fleet has a location");
    let name = game
        .galaxy()
        .system(system)
        .expect("hostile home exists")
        .name
        .clone();
    game.explore_system(&name)
}

/// One turn of a scripted player: keeps research busy, surveys one system,
/// builds a frigate every third turn, then advances the game.
pub fn scripted_turn(game: &mut Game) -> String {
    let turn = game.turn();
    if game.player().current_research().is_none() {
        if let Some(id) = game.available_research().first().map(|tech| tech.id.clone()) {
            game.start_research(&id);
        }
    }
    let index = turn as usize % game.galaxy().len();
    let system = game.galaxy().systems()[index].name.clone();
    game.explore_system(&system);
    if turn % 3 == 2 {
        game.build_ship("Frigate", "Home Defense Fleet");
    }
    game.advance_turn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_of_names_ships() {
        let fleet = fleet_of("Test", "Owner", &[ShipClass::Scout, ShipClass::Frigate]);
        let names: Vec<_> = fleet.ships.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Scout-1", "Frigate-2"]);
    }

    #[test]
    fn test_declare_war() {
        let mut game = standard_game(42);
        let message = declare_war(&mut game, 1);
        assert!(message.contains("Krell Dominion"));
        assert!(game.hostiles()[1].at_war);
    }

    #[test]
    fn test_scripted_turn_advances() {
        let mut game = standard_game(8);
        for _ in 0..4 {
            scripted_turn(&mut game);
        }
        assert_eq!(game.turn(), 4);
        assert_eq!(game.player().fleets[0].len(), 3);
    }
}
