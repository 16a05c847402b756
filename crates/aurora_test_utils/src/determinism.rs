//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the game produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! A game is fully determined by its seed and the player's actions.
//! Sources of non-determinism include:
//!
//! - **Shared random streams**: One actor's draws shifting another's.
//!   Every hostile, raid and skirmish draws from its own derived stream.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Game state lives in `Vec`s and `BTreeMap`s only.
//!
//! - **Lossy persistence**: A save that drops state makes a reloaded game
//!   drift from the original. [`verify_save_continuation`] checks this.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual module determinism (galaxy, combat, AI)
//! 2. **Property tests**: Random seeds must still produce deterministic games
//! 3. **Integration tests**: Full scripted games are reproducible
//! 4. **Parallel tests**: Running N games on threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use aurora_core::config::GameConfig;
use aurora_core::game::Game;
use aurora_core::save;

use crate::fixtures::scripted_turn;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of turns simulated.
    pub turns: u32,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic game).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the game was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Game is non-deterministic!\n\
                 Runs: {}\n\
                 Turns: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.turns,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a game multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the game
/// * `turns` - Number of turns to play per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance by one turn
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use aurora_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(3, 10, || 0u64, |n| *n += 1, |n| *n);
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    turns: u32,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..turns {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        turns,
    }
}

/// Plays the scripted player twice from the same config and compares the
/// final state hashes.
#[must_use]
pub fn verify_game_determinism(config: &GameConfig, turns: u32) -> bool {
    verify_determinism(
        2,
        turns,
        || Game::new(config.clone()),
        |game| {
            scripted_turn(game);
        },
        Game::state_hash,
    )
    .is_deterministic
}

/// Runs `num_games` copies of the same game on scoped threads and collects
/// the final hashes.
///
/// # Panics
///
/// Panics if a game thread panics.
#[must_use]
pub fn run_parallel_games(config: &GameConfig, num_games: usize, turns: u32) -> DeterminismResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_games)
            .map(|_| {
                s.spawn(|| {
                    let mut game = Game::new(config.clone());
                    for _ in 0..turns {
                        scripted_turn(&mut game);
                    }
                    game.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        turns,
    }
}

/// Compare two games turn-by-turn, finding first divergence.
///
/// # Returns
///
/// `None` if the games stay identical, `Some(turn)` if they diverge at that
/// turn.
pub fn find_first_divergence<F>(setup_fn: F, turns: u32) -> Option<u32>
where
    F: Fn() -> Game,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for turn in 1..=turns {
        scripted_turn(&mut first);
        scripted_turn(&mut second);

        if first.state_hash() != second.state_hash() {
            return Some(turn);
        }
    }

    None
}

/// Plays `before` turns, saves and reloads, then plays `after` more turns on
/// both the original and the reloaded game. Returns whether they end equal.
#[must_use]
pub fn verify_save_continuation(config: &GameConfig, before: u32, after: u32) -> bool {
    let mut original = Game::new(config.clone());
    for _ in 0..before {
        scripted_turn(&mut original);
    }

    let Ok(mut restored) = save::decode(&save::encode(&original), config.clone()) else {
        return false;
    };
    if restored.state_hash() != original.state_hash() {
        return false;
    }

    for _ in 0..after {
        if scripted_turn(&mut original) != scripted_turn(&mut restored) {
            return false;
        }
    }
    original.state_hash() == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the game.
pub mod strategies {
    use aurora_core::resources::ResourceType;
    use aurora_core::ships::ShipClass;
    use proptest::prelude::*;

    /// Generate a non-zero galaxy seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        1u64..u64::MAX
    }

    /// Generate a galaxy size (1-30 systems).
    pub fn arb_num_systems() -> impl Strategy<Value = usize> {
        1usize..30usize
    }

    /// Generate any ship class.
    pub fn arb_ship_class() -> impl Strategy<Value = ShipClass> {
        proptest::sample::select(ShipClass::ALL.to_vec())
    }

    /// Generate any resource kind.
    pub fn arb_resource() -> impl Strategy<Value = ResourceType> {
        proptest::sample::select(ResourceType::ALL.to_vec())
    }

    /// Generate damage values (1-500).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        1u32..500u32
    }

    /// Generate a sequence of damage hits.
    pub fn arb_damage_sequence(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::vec(arb_damage(), 0..max_len)
    }

    /// Generate a cost list over a few resources.
    pub fn arb_costs() -> impl Strategy<Value = Vec<(ResourceType, u64)>> {
        proptest::collection::vec((arb_resource(), 0u64..2_000u64), 0..5)
    }

    /// Generate a fleet composition.
    pub fn arb_fleet_classes(max_ships: usize) -> impl Strategy<Value = Vec<ShipClass>> {
        proptest::collection::vec(arb_ship_class(), 1..max_ships)
    }
}
