//! Save and load tests against real files.

use aurora_core::config::GameConfig;
use aurora_core::error::GameError;
use aurora_core::game::{Game, HOME_FLEET_NAME};
use aurora_core::resources::ResourceType;
use aurora_core::save::{self, SAVE_HEADER};
use aurora_test_utils::determinism::verify_save_continuation;
use aurora_test_utils::fixtures::{aggressive_config, declare_war, scripted_turn, standard_game};
use tempfile::TempDir;

#[test]
fn test_save_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campaign.sav");

    let mut game = standard_game(42);
    for _ in 0..5 {
        scripted_turn(&mut game);
    }
    declare_war(&mut game, 1);
    let message = game.save_game(&path);
    assert_eq!(message, format!("Game saved to {}", path.display()));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(SAVE_HEADER));
    assert!(text.contains("[Hostiles]"));
    assert!(text.contains("endhostile"));

    let loaded = Game::load(&path, GameConfig::default()).unwrap();
    assert_eq!(loaded.seed(), 42);
    assert_eq!(loaded.turn(), 5);
    assert_eq!(loaded.state_hash(), game.state_hash());
    let krell = loaded.hostile("Krell Dominion").unwrap();
    assert!(krell.contacted && krell.at_war);
}

#[test]
fn test_load_failure_keeps_current_game() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bogus.sav");
    std::fs::write(&path, "NOT_A_SAVE\nseed=1\n").unwrap();

    let mut game = standard_game(7);
    game.advance_turn();
    let before = game.state_hash();
    let message = game.load_game(&path);
    assert!(message.starts_with("Load failed: Invalid save file header"), "{message}");
    assert_eq!(game.state_hash(), before);

    let missing = dir.path().join("missing.sav");
    assert!(game.load_game(&missing).starts_with("Load failed: Failed to access"));
    assert!(matches!(
        Game::load(&missing, GameConfig::default()),
        Err(GameError::Io { .. })
    ));
}

#[test]
fn test_load_game_replaces_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("slot1.sav");
    let mut saved = standard_game(12);
    saved.player_mut().resources.add(ResourceType::Minerals, 777);
    saved.save(&path).unwrap();

    let mut current = standard_game(13);
    assert_eq!(current.load_game(&path), format!("Game loaded from {}", path.display()));
    assert_eq!(current.seed(), 12);
    assert_eq!(current.player().resources.get(ResourceType::Minerals), 777);
}

#[test]
fn test_damaged_ships_survive_reload() {
    let mut game = Game::new(aggressive_config(31));
    declare_war(&mut game, 0);
    declare_war(&mut game, 1);
    for _ in 0..4 {
        game.advance_turn();
    }
    let loaded = save::decode(&save::encode(&game), GameConfig::default()).unwrap();
    let before = game.player().fleet(HOME_FLEET_NAME).unwrap();
    let after = loaded.player().fleet(HOME_FLEET_NAME).unwrap();
    assert_eq!(before.len(), after.len());
    for (a, b) in before.ships.iter().zip(&after.ships) {
        assert_eq!((a.hull(), a.shields()), (b.hull(), b.shields()));
    }
}

#[test]
fn test_reloaded_game_continues_identically() {
    assert!(verify_save_continuation(&aggressive_config(77), 6, 10));
}
