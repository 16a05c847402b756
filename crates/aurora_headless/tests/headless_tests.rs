//! End-to-end tests for headless play.

use aurora_core::config::GameConfig;
use aurora_core::game::Game;
use aurora_headless::{play, to_json, RunOptions};
use aurora_test_utils::fixtures::standard_config;
use tempfile::TempDir;

#[test]
fn test_saved_run_continues_like_straight_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("half.sav");
    let config = standard_config(77);

    let mut straight = Game::new(config.clone());
    play(
        &mut straight,
        &RunOptions {
            turns: 12,
            explore: true,
            save: None,
        },
    )
    .unwrap();

    let mut first = Game::new(config.clone());
    play(
        &mut first,
        &RunOptions {
            turns: 6,
            explore: true,
            save: Some(path.clone()),
        },
    )
    .unwrap();

    let mut resumed = Game::load(&path, config).unwrap();
    assert_eq!(resumed.turn(), 6);
    let summary = play(
        &mut resumed,
        &RunOptions {
            turns: 6,
            explore: true,
            save: None,
        },
    )
    .unwrap();

    assert_eq!(summary.state_hash, straight.state_hash());
}

#[test]
fn test_json_report_fields() {
    let mut game = Game::new(GameConfig::default().with_seed(5));
    let summary = play(
        &mut game,
        &RunOptions {
            turns: 3,
            ..RunOptions::default()
        },
    )
    .unwrap();
    let text = to_json(&summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["seed"], 5);
    assert_eq!(value["turns_played"], 3);
    assert_eq!(value["status"]["player"]["name"], "Earth Empire");
    assert!(value.get("log").is_none());
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let mut game = Game::new(standard_config(1));
    let result = play(
        &mut game,
        &RunOptions {
            turns: 1,
            explore: false,
            save: Some(dir.path().join("missing").join("game.sav")),
        },
    );
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Failed to access"));
}
