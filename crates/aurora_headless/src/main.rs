//! Headless Aurora runner.
//!
//! Plays seeded games without an interactive front end, for CI and batch
//! experiments.
//!
//! # Usage
//!
//! ```bash
//! # Play 50 turns, surveying a system each turn, and save the result
//! cargo run -p aurora_headless -- run --seed 42 --turns 50 --explore --save game.sav
//!
//! # Continue a saved game for 10 more turns
//! cargo run -p aurora_headless -- load game.sav --turns 10
//!
//! # Verify determinism and save continuation
//! cargo run -p aurora_headless -- verify --seed 42 --turns 100 --runs 8
//!
//! # Print a generated galaxy
//! cargo run -p aurora_headless -- galaxy --seed 42 --systems 10
//! ```
//!
//! Reports go to stdout, logs to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aurora_core::config::GameConfig;
use aurora_core::galaxy::Galaxy;
use aurora_core::game::Game;
use aurora_headless::{describe_galaxy, play, to_json, verify_game, GalaxySummary, RunOptions};

#[derive(Parser)]
#[command(name = "aurora_headless")]
#[command(about = "Headless Aurora runner for batch play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a new game for a number of turns
    Run {
        /// Galaxy seed (0 = pick one at random)
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of star systems
        #[arg(long, default_value = "10")]
        systems: usize,

        /// Turns to play
        #[arg(short, long, default_value = "50")]
        turns: u32,

        /// RON game configuration; seed and systems flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Survey one system per turn
        #[arg(long)]
        explore: bool,

        /// Save the final state to this path
        #[arg(long)]
        save: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Continue a saved game
    Load {
        /// Save file path
        path: PathBuf,

        /// Turns to play after loading
        #[arg(short, long, default_value = "0")]
        turns: u32,

        /// RON game configuration used to rebuild the galaxy
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify determinism by playing the same seed multiple times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of star systems
        #[arg(long, default_value = "10")]
        systems: usize,

        /// Turns per run
        #[arg(short, long, default_value = "100")]
        turns: u32,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: usize,
    },

    /// Print the galaxy a seed generates
    Galaxy {
        /// Galaxy seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of star systems
        #[arg(long, default_value = "10")]
        systems: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout carries reports
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            seed,
            systems,
            turns,
            config,
            explore,
            save,
            json,
        }) => {
            cmd_run(seed, systems, turns, config, explore, save, json);
        }
        Some(Commands::Load {
            path,
            turns,
            config,
            json,
        }) => {
            cmd_load(path, turns, config, json);
        }
        Some(Commands::Verify {
            seed,
            systems,
            turns,
            runs,
        }) => {
            cmd_verify(seed, systems, turns, runs);
        }
        Some(Commands::Galaxy {
            seed,
            systems,
            json,
        }) => {
            cmd_galaxy(seed, systems, json);
        }
        None => {
            cmd_run(42, 10, 50, None, false, None, false);
        }
    }
}

fn load_config(path: Option<PathBuf>) -> GameConfig {
    match path {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match to_json(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn cmd_run(
    seed: u64,
    systems: usize,
    turns: u32,
    config: Option<PathBuf>,
    explore: bool,
    save: Option<PathBuf>,
    json: bool,
) {
    let config = load_config(config).with_seed(seed).with_num_systems(systems);
    let mut game = Game::new(config);
    tracing::info!(seed = game.seed(), systems = game.galaxy().len(), turns, "Starting game");

    let options = RunOptions {
        turns,
        explore,
        save: save.clone(),
    };
    match play(&mut game, &options) {
        Ok(summary) => {
            if json {
                print_json(&summary);
            } else {
                for line in &summary.log {
                    println!("{line}");
                }
                println!("{}", summary.to_text());
            }
            if let Some(path) = save {
                eprintln!("Game saved to {}", path.display());
            }
        }
        Err(e) => {
            tracing::error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_load(path: PathBuf, turns: u32, config: Option<PathBuf>, json: bool) {
    let config = load_config(config);
    let mut game = match Game::load(&path, config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("Load failed: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        path = %path.display(),
        seed = game.seed(),
        turn = game.turn(),
        "Game loaded"
    );

    let options = RunOptions {
        turns,
        ..RunOptions::default()
    };
    match play(&mut game, &options) {
        Ok(summary) if json => print_json(&summary),
        Ok(summary) => {
            for line in &summary.log {
                println!("{line}");
            }
            println!("{}", summary.to_text());
        }
        Err(e) => {
            tracing::error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_verify(seed: u64, systems: usize, turns: u32, runs: usize) {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_num_systems(systems);

    eprintln!("Verifying determinism");
    eprintln!("  Seed: {seed}");
    eprintln!("  Turns: {turns}");
    eprintln!("  Runs: {runs}");

    let report = match verify_game(config, turns, runs) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Verification failed: {e}");
            std::process::exit(1);
        }
    };

    for (i, hash) in report.hashes.iter().enumerate() {
        eprintln!("Run {}: hash = {hash:016x}", i + 1);
    }
    eprintln!(
        "Save continuation: {}",
        if report.save_continuation { "match" } else { "MISMATCH" }
    );
    print_json(&report);

    if report.passed() {
        eprintln!("\n✓ Determinism verified");
    } else {
        eprintln!("\n✗ DETERMINISM FAILURE");
        std::process::exit(1);
    }
}

fn cmd_galaxy(seed: u64, systems: usize, json: bool) {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_num_systems(systems);
    let galaxy = Galaxy::generate(&config.galaxy);
    if json {
        print_json(&GalaxySummary::of(&galaxy));
    } else {
        println!("{}", describe_galaxy(&galaxy));
    }
}
