//! Headless game runner for batch simulation and determinism checks.
//!
//! This crate drives an [`aurora_core::game::Game`] without any interactive
//! UI. It enables:
//!
//! - **Batch play**: Advance a seeded game for N turns and report the result
//! - **CI verification**: Check that identical seeds give identical games,
//!   and that a saved and reloaded game continues identically
//! - **Galaxy inspection**: Print what a seed generates
//!
//! Reports go to stdout as text or JSON; logs go to stderr.
//!
//! # Example
//!
//! ```bash
//! # Play 50 turns and print a JSON summary
//! cargo run -p aurora_headless -- run --seed 42 --turns 50 --json
//!
//! # Verify determinism across 8 runs
//! cargo run -p aurora_headless -- verify --seed 42 --turns 100 --runs 8
//! ```

pub mod atlas;
pub mod error;
pub mod runner;
pub mod verify;

pub use atlas::{describe_galaxy, GalaxySummary};
pub use error::{HeadlessError, Result};
pub use runner::{play, RunOptions, RunSummary};
pub use verify::{verify_game, VerifyReport};

/// Pretty-printed JSON for any report.
///
/// # Errors
///
/// Returns [`HeadlessError::Json`] if the value cannot be serialized.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
