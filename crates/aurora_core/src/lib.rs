//! # Aurora Core
//!
//! Deterministic simulation core for the Aurora space-empire game.
//!
//! This crate contains the rules of the game and nothing else:
//! - No rendering
//! - No terminal handling
//! - No ambient randomness once a seed is chosen
//!
//! Given a galaxy seed and the same sequence of player actions, every run
//! produces the same galaxy, the same hostile decisions and the same battles.
//! This makes save files, regression replays and determinism tests possible.
//!
//! ## Crate Structure
//!
//! - [`galaxy`] - Seeded galaxy generation and lookup
//! - [`resources`] - Resource kinds and per-empire ledgers
//! - [`research`] - Technology graph and research progress
//! - [`ships`] / [`shipyard`] - Ships, fleets and tech-aware construction
//! - [`combat`] - Multi-round fleet combat
//! - [`empire`] - Empires, colonies and the per-empire turn step
//! - [`ai`] - Hostile empire decisions
//! - [`game`] - Turn orchestration and player actions
//! - [`save`] - Save file format
//! - [`data`] - Static catalogs

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod config;
pub mod data;
pub mod empire;
pub mod error;
pub mod galaxy;
pub mod game;
pub mod research;
pub mod resources;
pub mod rng;
pub mod save;
pub mod ships;
pub mod shipyard;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::{AiDecision, AiTuning};
    pub use crate::combat::{Combat, CombatOutcome, CombatState, Side, Victory};
    pub use crate::config::{GameConfig, HostileSpec};
    pub use crate::empire::{Colony, Empire, ResearchOutcome, TurnReport};
    pub use crate::error::{GameError, Result};
    pub use crate::galaxy::{Galaxy, GalaxyConfig, PlanetId, SystemId};
    pub use crate::game::{Game, GameStatus, Hostile, TurnSummary};
    pub use crate::research::{TechCategory, TechEra, TechGraph, Technology};
    pub use crate::resources::{ResourceLedger, ResourceType};
    pub use crate::ships::{Fleet, Ship, ShipClass, Weapon};
}
