//! Game configuration.
//!
//! [`GameConfig`] gathers every tunable of a new game. It can be built in
//! code or loaded from a RON file; missing fields take their defaults.
//!
//! ```
//! use aurora_core::config::GameConfig;
//!
//! let config = GameConfig::from_ron_str("(galaxy: (num_systems: 8, seed: 42))").unwrap();
//! assert_eq!(config.galaxy.num_systems, 8);
//! assert_eq!(config.research_cap, 10);
//! assert_eq!(config.hostiles.len(), 2);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::AiTuning;
use crate::combat::{DEFAULT_MAX_ROUNDS, RAID_MAX_ROUNDS};
use crate::error::{GameError, Result};
use crate::galaxy::GalaxyConfig;
use crate::resources::ResourceType;

/// A hostile empire to place at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostileSpec {
    /// Empire name.
    pub name: String,
    /// Index of its home system, clamped to the last system.
    pub system_index: usize,
}

impl HostileSpec {
    /// Creates a hostile placement.
    #[must_use]
    pub fn new(name: impl Into<String>, system_index: usize) -> Self {
        Self {
            name: name.into(),
            system_index,
        }
    }
}

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player empire name.
    pub empire_name: String,
    /// Galaxy generation parameters.
    pub galaxy: GalaxyConfig,
    /// Maximum research points any empire spends per turn.
    pub research_cap: u32,
    /// Round cap for player-initiated combat.
    pub combat_rounds: u32,
    /// Round cap for hostile raids.
    pub raid_rounds: u32,
    /// Hostile empires in turn order.
    pub hostiles: Vec<HostileSpec>,
    /// Hostile behaviour probabilities.
    pub ai: AiTuning,
    /// Price of one mine.
    pub mine_cost: Vec<(ResourceType, u64)>,
    /// Price of one factory.
    pub factory_cost: Vec<(ResourceType, u64)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            empire_name: "Earth Empire".to_string(),
            galaxy: GalaxyConfig::default(),
            research_cap: 10,
            combat_rounds: DEFAULT_MAX_ROUNDS,
            raid_rounds: RAID_MAX_ROUNDS,
            hostiles: vec![
                HostileSpec::new("Zorg Collective", 5),
                HostileSpec::new("Krell Dominion", 8),
            ],
            ai: AiTuning::default(),
            mine_cost: vec![(ResourceType::Minerals, 50), (ResourceType::Duranium, 20)],
            factory_cost: vec![(ResourceType::Minerals, 80), (ResourceType::Tritanium, 30)],
        }
    }
}

impl GameConfig {
    /// Builder: set the galaxy seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.galaxy.seed = seed;
        self
    }

    /// Builder: set the number of systems.
    #[must_use]
    pub fn with_num_systems(mut self, num_systems: usize) -> Self {
        self.galaxy.num_systems = num_systems;
        self
    }

    /// Builder: set the player empire name.
    #[must_use]
    pub fn with_empire_name(mut self, name: impl Into<String>) -> Self {
        self.empire_name = name.into();
        self
    }

    /// Builder: replace the hostile roster.
    #[must_use]
    pub fn with_hostiles(mut self, hostiles: Vec<HostileSpec>) -> Self {
        self.hostiles = hostiles;
        self
    }

    /// Builder: set hostile behaviour probabilities.
    #[must_use]
    pub fn with_ai(mut self, ai: AiTuning) -> Self {
        self.ai = ai;
        self
    }

    /// Parses a RON document.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ConfigParse`] if the text is not valid RON for
    /// this structure.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|source| GameError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Loads a RON config file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Io`] if the file cannot be read and
    /// [`GameError::ConfigParse`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded game config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.empire_name, "Earth Empire");
        assert_eq!(config.galaxy.num_systems, 20);
        assert_eq!(config.raid_rounds, 6);
        assert_eq!(config.combat_rounds, 10);
        assert_eq!(config.hostiles[0], HostileSpec::new("Zorg Collective", 5));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GameConfig::from_ron_str(
            r#"(empire_name: "Terran Union", ai: (build_chance: 0.9))"#,
        )
        .unwrap();
        assert_eq!(config.empire_name, "Terran Union");
        assert!((config.ai.build_chance - 0.9).abs() < f64::EPSILON);
        assert!((config.ai.colonize_chance - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.hostiles.len(), 2);
    }

    #[test]
    fn test_hostile_roster_from_ron() {
        let config = GameConfig::from_ron_str(
            r#"(hostiles: [(name: "Vorlon Remnant", system_index: 3)])"#,
        )
        .unwrap();
        assert_eq!(config.hostiles, vec![HostileSpec::new("Vorlon Remnant", 3)]);
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            GameConfig::from_ron_str("(research_cap: \"lots\")"),
            Err(GameError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.ron"),
            Err(GameError::Io { .. })
        ));
    }
}
