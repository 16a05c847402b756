//! Error types for the empire simulation.

use thiserror::Error;

use crate::resources::ResourceType;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Errors that can occur during simulation, player actions and persistence.
///
/// None of these are fatal to a running game: every action that fails leaves
/// the world untouched and reports the error instead.
#[derive(Debug, Error)]
pub enum GameError {
    /// No fleet with the given name belongs to the empire.
    #[error("Fleet not found: {0}")]
    UnknownFleet(String),

    /// No star system with the given name exists.
    #[error("System not found: {0}")]
    UnknownSystem(String),

    /// No technology with the given id exists in the catalog.
    #[error("Unknown technology: {0}")]
    UnknownTechnology(String),

    /// No colony with the given name belongs to the empire.
    #[error("Colony not found: {0}")]
    UnknownColony(String),

    /// Ship class name did not match any known class.
    #[error("Invalid ship class: {0}")]
    InvalidShipClass(String),

    /// Research prerequisites are not satisfied.
    #[error("Cannot research that technology: prerequisites for {0} are not met")]
    PrerequisitesNotMet(String),

    /// Technology definitions reference missing ids or form a cycle.
    #[error("Invalid technology graph: {0}")]
    InvalidTechGraph(String),

    /// Technology has already been researched.
    #[error("Technology already researched: {0}")]
    AlreadyResearched(String),

    /// Not enough of a resource to pay a cost.
    #[error("Insufficient resources: need {required} {resource}, have {available}")]
    InsufficientResources {
        /// Resource that is lacking.
        resource: ResourceType,
        /// Amount required.
        required: u64,
        /// Amount available.
        available: u64,
    },

    /// A fleet was asked to fight itself.
    #[error("Fleet cannot engage itself: {0}")]
    SelfEngagement(String),

    /// Save file does not start with the expected header.
    #[error("Invalid save file header: expected {expected}, found {found:?}")]
    InvalidSaveHeader {
        /// Header this build writes and accepts.
        expected: &'static str,
        /// First meaningful line of the file, if any.
        found: Option<String>,
    },

    /// Save file content could not be interpreted.
    #[error("Malformed save data at line {line}: {message}")]
    MalformedSave {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Failed to read or write a file.
    #[error("Failed to access '{path}': {source}")]
    Io {
        /// Path that was being accessed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse config '{path}': {source}")]
    ConfigParse {
        /// Origin of the config text.
        path: String,
        /// Underlying RON error.
        #[source]
        source: ron::error::SpannedError,
    },
}

impl GameError {
    /// Returns `true` for errors caused by a bad name or id in player input.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::UnknownFleet(_)
                | Self::UnknownSystem(_)
                | Self::UnknownTechnology(_)
                | Self::UnknownColony(_)
                | Self::InvalidShipClass(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_input_classification() {
        assert!(GameError::UnknownFleet("Alpha".into()).is_user_input());
        assert!(GameError::InvalidShipClass("Dreadnought".into()).is_user_input());
        assert!(!GameError::PrerequisitesNotMet("warp_theory".into()).is_user_input());
    }

    #[test]
    fn test_messages_are_descriptive() {
        let err = GameError::InsufficientResources {
            resource: ResourceType::Minerals,
            required: 50,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient resources: need 50 Minerals, have 10"
        );
        assert_eq!(
            GameError::UnknownFleet("Ghost".into()).to_string(),
            "Fleet not found: Ghost"
        );
    }
}
