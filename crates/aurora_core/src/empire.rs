//! Empires and their colonies.
//!
//! An [`Empire`] composes a resource ledger, its own copy of the tech graph,
//! colonies and fleets. [`Empire::advance_turn`] is the per-empire economic
//! step shared by the player and every hostile AI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::galaxy::{PlanetId, SystemId};
use crate::research::TechGraph;
use crate::resources::{ResourceLedger, ResourceType};
use crate::ships::Fleet;

/// Population of a newly founded colony.
pub const STARTING_POPULATION: u64 = 10;

/// A populated settlement on one planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colony {
    /// Colony name, unique within the owning empire.
    pub name: String,
    /// System the planet belongs to.
    pub system: SystemId,
    /// Planet the colony sits on.
    pub planet: PlanetId,
    /// Inhabitants.
    pub population: u64,
    /// Infrastructure level, drives growth.
    pub infrastructure: u32,
    /// Mines built.
    pub mines: u32,
    /// Factories built.
    pub factories: u32,
}

impl Colony {
    /// Founds a colony with the starting population.
    #[must_use]
    pub fn new(name: impl Into<String>, system: SystemId, planet: PlanetId) -> Self {
        Self {
            name: name.into(),
            system,
            planet,
            population: STARTING_POPULATION,
            infrastructure: 1,
            mines: 0,
            factories: 0,
        }
    }

    /// Grows population by 1% per infrastructure level, truncated.
    pub fn grow(&mut self) -> u64 {
        let growth = self.population.saturating_mul(u64::from(self.infrastructure)) / 100;
        self.population = self.population.saturating_add(growth);
        growth
    }

    /// Adds one mine.
    pub fn build_mine(&mut self) {
        self.mines += 1;
    }

    /// Adds one factory.
    pub fn build_factory(&mut self) {
        self.factories += 1;
    }
}

/// What happened to research during one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchOutcome {
    /// No research selected.
    Idle,
    /// Points were invested but the technology is not finished.
    Progressed {
        /// Technology id.
        tech: String,
        /// Points spent this turn.
        spent: u32,
    },
    /// The technology was completed and the selection cleared.
    Completed {
        /// Technology id.
        tech: String,
        /// Display name.
        name: String,
    },
    /// Prerequisites are unmet; nothing was spent.
    Blocked {
        /// Technology id.
        tech: String,
    },
    /// No research points in stock.
    Starved {
        /// Technology id.
        tech: String,
    },
}

/// Result of one empire's economic step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number after advancing.
    pub turn: u32,
    /// Research result.
    pub research: ResearchOutcome,
    /// Total population growth across colonies.
    pub population_growth: u64,
}

impl fmt::Display for TurnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Turn {} completed", self.turn)?;
        match &self.research {
            ResearchOutcome::Completed { name, .. } => {
                write!(f, ". Research completed: {name}!")
            }
            ResearchOutcome::Blocked { tech } => {
                write!(f, ". Research blocked: prerequisites for {tech} are not met")
            }
            _ => Ok(()),
        }
    }
}

/// A faction: resources, research, colonies and fleets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Empire {
    /// Empire name.
    pub name: String,
    /// Resource stock and rates.
    pub resources: ResourceLedger,
    /// Research state.
    pub research: TechGraph,
    /// Colonies in founding order.
    pub colonies: Vec<Colony>,
    /// Fleets in creation order.
    pub fleets: Vec<Fleet>,
    turn: u32,
    current_research: Option<String>,
}

impl Empire {
    /// Creates an empire at turn 0 with the standard ledger and full tech catalog.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: ResourceLedger::new(),
            research: TechGraph::new(),
            colonies: Vec::new(),
            fleets: Vec::new(),
            turn: 0,
            current_research: None,
        }
    }

    /// Turns completed.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Technology being researched, if any.
    #[must_use]
    pub fn current_research(&self) -> Option<&str> {
        self.current_research.as_deref()
    }

    /// Selects the technology to research.
    ///
    /// # Errors
    ///
    /// Fails without changing the selection if the id is unknown, already
    /// researched, or its prerequisites are unmet.
    pub fn set_research(&mut self, tech_id: &str) -> Result<()> {
        let Some(tech) = self.research.get(tech_id) else {
            return Err(GameError::UnknownTechnology(tech_id.to_string()));
        };
        if tech.is_researched() {
            return Err(GameError::AlreadyResearched(tech.name.clone()));
        }
        if !self.research.prerequisites_met(tech_id) {
            return Err(GameError::PrerequisitesNotMet(tech.name.clone()));
        }
        self.current_research = Some(tech_id.to_string());
        Ok(())
    }

    /// Clears the research selection.
    pub fn clear_research(&mut self) {
        self.current_research = None;
    }

    /// Advances one turn: production, research, then colony growth.
    ///
    /// Research spends at most `research_cap` points, bounded by the research
    /// points in stock and the technology's remaining cost.
    pub fn advance_turn(&mut self, research_cap: u32) -> TurnReport {
        self.turn += 1;
        self.resources.produce(1);
        let research = self.step_research(research_cap);
        let population_growth = self.colonies.iter_mut().map(Colony::grow).sum();

        tracing::debug!(
            empire = %self.name,
            turn = self.turn,
            research = ?research,
            "Empire advanced"
        );
        TurnReport {
            turn: self.turn,
            research,
            population_growth,
        }
    }

    fn step_research(&mut self, research_cap: u32) -> ResearchOutcome {
        let Some(tech_id) = self.current_research.clone() else {
            return ResearchOutcome::Idle;
        };
        let Some(tech) = self.research.get(&tech_id) else {
            self.current_research = None;
            return ResearchOutcome::Idle;
        };
        if tech.is_researched() {
            self.current_research = None;
            return ResearchOutcome::Idle;
        }
        if !self.research.prerequisites_met(&tech_id) {
            return ResearchOutcome::Blocked { tech: tech_id };
        }

        let stock = self.resources.get(ResourceType::ResearchPoints);
        let stock = u32::try_from(stock).unwrap_or(u32::MAX);
        let spend = research_cap.min(stock).min(tech.remaining());
        let name = tech.name.clone();
        if spend == 0 {
            return ResearchOutcome::Starved { tech: tech_id };
        }

        let completed = self.research.research(&tech_id, spend);
        self.resources
            .consume(ResourceType::ResearchPoints, u64::from(spend));
        if completed {
            self.current_research = None;
            tracing::info!(empire = %self.name, tech = %tech_id, "Research completed");
            ResearchOutcome::Completed { tech: tech_id, name }
        } else {
            ResearchOutcome::Progressed {
                tech: tech_id,
                spent: spend,
            }
        }
    }

    /// Finds a fleet by name, ignoring case.
    #[must_use]
    pub fn fleet_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.fleets
            .iter()
            .position(|fleet| fleet.name.eq_ignore_ascii_case(name))
    }

    /// Fleet by name, ignoring case.
    #[must_use]
    pub fn fleet(&self, name: &str) -> Option<&Fleet> {
        self.fleet_index(name).map(|index| &self.fleets[index])
    }

    /// Finds a colony by name, ignoring case.
    #[must_use]
    pub fn colony_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.colonies
            .iter()
            .position(|colony| colony.name.eq_ignore_ascii_case(name))
    }

    /// Total population across colonies.
    #[must_use]
    pub fn total_population(&self) -> u64 {
        self.colonies.iter().map(|colony| colony.population).sum()
    }

    /// Total ships across fleets.
    #[must_use]
    pub fn ship_count(&self) -> usize {
        self.fleets.iter().map(Fleet::len).sum()
    }

    /// Serializable overview for reports.
    #[must_use]
    pub fn status(&self) -> EmpireStatus {
        EmpireStatus {
            name: self.name.clone(),
            turn: self.turn,
            colonies: self.colonies.len(),
            population: self.total_population(),
            fleets: self.fleets.len(),
            ships: self.ship_count(),
            researched: self.research.researched_ids().len(),
            current_research: self.current_research.clone(),
            resources: self
                .resources
                .snapshot()
                .map(|(ty, amount)| (ty.name().to_string(), amount))
                .collect(),
        }
    }

    /// Sets the turn counter. Load protocol only.
    pub(crate) fn restore_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    /// Sets the research selection without prerequisite checks. Load protocol only.
    ///
    /// Returns `false` and leaves the selection empty if the technology is
    /// unknown or already researched.
    pub(crate) fn restore_research(&mut self, tech_id: &str) -> bool {
        let valid = self
            .research
            .get(tech_id)
            .is_some_and(|tech| !tech.is_researched());
        self.current_research = valid.then(|| tech_id.to_string());
        valid
    }
}

/// Serializable empire overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpireStatus {
    /// Empire name.
    pub name: String,
    /// Turns completed.
    pub turn: u32,
    /// Colony count.
    pub colonies: usize,
    /// Total population.
    pub population: u64,
    /// Fleet count.
    pub fleets: usize,
    /// Ship count.
    pub ships: usize,
    /// Researched technology count.
    pub researched: usize,
    /// Technology in progress.
    pub current_research: Option<String>,
    /// Stock per resource, in ledger order.
    pub resources: Vec<(String, u64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colony_growth_truncates() {
        let mut colony = Colony::new("Earth", SystemId(0), PlanetId(2));
        assert_eq!(colony.grow(), 0);
        assert_eq!(colony.population, 10);

        colony.population = 1_000;
        colony.infrastructure = 3;
        assert_eq!(colony.grow(), 30);
        assert_eq!(colony.population, 1_030);
    }

    #[test]
    fn test_set_research_validation() {
        let mut empire = Empire::new("Test");
        assert!(matches!(
            empire.set_research("warp_theory"),
            Err(GameError::PrerequisitesNotMet(_))
        ));
        assert!(matches!(
            empire.set_research("hyperspace_bypass"),
            Err(GameError::UnknownTechnology(_))
        ));
        assert!(empire.current_research().is_none());
        assert!(empire.set_research("ion_drive").is_ok());
        assert_eq!(empire.current_research(), Some("ion_drive"));
    }

    #[test]
    fn test_research_spend_is_capped() {
        let mut empire = Empire::new("Test");
        empire.resources.set(ResourceType::ResearchPoints, 100);
        empire.set_research("basic_mining").unwrap();

        let report = empire.advance_turn(10);
        assert_eq!(
            report.research,
            ResearchOutcome::Progressed {
                tech: "basic_mining".into(),
                spent: 10
            }
        );
        // 100 stock + 5 produced - 10 spent
        assert_eq!(empire.resources.get(ResourceType::ResearchPoints), 95);
    }

    #[test]
    fn test_research_completes_and_clears() {
        let mut empire = Empire::new("Test");
        empire.resources.set(ResourceType::ResearchPoints, 1_000);
        empire.set_research("basic_mining").unwrap();
        empire.research.restore("basic_mining", 95, false);

        let report = empire.advance_turn(10);
        assert!(matches!(report.research, ResearchOutcome::Completed { .. }));
        assert!(empire.current_research().is_none());
        assert!(empire.research.is_researched("basic_mining"));
        // Only the 5 remaining points were spent.
        assert_eq!(empire.resources.get(ResourceType::ResearchPoints), 1_000);
        assert_eq!(report.to_string(), "Turn 1 completed. Research completed: Basic Mining!");
    }

    #[test]
    fn test_blocked_research_consumes_nothing() {
        let mut empire = Empire::new("Test");
        assert!(empire.restore_research("warp_theory"));
        let report = empire.advance_turn(10);
        assert_eq!(
            report.research,
            ResearchOutcome::Blocked {
                tech: "warp_theory".into()
            }
        );
        assert_eq!(empire.resources.get(ResourceType::ResearchPoints), 5);
        assert_eq!(empire.current_research(), Some("warp_theory"));
    }

    #[test]
    fn test_fleet_lookup_case_insensitive() {
        let mut empire = Empire::new("Test");
        empire.fleets.push(Fleet::new("Home Defense Fleet", "Test"));
        assert_eq!(empire.fleet_index("home defense fleet"), Some(0));
        assert!(empire.fleet("Ghost Fleet").is_none());
    }

    #[test]
    fn test_turn_report_plain() {
        let mut empire = Empire::new("Test");
        assert_eq!(empire.advance_turn(10).to_string(), "Turn 1 completed");
        assert_eq!(empire.turn(), 1);
    }
}
