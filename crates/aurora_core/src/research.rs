//! Research and the technology graph.
//!
//! Technologies form a directed acyclic prerequisite graph. A technology is
//! *available* when every prerequisite is researched and it is not itself
//! researched; only available technologies accept research points.
//!
//! # Example
//!
//! ```
//! use aurora_core::research::TechGraph;
//!
//! let mut graph = TechGraph::new();
//! assert!(!graph.research("warp_theory", 500)); // prerequisites missing
//! assert!(graph.research("ion_drive", 200));
//! assert!(graph.research("nuclear_power", 150));
//! assert!(graph.is_available("warp_theory"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{TechDefinition, TECH_CATALOG};
use crate::error::{GameError, Result};

/// Functional domain of a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechCategory {
    /// Drives and engines.
    Propulsion,
    /// Ship weapons.
    Weapons,
    /// Detection.
    Sensors,
    /// Deflector technology.
    Shields,
    /// Hulls and orbital construction.
    Construction,
    /// Resource extraction.
    Mining,
    /// Reactors.
    PowerGeneration,
    /// Life sciences.
    Biology,
    /// Supply and fuel.
    Logistics,
}

impl TechCategory {
    /// All categories.
    pub const ALL: [Self; 9] = [
        Self::Propulsion,
        Self::Weapons,
        Self::Sensors,
        Self::Shields,
        Self::Construction,
        Self::Mining,
        Self::PowerGeneration,
        Self::Biology,
        Self::Logistics,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Propulsion => "Propulsion",
            Self::Weapons => "Weapons",
            Self::Sensors => "Sensors",
            Self::Shields => "Shields",
            Self::Construction => "Construction",
            Self::Mining => "Mining",
            Self::PowerGeneration => "Power Generation",
            Self::Biology => "Biology",
            Self::Logistics => "Logistics",
        }
    }
}

impl fmt::Display for TechCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Time tier of a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechEra {
    /// Before faster-than-light travel.
    PreWarp,
    /// First warp drives.
    EarlyWarp,
    /// Established interstellar travel.
    Interstellar,
    /// Mature interstellar power.
    Advanced,
    /// Speculative technology.
    Future,
}

impl TechEra {
    /// All eras, oldest first.
    pub const ALL: [Self; 5] = [
        Self::PreWarp,
        Self::EarlyWarp,
        Self::Interstellar,
        Self::Advanced,
        Self::Future,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreWarp => "Pre-Warp",
            Self::EarlyWarp => "Early Warp",
            Self::Interstellar => "Interstellar",
            Self::Advanced => "Advanced",
            Self::Future => "Future",
        }
    }
}

impl fmt::Display for TechEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A technology and its research progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Functional domain.
    pub category: TechCategory,
    /// Time tier.
    pub era: TechEra,
    /// Research points required.
    pub cost: u32,
    /// Ids that must be researched first.
    pub prerequisites: Vec<String>,
    /// Flavour text.
    pub description: String,
    progress: u32,
    researched: bool,
}

impl Technology {
    /// Creates an unresearched technology with no prerequisites.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: TechCategory,
        era: TechEra,
        cost: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            era,
            cost,
            prerequisites: Vec::new(),
            description: String::new(),
            progress: 0,
            researched: false,
        }
    }

    /// Builder: set prerequisite ids.
    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Points invested so far, never above [`Self::cost`].
    #[must_use]
    pub const fn progress(&self) -> u32 {
        self.progress
    }

    /// Whether research has completed.
    #[must_use]
    pub const fn is_researched(&self) -> bool {
        self.researched
    }

    /// Points still needed to complete.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.cost - self.progress
    }

    fn add_progress(&mut self, points: u32) -> bool {
        self.progress = self.progress.saturating_add(points).min(self.cost);
        if self.progress == self.cost {
            self.researched = true;
        }
        self.researched
    }
}

impl From<&TechDefinition> for Technology {
    fn from(def: &TechDefinition) -> Self {
        Self::new(def.id, def.name, def.category, def.era, def.cost)
            .with_prerequisites(def.prerequisites.iter().copied())
            .with_description(def.description)
    }
}

/// Every technology an empire knows about, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechGraph {
    techs: BTreeMap<String, Technology>,
    researched: BTreeSet<String>,
}

impl Default for TechGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TechGraph {
    /// Creates a graph holding the full built-in catalog, nothing researched.
    #[must_use]
    pub fn new() -> Self {
        Self {
            techs: TECH_CATALOG
                .iter()
                .map(|def| (def.id.to_string(), Technology::from(def)))
                .collect(),
            researched: BTreeSet::new(),
        }
    }

    /// Builds a graph from custom technologies.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidTechGraph`] if an id is duplicated, a
    /// prerequisite is missing, or the prerequisites form a cycle.
    pub fn from_technologies(technologies: impl IntoIterator<Item = Technology>) -> Result<Self> {
        let mut techs = BTreeMap::new();
        for tech in technologies {
            let id = tech.id.clone();
            if techs.insert(id.clone(), tech).is_some() {
                return Err(GameError::InvalidTechGraph(format!("duplicate id {id}")));
            }
        }
        let researched = techs
            .values()
            .filter(|tech| tech.researched)
            .map(|tech| tech.id.clone())
            .collect();
        let graph = Self { techs, researched };
        graph.validate()?;
        Ok(graph)
    }

    /// Checks that every prerequisite exists and the graph has no cycles.
    pub fn validate(&self) -> Result<()> {
        for tech in self.techs.values() {
            if let Some(missing) = tech
                .prerequisites
                .iter()
                .find(|id| !self.techs.contains_key(id.as_str()))
            {
                return Err(GameError::InvalidTechGraph(format!(
                    "{} requires unknown {missing}",
                    tech.id
                )));
            }
        }

        // Kahn's algorithm: anything left over sits on a cycle.
        let mut pending: BTreeMap<&str, usize> = self
            .techs
            .values()
            .map(|tech| (tech.id.as_str(), tech.prerequisites.len()))
            .collect();
        let mut ready: Vec<&str> = pending
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut visited = 0;
        while let Some(done) = ready.pop() {
            visited += 1;
            for tech in self.techs.values() {
                if tech.prerequisites.iter().any(|p| p == done) {
                    if let Some(count) = pending.get_mut(tech.id.as_str()) {
                        *count -= 1;
                        if *count == 0 {
                            ready.push(tech.id.as_str());
                        }
                    }
                }
            }
        }
        if visited == self.techs.len() {
            Ok(())
        } else {
            Err(GameError::InvalidTechGraph(
                "prerequisites form a cycle".to_string(),
            ))
        }
    }

    /// Looks up a technology by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Technology> {
        self.techs.get(id)
    }

    /// Number of technologies in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.techs.len()
    }

    /// Whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }

    /// All technologies, ordered by id.
    pub fn technologies(&self) -> impl Iterator<Item = &Technology> {
        self.techs.values()
    }

    /// Ids of researched technologies.
    #[must_use]
    pub fn researched_ids(&self) -> &BTreeSet<String> {
        &self.researched
    }

    /// Whether a technology is researched. Unknown ids are not.
    #[must_use]
    pub fn is_researched(&self, id: &str) -> bool {
        self.researched.contains(id)
    }

    /// Whether every prerequisite of `id` is researched.
    #[must_use]
    pub fn prerequisites_met(&self, id: &str) -> bool {
        self.techs.get(id).is_some_and(|tech| {
            tech.prerequisites
                .iter()
                .all(|prereq| self.researched.contains(prereq))
        })
    }

    /// Whether `id` can currently receive research points.
    #[must_use]
    pub fn is_available(&self, id: &str) -> bool {
        !self.is_researched(id) && self.prerequisites_met(id)
    }

    /// Every available technology, ordered by id.
    #[must_use]
    pub fn available_techs(&self) -> Vec<&Technology> {
        self.techs
            .values()
            .filter(|tech| self.is_available(&tech.id))
            .collect()
    }

    /// Adds research points to an available technology.
    ///
    /// Returns `true` exactly when this call completes the technology.
    /// Unknown or unavailable technologies are left untouched and return
    /// `false`.
    pub fn research(&mut self, id: &str, points: u32) -> bool {
        if !self.is_available(id) {
            return false;
        }
        let Some(tech) = self.techs.get_mut(id) else {
            return false;
        };
        let completed = tech.add_progress(points);
        if completed {
            self.researched.insert(id.to_string());
            tracing::debug!(tech = id, "Research completed");
        }
        completed
    }

    /// Sets progress directly, bypassing prerequisite checks.
    ///
    /// Only the save loader may call this. A technology whose restored
    /// progress reaches its cost is treated as researched. Progress never
    /// moves backwards. Returns `false` for unknown ids.
    pub(crate) fn restore(&mut self, id: &str, progress: u32, researched: bool) -> bool {
        let Some(tech) = self.techs.get_mut(id) else {
            return false;
        };
        let target = if researched { tech.cost } else { progress.min(tech.cost) };
        tech.progress = tech.progress.max(target);
        if tech.progress == tech.cost {
            tech.researched = true;
            self.researched.insert(id.to_string());
        }
        true
    }
}
