//! Galaxy listings.

use aurora_core::galaxy::Galaxy;
use serde::Serialize;

/// Serializable view of one planet.
#[derive(Debug, Clone, Serialize)]
pub struct PlanetSummary {
    /// Planet name.
    pub name: String,
    /// Planet type.
    pub planet_type: String,
    /// Whether a colony can be founded here.
    pub colonizable: bool,
    /// Owning colony, if any.
    pub colony: Option<String>,
    /// Total mineral deposits.
    pub minerals: u64,
}

/// Serializable view of one system.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSummary {
    /// System name.
    pub name: String,
    /// Star type.
    pub star: String,
    /// Coordinates as `(x, y, z)`.
    pub coordinates: (i32, i32, i32),
    /// Explored by the player.
    pub explored: bool,
    /// Planets in orbital order.
    pub planets: Vec<PlanetSummary>,
}

/// Serializable view of a galaxy.
#[derive(Debug, Clone, Serialize)]
pub struct GalaxySummary {
    /// Seed.
    pub seed: u64,
    /// Systems in index order.
    pub systems: Vec<SystemSummary>,
}

impl GalaxySummary {
    /// Builds the view.
    #[must_use]
    pub fn of(galaxy: &Galaxy) -> Self {
        let systems = galaxy
            .systems()
            .iter()
            .map(|system| SystemSummary {
                name: system.name.clone(),
                star: system.star.star_type.name().to_string(),
                coordinates: (system.coordinates.x, system.coordinates.y, system.coordinates.z),
                explored: system.explored,
                planets: galaxy
                    .planets_in(system.id)
                    .map(|planet| PlanetSummary {
                        name: planet.name.clone(),
                        planet_type: planet.planet_type.name().to_string(),
                        colonizable: planet.is_colonizable(),
                        colony: planet.colony().map(|link| link.colony.clone()),
                        minerals: planet.minerals.values().map(|&amount| u64::from(amount)).sum(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            seed: galaxy.seed(),
            systems,
        }
    }
}

/// One block per system: name, star, coordinates and planets.
#[must_use]
pub fn describe_galaxy(galaxy: &Galaxy) -> String {
    let mut lines = vec![format!("Galaxy seed {} ({} systems)", galaxy.seed(), galaxy.len())];
    for system in galaxy.systems() {
        lines.push(format!(
            "{} [{}] at {}{}",
            system.name,
            system.star.star_type.name(),
            system.coordinates,
            if system.explored { " (explored)" } else { "" }
        ));
        for planet in galaxy.planets_in(system.id) {
            let marker = match planet.colony() {
                Some(link) => format!(" colony: {}", link.colony),
                None if planet.is_colonizable() => " colonizable".to_string(),
                None => String::new(),
            };
            lines.push(format!(
                "  {} - {}, {} minerals{marker}",
                planet.name,
                planet.planet_type.name(),
                planet.minerals.len()
            ));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::galaxy::GalaxyConfig;

    #[test]
    fn test_describe_lists_every_system() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(42).with_num_systems(5));
        let text = describe_galaxy(&galaxy);
        assert!(text.starts_with("Galaxy seed 42 (5 systems)"));
        assert!(text.contains("Sol ["));
        for system in galaxy.systems() {
            assert!(text.contains(&system.name));
        }
    }

    #[test]
    fn test_summary_matches_galaxy() {
        let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(7).with_num_systems(3));
        let summary = GalaxySummary::of(&galaxy);
        assert_eq!(summary.systems.len(), 3);
        assert_eq!(summary.systems[0].coordinates, (0, 0, 0));
        assert!(summary.systems[0].explored);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"seed\":7"));
    }
}
