//! Static technology catalog.

use crate::research::{TechCategory, TechEra};

/// Immutable definition of one technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TechDefinition {
    /// Stable identifier, used in saves and prerequisite lists.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Functional domain.
    pub category: TechCategory,
    /// Time tier.
    pub era: TechEra,
    /// Research points required.
    pub cost: u32,
    /// Ids that must be researched first.
    pub prerequisites: &'static [&'static str],
    /// Flavour text.
    pub description: &'static str,
}

const fn tech(
    id: &'static str,
    name: &'static str,
    category: TechCategory,
    era: TechEra,
    cost: u32,
    prerequisites: &'static [&'static str],
    description: &'static str,
) -> TechDefinition {
    TechDefinition {
        id,
        name,
        category,
        era,
        cost,
        prerequisites,
        description,
    }
}

use TechCategory::{
    Biology, Construction, Logistics, Mining, PowerGeneration, Propulsion, Sensors, Shields,
    Weapons,
};
use TechEra::{Advanced, EarlyWarp, Future, Interstellar, PreWarp};

/// Every technology in the game.
pub const TECH_CATALOG: &[TechDefinition] = &[
    // Pre-Warp
    tech("basic_mining", "Basic Mining", Mining, PreWarp, 100, &[], "Extract minerals from planetary crusts."),
    tech("nuclear_power", "Nuclear Power", PowerGeneration, PreWarp, 150, &[], "Fission reactors for ships and colonies."),
    tech("ion_drive", "Ion Drive", Propulsion, PreWarp, 200, &[], "Efficient sublight propulsion."),
    tech("missile_tech", "Missile Technology", Weapons, PreWarp, 150, &[], "Guided ship-to-ship missiles."),
    tech("basic_sensors", "Basic Sensors", Sensors, PreWarp, 100, &[], "Short range detection arrays."),
    // Early Warp
    tech("warp_theory", "Warp Theory", Propulsion, EarlyWarp, 500, &["ion_drive", "nuclear_power"], "The mathematics of folded space."),
    tech("warp_drive_1", "Warp Drive I", Propulsion, EarlyWarp, 1000, &["warp_theory"], "First generation faster-than-light drive."),
    tech("fusion_power", "Fusion Power", PowerGeneration, EarlyWarp, 600, &["nuclear_power"], "Compact fusion reactors."),
    tech("laser_weapons", "Laser Weapons", Weapons, EarlyWarp, 700, &["missile_tech"], "Focused energy beams."),
    tech("basic_shields", "Basic Shields", Shields, EarlyWarp, 800, &["fusion_power"], "Deflector fields absorb incoming fire."),
    tech("missile_guidance", "Missile Guidance", Weapons, EarlyWarp, 500, &["missile_tech", "basic_sensors"], "Terminal guidance improves missile accuracy."),
    tech("reinforced_hulls", "Reinforced Hulls", Construction, EarlyWarp, 600, &["basic_mining"], "Duranium bracing for warship hulls."),
    tech("fuel_logistics", "Fuel Logistics", Logistics, EarlyWarp, 400, &["ion_drive"], "Tanker doctrine and forward fuel depots."),
    // Interstellar
    tech("warp_drive_2", "Warp Drive II", Propulsion, Interstellar, 2000, &["warp_drive_1"], "Faster and more stable warp fields."),
    tech("advanced_mining", "Advanced Mining", Mining, Interstellar, 1500, &["basic_mining", "fusion_power"], "Deep core extraction."),
    tech("plasma_weapons", "Plasma Weapons", Weapons, Interstellar, 1800, &["laser_weapons", "fusion_power"], "Magnetically contained plasma bolts."),
    tech("long_range_sensors", "Long Range Sensors", Sensors, Interstellar, 1200, &["basic_sensors"], "Detect fleets across neighbouring systems."),
    tech("advanced_shields", "Advanced Shields", Shields, Interstellar, 2000, &["basic_shields"], "Layered deflector harmonics."),
    tech("orbital_construction", "Orbital Construction", Construction, Interstellar, 1600, &["advanced_mining"], "Shipyards and habitats in orbit."),
    tech("nanomaterials", "Nanomaterials", Construction, Interstellar, 2200, &["reinforced_hulls", "advanced_mining"], "Self-assembling structural lattices."),
    // Advanced
    tech("warp_drive_3", "Warp Drive III", Propulsion, Advanced, 4000, &["warp_drive_2"], "Military grade warp engines."),
    tech("antimatter_power", "Antimatter Power", PowerGeneration, Advanced, 3500, &["fusion_power"], "Matter-antimatter annihilation reactors."),
    tech("particle_beam", "Particle Beam", Weapons, Advanced, 3000, &["plasma_weapons"], "Relativistic particle streams."),
    tech("graviton_shields", "Graviton Shields", Shields, Advanced, 3500, &["advanced_shields"], "Gravitic distortion screens."),
    tech("quantum_sensors", "Quantum Sensors", Sensors, Advanced, 2500, &["long_range_sensors"], "Entanglement based detection."),
    tech("self_repairing_hulls", "Self-Repairing Hulls", Construction, Advanced, 4500, &["nanomaterials", "orbital_construction"], "Hulls that knit themselves back together."),
    // Future
    tech("transwarp_drive", "Transwarp Drive", Propulsion, Future, 8000, &["warp_drive_3", "antimatter_power"], "Cross the galaxy in days."),
    tech("zero_point_energy", "Zero Point Energy", PowerGeneration, Future, 7000, &["antimatter_power"], "Draw power from the vacuum itself."),
    tech("singularity_weapons", "Singularity Weapons", Weapons, Future, 10000, &["particle_beam", "graviton_shields"], "Weaponised micro black holes."),
    tech("phase_shields", "Phase Shields", Shields, Future, 9000, &["graviton_shields"], "Shields that phase incoming fire out of normal space."),
    tech("void_shields", "Void Shields", Shields, Future, 12000, &["phase_shields", "zero_point_energy"], "Shields anchored in the quantum vacuum."),
    tech("terraform_tech", "Terraforming", Biology, Future, 6000, &["orbital_construction"], "Reshape hostile worlds into habitable ones."),
];

/// Looks up a catalog entry by id.
#[must_use]
pub fn find_definition(id: &str) -> Option<&'static TechDefinition> {
    TECH_CATALOG.iter().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let ids: BTreeSet<_> = TECH_CATALOG.iter().map(|def| def.id).collect();
        assert_eq!(ids.len(), TECH_CATALOG.len());
        assert_eq!(TECH_CATALOG.len(), 32);
    }

    #[test]
    fn test_prerequisites_exist() {
        for def in TECH_CATALOG {
            for prereq in def.prerequisites {
                assert!(find_definition(prereq).is_some(), "{} -> {prereq}", def.id);
            }
        }
    }

    #[test]
    fn test_every_era_and_category_is_used() {
        let eras: BTreeSet<_> = TECH_CATALOG.iter().map(|def| def.era).collect();
        let categories: BTreeSet<_> = TECH_CATALOG.iter().map(|def| def.category).collect();
        assert_eq!(eras.len(), TechEra::ALL.len());
        assert_eq!(categories.len(), TechCategory::ALL.len());
    }
}
