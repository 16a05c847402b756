//! Static game data tables.
//!
//! This module contains the catalogs the simulation draws from: the
//! technology tree, ship class baselines, weapon profiles, and the star,
//! planet and name tables used by galaxy generation.
//!
//! **Note:** This module contains no logic beyond lookups.

mod galaxy_data;
mod ship_data;
mod tech_catalog;

pub use galaxy_data::{NAME_PREFIXES, NAME_SUFFIXES, PLANET_TYPES, STAR_TYPES};
pub use ship_data::{
    hull_profile, HullProfile, WeaponProfile, WeaponSlot, BEAM_UPGRADES, GUIDED_MISSILE_ACCURACY,
    HEAVY_LASER, HULL_BONUSES, LASER_CANNON, MISSILE_LAUNCHER, RAILGUN, SHIELD_BONUSES,
};
pub use tech_catalog::{find_definition, TechDefinition, TECH_CATALOG};
