//! Name and type tables for galaxy generation.

use crate::galaxy::{PlanetType, StarType};

/// Star types, in draw order.
pub const STAR_TYPES: [StarType; 5] = [
    StarType::RedDwarf,
    StarType::YellowDwarf,
    StarType::BlueGiant,
    StarType::RedGiant,
    StarType::WhiteDwarf,
];

/// Planet types, in draw order.
pub const PLANET_TYPES: [PlanetType; 6] = [
    PlanetType::Terrestrial,
    PlanetType::GasGiant,
    PlanetType::Ice,
    PlanetType::Desert,
    PlanetType::Ocean,
    PlanetType::Volcanic,
];

/// First word of a generated system name.
pub const NAME_PREFIXES: [&str; 15] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron",
];

/// Second word of a generated system name.
pub const NAME_SUFFIXES: [&str; 10] = [
    "Centauri",
    "Draconis",
    "Eridani",
    "Cygni",
    "Leonis",
    "Aquarii",
    "Cassiopeiae",
    "Orionis",
    "Pegasi",
    "Andromedae",
];
