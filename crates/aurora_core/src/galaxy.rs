//! Seeded procedural galaxy generation.
//!
//! A galaxy is a fixed set of star systems, each with one star and 2-10
//! planets. Systems and planets live in arenas owned by [`Galaxy`] and are
//! referenced everywhere else through [`SystemId`] and [`PlanetId`].
//!
//! # Determinism
//!
//! All randomness comes from one [`ChaCha8Rng`] seeded with the galaxy seed,
//! consumed in a fixed order: the home system first, then every other system
//! in index order (name, coordinates, star type, planet count, then each
//! planet's type and minerals). Regenerating with the same seed and system
//! count yields identical terrain, which is what save files rely on.
//!
//! # Example
//!
//! ```
//! use aurora_core::galaxy::{Galaxy, GalaxyConfig};
//!
//! let galaxy = Galaxy::generate(&GalaxyConfig::default().with_seed(42).with_num_systems(5));
//! assert_eq!(galaxy.len(), 5);
//! assert_eq!(galaxy.home_system().name, "Sol");
//! assert!(galaxy.home_system().explored);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::data::{NAME_PREFIXES, NAME_SUFFIXES, PLANET_TYPES, STAR_TYPES};
use crate::resources::ResourceType;
use crate::rng;

/// Name of the home system.
pub const HOME_SYSTEM_NAME: &str = "Sol";

/// Probability that a given raw mineral is present on a planet.
pub const MINERAL_PRESENCE_CHANCE: f64 = 0.7;

/// Inclusive bounds of a present mineral deposit.
pub const MINERAL_AMOUNT_RANGE: (u32, u32) = (1_000, 100_000);

/// Inclusive bounds of the planet count per system.
pub const PLANET_COUNT_RANGE: (usize, usize) = (2, 10);

/// Handle of a star system in the galaxy arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// Handle of a planet in the galaxy arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanetId(pub u32);

impl SystemId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl PlanetId {
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stellar classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarType {
    /// Small, cool main-sequence star.
    RedDwarf,
    /// Sun-like star.
    YellowDwarf,
    /// Hot, massive star.
    BlueGiant,
    /// Swollen late-life star.
    RedGiant,
    /// Stellar remnant.
    WhiteDwarf,
}

impl StarType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RedDwarf => "Red Dwarf",
            Self::YellowDwarf => "Yellow Dwarf",
            Self::BlueGiant => "Blue Giant",
            Self::RedGiant => "Red Giant",
            Self::WhiteDwarf => "White Dwarf",
        }
    }
}

impl fmt::Display for StarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Planetary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    /// Rocky, earth-like world.
    Terrestrial,
    /// Gas giant.
    GasGiant,
    /// Frozen world.
    Ice,
    /// Arid world.
    Desert,
    /// Water world.
    Ocean,
    /// Geologically active world.
    Volcanic,
}

impl PlanetType {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Terrestrial => "Terrestrial",
            Self::GasGiant => "Gas Giant",
            Self::Ice => "Ice",
            Self::Desert => "Desert",
            Self::Ocean => "Ocean",
            Self::Volcanic => "Volcanic",
        }
    }

    /// Whether colonists can settle this type of world.
    #[must_use]
    pub const fn is_habitable(self) -> bool {
        matches!(self, Self::Terrestrial | Self::Ocean)
    }
}

impl fmt::Display for PlanetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A system's star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    /// Display name, `"<system> Primary"`.
    pub name: String,
    /// Classification.
    pub star_type: StarType,
}

/// Non-owning link from a planet to the colony settled on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonyRef {
    /// Empire owning the colony.
    pub owner: String,
    /// Colony name, unique within the owner.
    pub colony: String,
}

/// A planet and its mineral endowment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    /// Arena handle.
    pub id: PlanetId,
    /// System this planet orbits.
    pub system: SystemId,
    /// Display name, `"<system> A"`, `"<system> B"`, ...
    pub name: String,
    /// Classification.
    pub planet_type: PlanetType,
    /// Raw mineral deposits present on the planet.
    pub minerals: BTreeMap<ResourceType, u32>,
    colony: Option<ColonyRef>,
}

impl Planet {
    /// Whether a colony has been founded here.
    #[must_use]
    pub const fn is_colonized(&self) -> bool {
        self.colony.is_some()
    }

    /// The colony on this planet, if any.
    #[must_use]
    pub const fn colony(&self) -> Option<&ColonyRef> {
        self.colony.as_ref()
    }

    /// Whether a new colony could be founded here.
    #[must_use]
    pub const fn is_colonizable(&self) -> bool {
        self.planet_type.is_habitable() && !self.is_colonized()
    }
}

/// Integer position in galactic space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// X axis.
    pub x: i32,
    /// Y axis.
    pub y: i32,
    /// Z axis.
    pub z: i32,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A star system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarSystem {
    /// Arena handle.
    pub id: SystemId,
    /// Unique display name.
    pub name: String,
    /// Position.
    pub coordinates: Coordinates,
    /// Primary star.
    pub star: Star,
    /// Planets in orbital order.
    pub planets: Vec<PlanetId>,
    /// Whether the player has surveyed this system.
    pub explored: bool,
}

/// Galaxy generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Total systems including home. Values below 1 are raised to 1.
    pub num_systems: usize,
    /// Generation seed. Zero picks a fresh random seed.
    pub seed: u64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            num_systems: 20,
            seed: 0,
        }
    }
}

impl GalaxyConfig {
    /// Builder: set seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder: set system count.
    #[must_use]
    pub const fn with_num_systems(mut self, num_systems: usize) -> Self {
        self.num_systems = num_systems;
        self
    }
}

/// The generated galaxy: system and planet arenas plus the home system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Galaxy {
    seed: u64,
    home: SystemId,
    systems: Vec<StarSystem>,
    planets: Vec<Planet>,
}

impl Galaxy {
    /// Generates a galaxy.
    ///
    /// The home system [`HOME_SYSTEM_NAME`] sits at the origin and starts
    /// explored. A zero seed is replaced by a random non-zero one, available
    /// afterwards through [`Galaxy::seed`].
    #[must_use]
    pub fn generate(config: &GalaxyConfig) -> Self {
        let seed = if config.seed == 0 {
            rand::thread_rng().gen_range(1..=u64::MAX)
        } else {
            config.seed
        };
        let num_systems = config.num_systems.max(1);
        let mut rng = rng::galaxy_stream(seed);

        let mut galaxy = Self {
            seed,
            home: SystemId(0),
            systems: Vec::with_capacity(num_systems),
            planets: Vec::new(),
        };
        let mut used_names = HashSet::new();

        galaxy.push_system(&mut rng, HOME_SYSTEM_NAME.to_string(), Coordinates::default());
        used_names.insert(HOME_SYSTEM_NAME.to_string());
        galaxy.systems[0].explored = true;

        for _ in 1..num_systems {
            let prefix = NAME_PREFIXES[rng.gen_range(0..NAME_PREFIXES.len())];
            let suffix = NAME_SUFFIXES[rng.gen_range(0..NAME_SUFFIXES.len())];
            let name = unique_name(&mut used_names, format!("{prefix} {suffix}"));
            let coordinates = Coordinates {
                x: rng.gen_range(-50..=50),
                y: rng.gen_range(-50..=50),
                z: rng.gen_range(-20..=20),
            };
            galaxy.push_system(&mut rng, name, coordinates);
        }

        tracing::debug!(
            seed,
            systems = galaxy.systems.len(),
            planets = galaxy.planets.len(),
            "Generated galaxy"
        );
        galaxy
    }

    fn push_system(&mut self, rng: &mut ChaCha8Rng, name: String, coordinates: Coordinates) {
        let id = SystemId(self.systems.len() as u32);
        let star = Star {
            name: format!("{name} Primary"),
            star_type: STAR_TYPES[rng.gen_range(0..STAR_TYPES.len())],
        };
        let count = rng.gen_range(PLANET_COUNT_RANGE.0..=PLANET_COUNT_RANGE.1);
        let mut planet_ids = Vec::with_capacity(count);
        for letter in ('A'..='Z').take(count) {
            let planet_type = PLANET_TYPES[rng.gen_range(0..PLANET_TYPES.len())];
            let mut minerals = BTreeMap::new();
            for mineral in ResourceType::RAW_MINERALS {
                if rng.gen_bool(MINERAL_PRESENCE_CHANCE) {
                    let amount = rng.gen_range(MINERAL_AMOUNT_RANGE.0..=MINERAL_AMOUNT_RANGE.1);
                    minerals.insert(mineral, amount);
                }
            }
            let planet_id = PlanetId(self.planets.len() as u32);
            self.planets.push(Planet {
                id: planet_id,
                system: id,
                name: format!("{name} {letter}"),
                planet_type,
                minerals,
                colony: None,
            });
            planet_ids.push(planet_id);
        }
        self.systems.push(StarSystem {
            id,
            name,
            coordinates,
            star,
            planets: planet_ids,
            explored: false,
        });
    }

    /// Seed the galaxy was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Always `false`: a galaxy contains at least its home system.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Home system handle.
    #[must_use]
    pub const fn home(&self) -> SystemId {
        self.home
    }

    /// Home system.
    #[must_use]
    pub fn home_system(&self) -> &StarSystem {
        &self.systems[self.home.index()]
    }

    /// All systems in index order.
    #[must_use]
    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    /// All planets in arena order.
    #[must_use]
    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// System by handle.
    #[must_use]
    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.index())
    }

    /// System by index, clamped to the last system.
    #[must_use]
    pub fn system_at_clamped(&self, index: usize) -> SystemId {
        SystemId(index.min(self.systems.len().saturating_sub(1)) as u32)
    }

    /// Planet by handle.
    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.index())
    }

    /// Planets of a system in orbital order.
    pub fn planets_in(&self, system: SystemId) -> impl Iterator<Item = &Planet> {
        self.system(system)
            .into_iter()
            .flat_map(|sys| sys.planets.iter())
            .filter_map(|&id| self.planet(id))
    }

    /// Finds a system by name, ignoring case.
    #[must_use]
    pub fn find_system_by_name(&self, name: &str) -> Option<SystemId> {
        let name = name.trim();
        self.systems
            .iter()
            .find(|sys| sys.name.eq_ignore_ascii_case(name))
            .map(|sys| sys.id)
    }

    /// Finds a planet of a system by name, ignoring case.
    #[must_use]
    pub fn find_planet(&self, system: SystemId, name: &str) -> Option<PlanetId> {
        self.planets_in(system)
            .find(|planet| planet.name.eq_ignore_ascii_case(name))
            .map(|planet| planet.id)
    }

    /// Uncolonized habitable planets of a system, in orbital order.
    #[must_use]
    pub fn colonizable_planets(&self, system: SystemId) -> Vec<PlanetId> {
        self.planets_in(system)
            .filter(|planet| planet.is_colonizable())
            .map(|planet| planet.id)
            .collect()
    }

    /// Marks a system explored. Returns `true` if it was not explored before.
    pub fn explore(&mut self, system: SystemId) -> bool {
        match self.systems.get_mut(system.index()) {
            Some(sys) if !sys.explored => {
                sys.explored = true;
                true
            }
            _ => false,
        }
    }

    /// Explored systems in index order.
    pub fn explored_systems(&self) -> impl Iterator<Item = &StarSystem> {
        self.systems.iter().filter(|sys| sys.explored)
    }

    /// Links a planet to a colony.
    ///
    /// Returns `false` if the planet does not exist or already hosts a colony.
    /// Habitability is not checked: starting colonies may sit on any world.
    pub fn colonize(&mut self, planet: PlanetId, colony: ColonyRef) -> bool {
        match self.planets.get_mut(planet.index()) {
            Some(p) if p.colony.is_none() => {
                p.colony = Some(colony);
                true
            }
            _ => false,
        }
    }
}

fn unique_name(used: &mut HashSet<String>, base: String) -> String {
    const NUMERALS: [&str; 8] = ["II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];
    let mut name = base.clone();
    let mut n = 0usize;
    while used.contains(&name) {
        name = match NUMERALS.get(n) {
            Some(numeral) => format!("{base} {numeral}"),
            None => format!("{base} {}", n + 2),
        };
        n += 1;
    }
    used.insert(name.clone());
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64, systems: usize) -> GalaxyConfig {
        GalaxyConfig::default().with_seed(seed).with_num_systems(systems)
    }

    #[test]
    fn test_home_system() {
        let galaxy = Galaxy::generate(&config(42, 5));
        let home = galaxy.home_system();
        assert_eq!(home.name, "Sol");
        assert_eq!(home.coordinates, Coordinates::default());
        assert!(home.explored);
        assert_eq!(home.star.name, "Sol Primary");
        assert!(galaxy.systems().iter().skip(1).all(|sys| !sys.explored));
    }

    #[test]
    fn test_system_count_and_bounds() {
        let galaxy = Galaxy::generate(&config(7, 30));
        assert_eq!(galaxy.len(), 30);
        for sys in galaxy.systems() {
            assert!((2..=10).contains(&sys.planets.len()));
            assert!((-50..=50).contains(&sys.coordinates.x));
            assert!((-50..=50).contains(&sys.coordinates.y));
            assert!((-20..=20).contains(&sys.coordinates.z));
        }
        for planet in galaxy.planets() {
            for &amount in planet.minerals.values() {
                assert!((1_000..=100_000).contains(&amount));
            }
        }
    }

    #[test]
    fn test_determinism() {
        let a = Galaxy::generate(&config(12345, 20));
        let b = Galaxy::generate(&config(12345, 20));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds() {
        let a = Galaxy::generate(&config(1, 20));
        let b = Galaxy::generate(&config(2, 20));
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_seed_is_replaced() {
        let galaxy = Galaxy::generate(&config(0, 3));
        assert_ne!(galaxy.seed(), 0);
        let again = Galaxy::generate(&config(galaxy.seed(), 3));
        assert_eq!(galaxy, again);
    }

    #[test]
    fn test_zero_systems_still_has_home() {
        let galaxy = Galaxy::generate(&config(9, 0));
        assert_eq!(galaxy.len(), 1);
        assert_eq!(galaxy.system_at_clamped(8), SystemId(0));
    }

    #[test]
    fn test_names_are_unique() {
        let galaxy = Galaxy::generate(&config(3, 120));
        let names: HashSet<_> = galaxy.systems().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names.len(), galaxy.len());
    }

    #[test]
    fn test_find_system_case_insensitive() {
        let galaxy = Galaxy::generate(&config(42, 5));
        assert_eq!(galaxy.find_system_by_name("sOL"), Some(galaxy.home()));
        assert_eq!(galaxy.find_system_by_name("Nowhere"), None);
    }

    #[test]
    fn test_colonize_and_explore() {
        let mut galaxy = Galaxy::generate(&config(42, 5));
        let target = galaxy.system_at_clamped(1);
        assert!(galaxy.explore(target));
        assert!(!galaxy.explore(target));

        let planet = galaxy.planets_in(target).map(|p| p.id).next().unwrap();
        let link = ColonyRef {
            owner: "Earth Empire".into(),
            colony: "Outpost".into(),
        };
        assert!(galaxy.colonize(planet, link.clone()));
        assert!(!galaxy.colonize(planet, link));
        assert!(!galaxy.colonizable_planets(target).contains(&planet));
    }

    #[test]
    fn test_planet_naming() {
        let galaxy = Galaxy::generate(&config(5, 2));
        let home = galaxy.home_system();
        let first = galaxy.planet(home.planets[0]).unwrap();
        let second = galaxy.planet(home.planets[1]).unwrap();
        assert_eq!(first.name, "Sol A");
        assert_eq!(second.name, "Sol B");
    }
}
