//! Ships, weapons and fleets.
//!
//! Ship classes differ only in data (see [`crate::data::hull_profile`]);
//! every ship shares the same damage model: shields absorb first, the hull
//! takes the remainder, and a ship whose hull reaches zero is destroyed for
//! good.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::WeaponProfile;
use crate::error::GameError;
use crate::galaxy::SystemId;

/// The eight ship classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipClass {
    /// Unarmoured reconnaissance ship.
    Scout,
    /// Small strike craft.
    Fighter,
    /// Light escort.
    Corvette,
    /// Medium escort.
    Frigate,
    /// Line destroyer.
    Destroyer,
    /// Heavy cruiser.
    Cruiser,
    /// Capital ship.
    Battleship,
    /// Fleet carrier.
    Carrier,
}

impl ShipClass {
    /// All classes, smallest role first.
    pub const ALL: [Self; 8] = [
        Self::Scout,
        Self::Fighter,
        Self::Corvette,
        Self::Frigate,
        Self::Destroyer,
        Self::Cruiser,
        Self::Battleship,
        Self::Carrier,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scout => "Scout",
            Self::Fighter => "Fighter",
            Self::Corvette => "Corvette",
            Self::Frigate => "Frigate",
            Self::Destroyer => "Destroyer",
            Self::Cruiser => "Cruiser",
            Self::Battleship => "Battleship",
            Self::Carrier => "Carrier",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GameError::InvalidShipClass(trimmed.to_string()))
    }
}

/// A mounted weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Display name.
    pub name: String,
    /// Damage dealt on a hit.
    pub damage: u32,
    /// Hit probability in `[0, 1]`.
    pub accuracy: f64,
    /// Engagement range.
    pub range: u32,
}

impl Weapon {
    /// Creates a weapon. Accuracy is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(name: impl Into<String>, damage: u32, accuracy: f64, range: u32) -> Self {
        let accuracy = if accuracy.is_nan() { 0.0 } else { accuracy.clamp(0.0, 1.0) };
        Self {
            name: name.into(),
            damage,
            accuracy,
            range,
        }
    }

    /// Rolls one shot: `damage` with probability `accuracy`, else 0.
    pub fn fire<R: Rng>(&self, rng: &mut R) -> u32 {
        if rng.gen::<f64>() < self.accuracy {
            self.damage
        } else {
            0
        }
    }
}

impl From<&WeaponProfile> for Weapon {
    fn from(profile: &WeaponProfile) -> Self {
        Self::new(profile.name, profile.damage, profile.accuracy, profile.range)
    }
}

/// A single warship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Display name.
    pub name: String,
    /// Class.
    pub class: ShipClass,
    /// Weapons in firing order.
    pub weapons: Vec<Weapon>,
    max_hull: u32,
    hull: u32,
    max_shields: u32,
    shields: u32,
    destroyed: bool,
}

impl Ship {
    /// Creates an undamaged, unarmed ship.
    #[must_use]
    pub fn new(name: impl Into<String>, class: ShipClass, max_hull: u32, max_shields: u32) -> Self {
        Self {
            name: name.into(),
            class,
            weapons: Vec::new(),
            max_hull,
            hull: max_hull,
            max_shields,
            shields: max_shields,
            destroyed: max_hull == 0,
        }
    }

    /// Builder: mount a weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    /// Current hull points.
    #[must_use]
    pub const fn hull(&self) -> u32 {
        self.hull
    }

    /// Maximum hull points.
    #[must_use]
    pub const fn max_hull(&self) -> u32 {
        self.max_hull
    }

    /// Current shield points.
    #[must_use]
    pub const fn shields(&self) -> u32 {
        self.shields
    }

    /// Maximum shield points.
    #[must_use]
    pub const fn max_shields(&self) -> u32 {
        self.max_shields
    }

    /// Whether the ship has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the ship can still fight.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        self.hull > 0 && !self.destroyed
    }

    /// Hull plus shields.
    #[must_use]
    pub const fn strength(&self) -> u64 {
        self.hull as u64 + self.shields as u64
    }

    /// Applies damage: shields absorb first, the hull takes the rest.
    ///
    /// A hull driven to zero destroys the ship permanently. Damage to a
    /// destroyed ship is ignored.
    pub fn take_damage(&mut self, amount: u32) {
        if self.destroyed {
            return;
        }
        let absorbed = self.shields.min(amount);
        self.shields -= absorbed;
        let remainder = amount - absorbed;
        self.hull = self.hull.saturating_sub(remainder);
        if self.hull == 0 {
            self.destroyed = true;
        }
    }

    /// Fires every weapon once and returns the total damage that hit.
    pub fn fire_volley<R: Rng>(&self, rng: &mut R) -> u32 {
        self.weapons
            .iter()
            .map(|weapon| weapon.fire(rng))
            .fold(0u32, u32::saturating_add)
    }
}

/// A named group of ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Fleet name, unique within the owner.
    pub name: String,
    /// Owning empire name.
    pub owner: String,
    /// Ships in order.
    pub ships: Vec<Ship>,
    /// Current system, if any.
    pub location: Option<SystemId>,
}

impl Fleet {
    /// Creates an empty fleet with no location.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            ships: Vec::new(),
            location: None,
        }
    }

    /// Builder: set location.
    #[must_use]
    pub fn with_location(mut self, system: SystemId) -> Self {
        self.location = Some(system);
        self
    }

    /// Builder: add a ship.
    #[must_use]
    pub fn with_ship(mut self, ship: Ship) -> Self {
        self.ships.push(ship);
        self
    }

    /// Adds a ship to the end of the roster.
    pub fn add_ship(&mut self, ship: Ship) {
        self.ships.push(ship);
    }

    /// Number of ships, operational or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Whether the fleet has no ships at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Indices of operational ships.
    #[must_use]
    pub fn operational_indices(&self) -> Vec<usize> {
        self.ships
            .iter()
            .enumerate()
            .filter(|(_, ship)| ship.is_operational())
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of operational ships.
    #[must_use]
    pub fn operational_count(&self) -> usize {
        self.ships.iter().filter(|ship| ship.is_operational()).count()
    }

    /// Sum of hull plus shields over operational ships.
    #[must_use]
    pub fn combat_strength(&self) -> u64 {
        self.ships
            .iter()
            .filter(|ship| ship.is_operational())
            .map(Ship::strength)
            .sum()
    }

    /// Sum of hull plus shields over every ship.
    #[must_use]
    pub fn total_hp(&self) -> u64 {
        self.ships.iter().map(Ship::strength).sum()
    }

    /// Whether no ship can fight.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.operational_count() == 0
    }

    /// Drops destroyed ships and returns how many were removed.
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.ships.len();
        self.ships.retain(Ship::is_operational);
        before - self.ships.len()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn corvette() -> Ship {
        Ship::new("Test-Corvette-1", ShipClass::Corvette, 100, 40)
    }

    #[test]
    fn test_shields_absorb_first() {
        let mut ship = corvette();
        ship.take_damage(25);
        assert_eq!(ship.shields(), 15);
        assert_eq!(ship.hull(), 100);
    }

    #[test]
    fn test_overflow_hits_hull() {
        let mut ship = corvette();
        ship.take_damage(55);
        assert_eq!(ship.shields(), 0);
        assert_eq!(ship.hull(), 85);
        assert!(ship.is_operational());
    }

    #[test]
    fn test_lethal_damage_clamps_and_destroys() {
        let mut ship = corvette();
        ship.take_damage(1_000);
        assert_eq!(ship.hull(), 0);
        assert_eq!(ship.shields(), 0);
        assert!(ship.is_destroyed());
        assert!(!ship.is_operational());

        ship.take_damage(10);
        assert_eq!(ship.hull(), 0);
    }

    #[test]
    fn test_weapon_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sure = Weapon::new("Sure", 7, 1.0, 1);
        let never = Weapon::new("Never", 7, 0.0, 1);
        for _ in 0..50 {
            assert_eq!(sure.fire(&mut rng), 7);
            assert_eq!(never.fire(&mut rng), 0);
        }
        assert!((Weapon::new("Wild", 1, 3.0, 1).accuracy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_class_parsing() {
        assert_eq!("battleship".parse::<ShipClass>().ok(), Some(ShipClass::Battleship));
        assert_eq!(" Scout ".parse::<ShipClass>().ok(), Some(ShipClass::Scout));
        assert!(matches!(
            "Dreadnought".parse::<ShipClass>(),
            Err(GameError::InvalidShipClass(_))
        ));
    }

    #[test]
    fn test_fleet_strength_and_defeat() {
        let mut fleet = Fleet::new("Home", "Earth")
            .with_ship(corvette())
            .with_ship(Ship::new("Scout-1", ShipClass::Scout, 50, 20));
        assert_eq!(fleet.combat_strength(), 210);
        assert!(!fleet.is_defeated());

        fleet.ships[0].take_damage(500);
        assert_eq!(fleet.combat_strength(), 70);
        assert_eq!(fleet.remove_destroyed(), 1);
        assert_eq!(fleet.len(), 1);

        fleet.ships[0].take_damage(500);
        assert!(fleet.is_defeated());
        fleet.remove_destroyed();
        assert!(fleet.is_empty());
    }
}
