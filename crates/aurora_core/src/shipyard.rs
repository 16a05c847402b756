//! Tech-aware ship construction.
//!
//! A ship's loadout and defences depend on its class baseline and on what the
//! building empire has researched:
//!
//! - Beam slots mount the best unlocked beam weapon
//! - Missile accuracy improves with `missile_guidance`
//! - Hull and shield maxima are scaled by every researched bonus tech, in
//!   table order, using integer percent arithmetic

use crate::data::{
    hull_profile, WeaponSlot, BEAM_UPGRADES, GUIDED_MISSILE_ACCURACY, HEAVY_LASER, HULL_BONUSES,
    LASER_CANNON, MISSILE_LAUNCHER, RAILGUN, SHIELD_BONUSES,
};
use crate::research::TechGraph;
use crate::ships::{Ship, ShipClass, Weapon};

/// Standard ship name, `"<base>-<Class>-<index>"`.
#[must_use]
pub fn ship_name(base: &str, class: ShipClass, index: usize) -> String {
    format!("{base}-{}-{index}", class.name())
}

/// Best beam weapon the tech graph unlocks.
#[must_use]
pub fn beam_weapon(tech: &TechGraph) -> Weapon {
    BEAM_UPGRADES
        .iter()
        .find(|(id, _)| tech.is_researched(id))
        .map_or_else(|| Weapon::from(&LASER_CANNON), |(_, profile)| Weapon::from(profile))
}

/// Missile launcher, guided if researched.
#[must_use]
pub fn missile_weapon(tech: &TechGraph) -> Weapon {
    let mut weapon = Weapon::from(&MISSILE_LAUNCHER);
    if tech.is_researched("missile_guidance") {
        weapon.accuracy = GUIDED_MISSILE_ACCURACY;
    }
    weapon
}

fn weapon_for(slot: WeaponSlot, tech: &TechGraph) -> Weapon {
    match slot {
        WeaponSlot::Beam => beam_weapon(tech),
        WeaponSlot::HeavyLaser => Weapon::from(&HEAVY_LASER),
        WeaponSlot::Railgun => Weapon::from(&RAILGUN),
        WeaponSlot::Missile => missile_weapon(tech),
    }
}

fn apply_bonuses(base: u32, bonuses: &[(&str, u32)], tech: &TechGraph) -> u32 {
    bonuses
        .iter()
        .filter(|(id, _)| tech.is_researched(id))
        .fold(base, |value, &(_, percent)| {
            let scaled = u64::from(value) * u64::from(percent) / 100;
            u32::try_from(scaled).unwrap_or(u32::MAX)
        })
}

/// Maximum hull and shields for a class under the given research.
#[must_use]
pub fn defense_values(class: ShipClass, tech: &TechGraph) -> (u32, u32) {
    let profile = hull_profile(class);
    (
        apply_bonuses(profile.base_hull, HULL_BONUSES, tech),
        apply_bonuses(profile.base_shields, SHIELD_BONUSES, tech),
    )
}

/// Builds a fresh ship of `class`, outfitted with the empire's technology.
#[must_use]
pub fn build_ship(name: impl Into<String>, class: ShipClass, tech: &TechGraph) -> Ship {
    let (hull, shields) = defense_values(class, tech);
    hull_profile(class)
        .loadout
        .iter()
        .fold(Ship::new(name, class, hull, shields), |ship, &slot| {
            ship.with_weapon(weapon_for(slot, tech))
        })
}

/// Builds a ship from baseline stats, ignoring research.
///
/// Starting fleets are commissioned this way: every beam slot carries the
/// basic Laser Cannon.
#[must_use]
pub fn build_baseline_ship(name: impl Into<String>, class: ShipClass) -> Ship {
    build_ship(name, class, &TechGraph::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn researched(ids: &[&str]) -> TechGraph {
        let mut graph = TechGraph::new();
        for id in ids {
            assert!(graph.restore(id, 0, true));
        }
        graph
    }

    #[test]
    fn test_baseline_corvette() {
        let ship = build_ship("Home-Corvette-1", ShipClass::Corvette, &TechGraph::new());
        assert_eq!(ship.max_hull(), 100);
        assert_eq!(ship.max_shields(), 50);
        assert_eq!(ship.weapons.len(), 2);
        assert!(ship.weapons.iter().all(|w| w.name == "Laser Cannon" && w.damage == 10));
    }

    #[test]
    fn test_best_beam_wins() {
        let tech = researched(&["laser_weapons", "plasma_weapons"]);
        assert_eq!(beam_weapon(&tech).damage, 18);
        let tech = researched(&["laser_weapons"]);
        assert_eq!(beam_weapon(&tech).damage, 12);
    }

    #[test]
    fn test_missile_guidance() {
        let plain = missile_weapon(&TechGraph::new());
        let guided = missile_weapon(&researched(&["missile_guidance"]));
        assert!(guided.accuracy > plain.accuracy);
        assert_eq!(guided.damage, 25);
    }

    #[test]
    fn test_defense_bonuses_compound_in_order() {
        let tech = researched(&["reinforced_hulls", "nanomaterials", "basic_shields"]);
        let (hull, shields) = defense_values(ShipClass::Battleship, &tech);
        // 900 * 110 / 100 = 990, * 115 / 100 = 1138
        assert_eq!(hull, 1138);
        assert_eq!(shields, 495);
    }

    #[test]
    fn test_loadout_sizes() {
        let tech = TechGraph::new();
        for (class, count) in [
            (ShipClass::Fighter, 1),
            (ShipClass::Frigate, 3),
            (ShipClass::Destroyer, 4),
            (ShipClass::Cruiser, 5),
            (ShipClass::Battleship, 7),
            (ShipClass::Carrier, 4),
        ] {
            assert_eq!(build_ship("x", class, &tech).weapons.len(), count, "{class}");
        }
    }

    #[test]
    fn test_ship_name() {
        assert_eq!(ship_name("Raider", ShipClass::Scout, 2), "Raider-Scout-2");
    }
}
