//! Ship class baselines, weapon profiles and tech stat modifiers.

use crate::ships::ShipClass;

/// Weapon slot in a class loadout; the concrete weapon depends on tech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponSlot {
    /// Best unlocked beam weapon.
    Beam,
    /// Heavy laser battery.
    HeavyLaser,
    /// Kinetic railgun.
    Railgun,
    /// Missile launcher.
    Missile,
}

/// Baseline stats for one ship class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HullProfile {
    /// Hull points before tech bonuses.
    pub base_hull: u32,
    /// Shield points before tech bonuses.
    pub base_shields: u32,
    /// Weapon slots in firing order.
    pub loadout: &'static [WeaponSlot],
    /// AI empires may build this class once their turn counter reaches this value.
    pub ai_unlock_turn: u32,
}

/// Immutable stats for a weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    /// Display name.
    pub name: &'static str,
    /// Damage on hit.
    pub damage: u32,
    /// Hit probability in `[0, 1]`.
    pub accuracy: f64,
    /// Engagement range.
    pub range: u32,
}

use WeaponSlot::{Beam, HeavyLaser, Missile, Railgun};

/// Baseline stats for a class.
#[must_use]
pub const fn hull_profile(class: ShipClass) -> HullProfile {
    match class {
        ShipClass::Fighter => HullProfile {
            base_hull: 30,
            base_shields: 10,
            loadout: &[Beam],
            ai_unlock_turn: 0,
        },
        ShipClass::Scout => HullProfile {
            base_hull: 50,
            base_shields: 20,
            loadout: &[Beam],
            ai_unlock_turn: 0,
        },
        ShipClass::Corvette => HullProfile {
            base_hull: 100,
            base_shields: 50,
            loadout: &[Beam, Beam],
            ai_unlock_turn: 0,
        },
        ShipClass::Frigate => HullProfile {
            base_hull: 200,
            base_shields: 100,
            loadout: &[HeavyLaser, HeavyLaser, Beam],
            ai_unlock_turn: 4,
        },
        ShipClass::Destroyer => HullProfile {
            base_hull: 300,
            base_shields: 140,
            loadout: &[HeavyLaser, Beam, Railgun, Railgun],
            ai_unlock_turn: 7,
        },
        ShipClass::Cruiser => HullProfile {
            base_hull: 500,
            base_shields: 250,
            loadout: &[HeavyLaser, Beam, Railgun, Railgun, Missile],
            ai_unlock_turn: 10,
        },
        ShipClass::Battleship => HullProfile {
            base_hull: 900,
            base_shields: 450,
            loadout: &[HeavyLaser, HeavyLaser, Beam, Railgun, Railgun, Missile, Missile],
            ai_unlock_turn: 14,
        },
        ShipClass::Carrier => HullProfile {
            base_hull: 700,
            base_shields: 350,
            loadout: &[Beam, Beam, Railgun, Missile],
            ai_unlock_turn: 16,
        },
    }
}

/// Beam weapon available without any weapons research.
pub const LASER_CANNON: WeaponProfile = WeaponProfile {
    name: "Laser Cannon",
    damage: 10,
    accuracy: 0.7,
    range: 5,
};

/// Beam upgrades, best first. The first researched entry wins.
pub const BEAM_UPGRADES: &[(&str, WeaponProfile)] = &[
    (
        "singularity_weapons",
        WeaponProfile {
            name: "Singularity Projector",
            damage: 35,
            accuracy: 0.6,
            range: 9,
        },
    ),
    (
        "particle_beam",
        WeaponProfile {
            name: "Particle Beam",
            damage: 24,
            accuracy: 0.7,
            range: 7,
        },
    ),
    (
        "plasma_weapons",
        WeaponProfile {
            name: "Plasma Cannon",
            damage: 18,
            accuracy: 0.7,
            range: 6,
        },
    ),
    (
        "laser_weapons",
        WeaponProfile {
            name: "Laser Array",
            damage: 12,
            accuracy: 0.72,
            range: 5,
        },
    ),
];

/// Heavy laser battery.
pub const HEAVY_LASER: WeaponProfile = WeaponProfile {
    name: "Heavy Laser",
    damage: 15,
    accuracy: 0.75,
    range: 6,
};

/// Railgun.
pub const RAILGUN: WeaponProfile = WeaponProfile {
    name: "Railgun",
    damage: 20,
    accuracy: 0.65,
    range: 6,
};

/// Unguided missile launcher.
pub const MISSILE_LAUNCHER: WeaponProfile = WeaponProfile {
    name: "Missile Launcher",
    damage: 25,
    accuracy: 0.55,
    range: 8,
};

/// Missile accuracy once `missile_guidance` is researched.
pub const GUIDED_MISSILE_ACCURACY: f64 = 0.65;

/// Percent multipliers applied to max hull, in order, per researched tech.
pub const HULL_BONUSES: &[(&str, u32)] = &[
    ("reinforced_hulls", 110),
    ("nanomaterials", 115),
    ("self_repairing_hulls", 120),
];

/// Percent multipliers applied to max shields, in order, per researched tech.
pub const SHIELD_BONUSES: &[(&str, u32)] = &[
    ("basic_shields", 110),
    ("advanced_shields", 120),
    ("graviton_shields", 130),
    ("phase_shields", 140),
    ("void_shields", 150),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigger_classes_are_tougher() {
        let scout = hull_profile(ShipClass::Scout);
        let battleship = hull_profile(ShipClass::Battleship);
        assert!(battleship.base_hull > scout.base_hull);
        assert!(battleship.loadout.len() > scout.loadout.len());
    }

    #[test]
    fn test_bonus_techs_exist() {
        let ids = HULL_BONUSES
            .iter()
            .chain(SHIELD_BONUSES)
            .map(|&(id, _)| id)
            .chain(BEAM_UPGRADES.iter().map(|&(id, _)| id));
        for id in ids {
            assert!(crate::data::find_definition(id).is_some(), "{id}");
        }
    }
}
