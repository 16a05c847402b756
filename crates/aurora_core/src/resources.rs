//! Resource economy.
//!
//! Every empire owns a [`ResourceLedger`]: a stock of each [`ResourceType`]
//! plus a fixed per-turn production rate. Only minerals, energy and research
//! points are produced automatically; the raw minerals change through
//! explicit grants (salvage, exploration rewards) and spending.
//!
//! # Atomic spending
//!
//! [`ResourceLedger::pay_costs`] either pays every listed cost or nothing:
//!
//! ```
//! use aurora_core::resources::{ResourceLedger, ResourceType};
//!
//! let mut ledger = ResourceLedger::new();
//! let before = ledger.clone();
//! // Starting minerals are zero, so the whole payment is refused.
//! assert!(!ledger.pay_costs(&[(ResourceType::Duranium, 10), (ResourceType::Minerals, 5)]));
//! assert_eq!(ledger, before);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Closed set of resources an empire can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    /// Generic construction minerals.
    Minerals,
    /// Energy output.
    Energy,
    /// Population pool.
    Population,
    /// Research points spent on technologies.
    ResearchPoints,
    /// Starship fuel.
    Fuel,
    /// Raw mineral.
    Duranium,
    /// Raw mineral.
    Neutronium,
    /// Raw mineral.
    Corundium,
    /// Raw mineral.
    Tritanium,
    /// Raw mineral.
    Boronide,
    /// Raw mineral.
    Mercassium,
    /// Raw mineral.
    Vendarite,
    /// Raw mineral.
    Sorium,
    /// Raw mineral.
    Uridium,
    /// Raw mineral.
    Gallicite,
}

impl ResourceType {
    /// Every resource type, in ledger order.
    pub const ALL: [Self; 15] = [
        Self::Minerals,
        Self::Energy,
        Self::Population,
        Self::ResearchPoints,
        Self::Fuel,
        Self::Duranium,
        Self::Neutronium,
        Self::Corundium,
        Self::Tritanium,
        Self::Boronide,
        Self::Mercassium,
        Self::Vendarite,
        Self::Sorium,
        Self::Uridium,
        Self::Gallicite,
    ];

    /// The ten raw minerals that can be found on planets.
    pub const RAW_MINERALS: [Self; 10] = [
        Self::Duranium,
        Self::Neutronium,
        Self::Corundium,
        Self::Tritanium,
        Self::Boronide,
        Self::Mercassium,
        Self::Vendarite,
        Self::Sorium,
        Self::Uridium,
        Self::Gallicite,
    ];

    /// Display name, also used in save files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minerals => "Minerals",
            Self::Energy => "Energy",
            Self::Population => "Population",
            Self::ResearchPoints => "Research Points",
            Self::Fuel => "Fuel",
            Self::Duranium => "Duranium",
            Self::Neutronium => "Neutronium",
            Self::Corundium => "Corundium",
            Self::Tritanium => "Tritanium",
            Self::Boronide => "Boronide",
            Self::Mercassium => "Mercassium",
            Self::Vendarite => "Vendarite",
            Self::Sorium => "Sorium",
            Self::Uridium => "Uridium",
            Self::Gallicite => "Gallicite",
        }
    }

    /// Parses a resource name case-insensitively.
    ///
    /// Research points are also accepted as `research_points`, `research`
    /// or `rp`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "research_points" | "research" | "rp" => return Some(Self::ResearchPoints),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(&lowered))
    }

    /// Stock an empire starts the game with.
    #[must_use]
    pub const fn starting_amount(self) -> u64 {
        match self {
            Self::Population => 100,
            Self::Fuel => 1000,
            Self::Duranium => 500,
            Self::Neutronium => 200,
            Self::Corundium | Self::Sorium => 100,
            Self::Tritanium => 150,
            Self::Boronide | Self::Mercassium => 50,
            Self::Vendarite => 30,
            Self::Uridium => 20,
            Self::Gallicite => 40,
            Self::Minerals | Self::Energy | Self::ResearchPoints => 0,
        }
    }

    /// Default production per turn.
    #[must_use]
    pub const fn base_rate(self) -> u64 {
        match self {
            Self::Minerals => 10,
            Self::Energy => 50,
            Self::ResearchPoints => 5,
            _ => 0,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-empire resource stock and production rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    stock: BTreeMap<ResourceType, u64>,
    rates: BTreeMap<ResourceType, u64>,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLedger {
    /// Creates a ledger with the standard starting stock and rates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stock: ResourceType::ALL
                .into_iter()
                .map(|ty| (ty, ty.starting_amount()))
                .collect(),
            rates: ResourceType::ALL
                .into_iter()
                .map(|ty| (ty, ty.base_rate()))
                .collect(),
        }
    }

    /// Creates a ledger with every stock and rate at zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            stock: ResourceType::ALL.into_iter().map(|ty| (ty, 0)).collect(),
            rates: ResourceType::ALL.into_iter().map(|ty| (ty, 0)).collect(),
        }
    }

    /// Builder: override the stock of one resource.
    #[must_use]
    pub fn with_stock(mut self, resource: ResourceType, amount: u64) -> Self {
        self.stock.insert(resource, amount);
        self
    }

    /// Current stock of a resource.
    #[must_use]
    pub fn get(&self, resource: ResourceType) -> u64 {
        self.stock.get(&resource).copied().unwrap_or(0)
    }

    /// Production rate of a resource.
    #[must_use]
    pub fn rate(&self, resource: ResourceType) -> u64 {
        self.rates.get(&resource).copied().unwrap_or(0)
    }

    /// Overwrites the stock of a resource.
    pub fn set(&mut self, resource: ResourceType, amount: u64) {
        self.stock.insert(resource, amount);
    }

    /// Adds to the stock of a resource, saturating at `u64::MAX`.
    pub fn add(&mut self, resource: ResourceType, amount: u64) {
        let entry = self.stock.entry(resource).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Applies `turns` worth of production to every resource.
    pub fn produce(&mut self, turns: u32) {
        for (&resource, &rate) in &self.rates {
            let gained = rate.saturating_mul(u64::from(turns));
            let entry = self.stock.entry(resource).or_insert(0);
            *entry = entry.saturating_add(gained);
        }
    }

    /// Removes `amount` of a resource.
    ///
    /// Returns `false` and leaves the stock untouched when there is not
    /// enough.
    pub fn consume(&mut self, resource: ResourceType, amount: u64) -> bool {
        let entry = self.stock.entry(resource).or_insert(0);
        if *entry < amount {
            return false;
        }
        *entry -= amount;
        true
    }

    /// Checks whether every listed cost can be paid at once.
    #[must_use]
    pub fn can_afford(&self, costs: &[(ResourceType, u64)]) -> bool {
        self.first_shortfall(costs).is_none()
    }

    /// Pays every listed cost, or nothing at all.
    pub fn pay_costs(&mut self, costs: &[(ResourceType, u64)]) -> bool {
        self.try_pay_costs(costs).is_ok()
    }

    /// Like [`Self::pay_costs`], reporting the first resource that falls short.
    pub fn try_pay_costs(&mut self, costs: &[(ResourceType, u64)]) -> Result<()> {
        if let Some((resource, required)) = self.first_shortfall(costs) {
            return Err(GameError::InsufficientResources {
                resource,
                required,
                available: self.get(resource),
            });
        }
        for (resource, amount) in merge_costs(costs) {
            let entry = self.stock.entry(resource).or_insert(0);
            *entry -= amount;
        }
        Ok(())
    }

    /// Iterates over every resource and its stock, in [`ResourceType::ALL`] order.
    pub fn snapshot(&self) -> impl Iterator<Item = (ResourceType, u64)> + '_ {
        ResourceType::ALL.into_iter().map(|ty| (ty, self.get(ty)))
    }

    fn first_shortfall(&self, costs: &[(ResourceType, u64)]) -> Option<(ResourceType, u64)> {
        merge_costs(costs)
            .into_iter()
            .find(|&(resource, amount)| self.get(resource) < amount)
    }
}

/// Sums duplicate entries so a cost list naming a resource twice is checked
/// against its total.
fn merge_costs(costs: &[(ResourceType, u64)]) -> BTreeMap<ResourceType, u64> {
    let mut merged = BTreeMap::new();
    for &(resource, amount) in costs {
        let entry = merged.entry(resource).or_insert(0u64);
        *entry = entry.saturating_add(amount);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_ledger() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.get(ResourceType::Population), 100);
        assert_eq!(ledger.get(ResourceType::Fuel), 1000);
        assert_eq!(ledger.get(ResourceType::Minerals), 0);
        assert_eq!(ledger.rate(ResourceType::Energy), 50);
        assert_eq!(ledger.rate(ResourceType::Duranium), 0);
    }

    #[test]
    fn test_produce_applies_rates() {
        let mut ledger = ResourceLedger::new();
        ledger.produce(3);
        assert_eq!(ledger.get(ResourceType::Minerals), 30);
        assert_eq!(ledger.get(ResourceType::Energy), 150);
        assert_eq!(ledger.get(ResourceType::ResearchPoints), 15);
        assert_eq!(ledger.get(ResourceType::Duranium), 500);
    }

    #[test]
    fn test_consume_refuses_underflow() {
        let mut ledger = ResourceLedger::new();
        assert!(!ledger.consume(ResourceType::Uridium, 21));
        assert_eq!(ledger.get(ResourceType::Uridium), 20);
        assert!(ledger.consume(ResourceType::Uridium, 20));
        assert_eq!(ledger.get(ResourceType::Uridium), 0);
    }

    #[test]
    fn test_pay_costs_is_atomic() {
        let mut ledger = ResourceLedger::new().with_stock(ResourceType::Minerals, 40);
        let costs = [(ResourceType::Minerals, 30), (ResourceType::Gallicite, 41)];
        assert!(!ledger.pay_costs(&costs));
        assert_eq!(ledger.get(ResourceType::Minerals), 40);
        assert_eq!(ledger.get(ResourceType::Gallicite), 40);

        assert!(ledger.pay_costs(&[(ResourceType::Minerals, 30), (ResourceType::Gallicite, 40)]));
        assert_eq!(ledger.get(ResourceType::Minerals), 10);
        assert_eq!(ledger.get(ResourceType::Gallicite), 0);
    }

    #[test]
    fn test_duplicate_costs_are_summed() {
        let mut ledger = ResourceLedger::empty().with_stock(ResourceType::Fuel, 15);
        let costs = [(ResourceType::Fuel, 10), (ResourceType::Fuel, 10)];
        assert!(!ledger.can_afford(&costs));
        assert!(!ledger.pay_costs(&costs));
        assert_eq!(ledger.get(ResourceType::Fuel), 15);
    }

    #[test]
    fn test_try_pay_costs_reports_shortfall() {
        let mut ledger = ResourceLedger::empty();
        let err = ledger
            .try_pay_costs(&[(ResourceType::Tritanium, 5)])
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientResources {
                resource: ResourceType::Tritanium,
                required: 5,
                available: 0
            }
        ));
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(ResourceType::from_name("duranium"), Some(ResourceType::Duranium));
        assert_eq!(ResourceType::from_name("RP"), Some(ResourceType::ResearchPoints));
        assert_eq!(
            ResourceType::from_name("Research Points"),
            Some(ResourceType::ResearchPoints)
        );
        assert_eq!(ResourceType::from_name("unobtainium"), None);
        for ty in ResourceType::ALL {
            assert_eq!(ResourceType::from_name(ty.name()), Some(ty));
        }
    }

    #[test]
    fn test_snapshot_order() {
        let ledger = ResourceLedger::new();
        let names: Vec<_> = ledger.snapshot().map(|(ty, _)| ty).collect();
        assert_eq!(names, ResourceType::ALL.to_vec());
    }
}
