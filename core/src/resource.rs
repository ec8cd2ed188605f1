//! Resource kinds, the ledger bundle, and storage limits.
//!
//! RULE: After every tick each ledger amount lies in [0, limit].
//! One `ResourceBundle` type serves as ledger, limits, rate view and cost.
//! A cost only names the kinds it needs; absent kinds deserialize as 0.

use crate::{config::BalanceConfig, facility::Facility};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Water,
    Power,
    Materials,
    Components,
    Chemicals,
    Money,
    Research,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Food,
        ResourceKind::Water,
        ResourceKind::Power,
        ResourceKind::Materials,
        ResourceKind::Components,
        ResourceKind::Chemicals,
        ResourceKind::Money,
        ResourceKind::Research,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Food       => "food",
            Self::Water      => "water",
            Self::Power      => "power",
            Self::Materials  => "materials",
            Self::Components => "components",
            Self::Chemicals  => "chemicals",
            Self::Money      => "money",
            Self::Research   => "research",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One amount per resource kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceBundle {
    pub food:       f64,
    pub water:      f64,
    pub power:      f64,
    pub materials:  f64,
    pub components: f64,
    pub chemicals:  f64,
    pub money:      f64,
    pub research:   f64,
}

impl ResourceBundle {
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Food       => self.food,
            ResourceKind::Water      => self.water,
            ResourceKind::Power      => self.power,
            ResourceKind::Materials  => self.materials,
            ResourceKind::Components => self.components,
            ResourceKind::Chemicals  => self.chemicals,
            ResourceKind::Money      => self.money,
            ResourceKind::Research   => self.research,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Food       => &mut self.food,
            ResourceKind::Water      => &mut self.water,
            ResourceKind::Power      => &mut self.power,
            ResourceKind::Materials  => &mut self.materials,
            ResourceKind::Components => &mut self.components,
            ResourceKind::Chemicals  => &mut self.chemicals,
            ResourceKind::Money      => &mut self.money,
            ResourceKind::Research   => &mut self.research,
        }
    }

    /// Builder-style setter, handy for costs and test fixtures.
    pub fn with(mut self, kind: ResourceKind, amount: f64) -> Self {
        *self.get_mut(kind) = amount;
        self
    }

    /// Iterate `(kind, amount)` pairs in canonical kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL.iter().map(move |k| (*k, self.get(*k)))
    }

    /// Kinds with a non-zero amount.
    pub fn nonzero(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        self.iter().filter(|(_, v)| *v != 0.0)
    }

    /// True iff every amount in `cost` is covered by `self`.
    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|k| self.get(*k) >= cost.get(*k))
    }

    /// Unclamped element-wise addition (refunds).
    pub fn add(&mut self, other: &ResourceBundle) {
        for kind in ResourceKind::ALL {
            *self.get_mut(kind) += other.get(kind);
        }
    }

    /// Unclamped element-wise subtraction. Callers check `can_afford` first.
    pub fn deduct(&mut self, cost: &ResourceBundle) {
        for kind in ResourceKind::ALL {
            *self.get_mut(kind) -= cost.get(kind);
        }
    }

    /// Every amount multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> ResourceBundle {
        let mut out = *self;
        for kind in ResourceKind::ALL {
            *out.get_mut(kind) *= factor;
        }
        out
    }

    /// `self[k] = clamp(self[k] + delta[k], 0, limits[k])` for every kind.
    pub fn apply_delta(&mut self, delta: &ResourceBundle, limits: &ResourceBundle) {
        for kind in ResourceKind::ALL {
            let next = self.get(kind) + delta.get(kind);
            *self.get_mut(kind) = next.max(0.0).min(limits.get(kind));
        }
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

/// Storage limits: base limits plus `bonus * level` for every operational
/// storage facility. Facilities under construction contribute nothing.
pub fn compute_limits(facilities: &[Facility], balance: &BalanceConfig) -> ResourceBundle {
    let mut limits = balance.base_limits;
    for facility in facilities.iter().filter(|f| !f.is_building) {
        if let Some(bonus) = balance.storage_bonus(facility.kind) {
            limits.add(&bonus.scaled(f64::from(facility.level)));
        }
    }
    limits
}

impl fmt::Display for ResourceBundle {
    /// Compact `food 50, power 20` form for logs. Empty bundles print `nothing`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.nonzero().peekable();
        if parts.peek().is_none() {
            return f.write_str("nothing");
        }
        for (i, (kind, amount)) in parts.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind} {amount}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ShelterConfig, facility::{Facility, FacilityKind}};

    #[test]
    fn display_lists_only_nonzero_kinds() {
        let cost = ResourceBundle::default()
            .with(ResourceKind::Food, 50.0)
            .with(ResourceKind::Power, 20.0);
        assert_eq!(cost.to_string(), "food 50, power 20");
        assert_eq!(ResourceBundle::default().to_string(), "nothing");
    }

    #[test]
    fn apply_delta_clamps_both_ends() {
        let mut ledger = ResourceBundle::default()
            .with(ResourceKind::Food, 10.0)
            .with(ResourceKind::Water, 290.0);
        let delta = ResourceBundle::default()
            .with(ResourceKind::Food, -25.0)
            .with(ResourceKind::Water, 50.0);
        let limits = ResourceBundle::default()
            .with(ResourceKind::Food, 500.0)
            .with(ResourceKind::Water, 300.0);

        ledger.apply_delta(&delta, &limits);

        assert_eq!(ledger.food, 0.0);
        assert_eq!(ledger.water, 300.0);
    }

    #[test]
    fn missing_cost_keys_are_free() {
        let ledger = ResourceBundle::default().with(ResourceKind::Materials, 50.0);
        let cost: ResourceBundle = serde_json::from_str(r#"{"materials": 50}"#).unwrap();
        assert!(ledger.can_afford(&cost));

        let pricier: ResourceBundle =
            serde_json::from_str(r#"{"materials": 50, "power": 1}"#).unwrap();
        assert!(!ledger.can_afford(&pricier));
    }

    #[test]
    fn limits_ignore_facilities_under_construction() {
        let config = ShelterConfig::default_test();
        let spec = config.facility(FacilityKind::Warehouse).unwrap();

        let mut building = Facility::new_construction("w1".into(), spec);
        let base = compute_limits(std::slice::from_ref(&building), &config.balance);
        assert_eq!(base, config.balance.base_limits);

        building.is_building = false;
        building.level = 2;
        let grown = compute_limits(&[building], &config.balance);
        assert_eq!(grown.food, config.balance.base_limits.food + 600.0);
        assert_eq!(grown.materials, config.balance.base_limits.materials + 1000.0);
        assert_eq!(grown.components, config.balance.base_limits.components + 100.0);
        assert_eq!(grown.water, config.balance.base_limits.water);
    }
}
