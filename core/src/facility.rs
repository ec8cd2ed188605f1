//! Facilities (rooms): buildable, upgradable production units.
//!
//! A facility is either constructing (`is_building`, no workers) or
//! operational (no builders). Construction completes once and never
//! re-enters; upgrades are instantaneous.

use crate::{
    config::{BalanceConfig, FacilitySpec},
    resident::SkillKind,
    resource::{ResourceBundle, ResourceKind},
    types::{FacilityId, ResidentId},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Farm,
    WaterPlant,
    PowerStation,
    Workshop,
    Workbench,
    Quarters,
    Medical,
    Laboratory,
    Armory,
    TrainingRoom,
    Warehouse,
    WaterTank,
    PowerBank,
    Vault,
}

impl FacilityKind {
    pub const ALL: [FacilityKind; 14] = [
        FacilityKind::Farm,
        FacilityKind::WaterPlant,
        FacilityKind::PowerStation,
        FacilityKind::Workshop,
        FacilityKind::Workbench,
        FacilityKind::Quarters,
        FacilityKind::Medical,
        FacilityKind::Laboratory,
        FacilityKind::Armory,
        FacilityKind::TrainingRoom,
        FacilityKind::Warehouse,
        FacilityKind::WaterTank,
        FacilityKind::PowerBank,
        FacilityKind::Vault,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Farm         => "farm",
            Self::WaterPlant   => "water_plant",
            Self::PowerStation => "power_station",
            Self::Workshop     => "workshop",
            Self::Workbench    => "workbench",
            Self::Quarters     => "quarters",
            Self::Medical      => "medical",
            Self::Laboratory   => "laboratory",
            Self::Armory       => "armory",
            Self::TrainingRoom => "training_room",
            Self::Warehouse    => "warehouse",
            Self::WaterTank    => "water_tank",
            Self::PowerBank    => "power_bank",
            Self::Vault        => "vault",
        }
    }

    /// The resident skill that drives this facility's output.
    /// `None` means the nominal skill value applies.
    pub fn relevant_skill(&self) -> Option<SkillKind> {
        match self {
            Self::Farm | Self::Quarters | Self::Warehouse | Self::Vault => {
                Some(SkillKind::Management)
            }
            Self::WaterPlant
            | Self::PowerStation
            | Self::Workshop
            | Self::Workbench
            | Self::WaterTank
            | Self::PowerBank => Some(SkillKind::Engineering),
            Self::Medical => Some(SkillKind::Medical),
            Self::Laboratory => Some(SkillKind::Research),
            Self::Armory | Self::TrainingRoom => Some(SkillKind::Combat),
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Production {
    pub resource: ResourceKind,
    pub rate:     f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facility {
    pub id:                FacilityId,
    pub kind:              FacilityKind,
    pub level:             u32,
    pub workers:           Vec<ResidentId>,
    pub max_workers:       usize,
    pub production:        Production,
    /// What was actually paid to build this facility; refunded on cancel.
    pub cost:              ResourceBundle,
    pub upgrade_cost:      ResourceBundle,
    pub is_building:       bool,
    pub build_time:        f64,
    pub build_progress:    f64,
    pub build_workers:     Vec<ResidentId>,
    pub max_build_workers: usize,
}

impl Facility {
    /// A fresh level-1 facility in the constructing state.
    pub fn new_construction(id: FacilityId, spec: &FacilitySpec) -> Self {
        Self {
            id,
            kind:              spec.kind,
            level:             1,
            workers:           Vec::new(),
            max_workers:       spec.max_workers,
            production:        Production { resource: spec.produces, rate: spec.rate },
            cost:              spec.cost,
            upgrade_cost:      spec.upgrade_cost,
            is_building:       true,
            build_time:        spec.build_time,
            build_progress:    0.0,
            build_workers:     Vec::new(),
            max_build_workers: spec.max_build_workers,
        }
    }

    pub fn is_operational(&self) -> bool {
        !self.is_building
    }

    pub fn is_full(&self) -> bool {
        self.workers.len() >= self.max_workers
    }

    pub fn remaining_builder_slots(&self) -> usize {
        self.max_build_workers.saturating_sub(self.build_workers.len())
    }

    /// Recompute every level-derived stat from the base spec.
    pub fn apply_level(&mut self, spec: &FacilitySpec, balance: &BalanceConfig) {
        let steps = self.level.saturating_sub(1);
        self.max_workers = scaled_max_workers(spec.max_workers, steps, balance.max_extra_workers);
        self.production.rate = spec.rate * balance.production_growth.powi(steps as i32);
        self.upgrade_cost = spec.upgrade_cost.scaled(balance.upgrade_cost_growth.powi(steps as i32));
    }

    /// Drop a resident from both worker and builder sets. Returns true if
    /// anything was removed.
    pub fn release(&mut self, resident_id: &str) -> bool {
        let before = self.workers.len() + self.build_workers.len();
        self.workers.retain(|w| w != resident_id);
        self.build_workers.retain(|w| w != resident_id);
        before != self.workers.len() + self.build_workers.len()
    }
}

/// Worker slots grow by one per level, capped at `max_extra` above base.
/// Facilities without base slots (quarters, tanks) never gain any.
fn scaled_max_workers(base: usize, level_steps: u32, max_extra: usize) -> usize {
    if base == 0 {
        return 0;
    }
    base + (level_steps as usize).min(max_extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelterConfig;

    #[test]
    fn upgrade_scaling_follows_balance_constants() {
        let config = ShelterConfig::default_test();
        let spec = config.facility(FacilityKind::Farm).unwrap();
        let mut farm = Facility::new_construction("f".into(), spec);
        farm.is_building = false;

        farm.level = 3;
        farm.apply_level(spec, &config.balance);

        assert_eq!(farm.max_workers, spec.max_workers + 2);
        assert!((farm.production.rate - spec.rate * 1.44).abs() < 1e-9);
        assert!((farm.upgrade_cost.materials - spec.upgrade_cost.materials * 2.25).abs() < 1e-9);
    }

    #[test]
    fn worker_growth_is_capped() {
        assert_eq!(scaled_max_workers(2, 10, 3), 5);
        assert_eq!(scaled_max_workers(0, 10, 3), 0);
        assert_eq!(scaled_max_workers(4, 0, 3), 4);
    }
}
