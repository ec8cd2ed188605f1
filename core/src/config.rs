//! Game-balance configuration.
//!
//! Every tunable constant lives here as a named field: growth bases,
//! per-resident upkeep, shortage rates, facility base stats and the
//! technology catalog. `load()` reads the JSON files under `data/`;
//! `default_test()` carries the same values hardcoded.

use crate::{
    facility::FacilityKind,
    resource::{ResourceBundle, ResourceKind},
    technology::TechEffect,
    types::TechId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilitySpec {
    pub kind:              FacilityKind,
    pub label:             String,
    pub max_workers:       usize,
    pub produces:          ResourceKind,
    /// Base output per second at full efficiency, level 1.
    pub rate:              f64,
    pub cost:              ResourceBundle,
    pub upgrade_cost:      ResourceBundle,
    pub build_time:        f64,
    pub max_build_workers: usize,
    /// Power drawn per second per level while operational.
    pub power_draw:        f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnologySpec {
    pub id:            TechId,
    pub name:          String,
    pub description:   String,
    pub cost:          ResourceBundle,
    pub research_time: f64,
    #[serde(default)]
    pub requirements:  Vec<TechId>,
    #[serde(default)]
    pub unlocks:       Vec<FacilityKind>,
    #[serde(default)]
    pub effects:       Vec<TechEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageBonus {
    pub kind:      FacilityKind,
    pub per_level: ResourceBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortageConfig {
    pub food_low_threshold:    f64,
    pub water_low_threshold:   f64,
    /// Food at zero.
    pub starvation_health:     f64,
    pub starvation_happiness:  f64,
    /// Food below the low threshold.
    pub hunger_happiness:      f64,
    /// Water at zero.
    pub dehydration_health:    f64,
    pub dehydration_happiness: f64,
    /// Water below the low threshold.
    pub thirst_health:         f64,
    /// Power at zero.
    pub blackout_happiness:    f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceConfig {
    pub base_limits:                   ResourceBundle,
    pub storage_bonuses:               Vec<StorageBonus>,
    pub food_per_resident:             f64,
    pub water_per_resident:            f64,
    pub base_population:               u32,
    pub population_per_quarters_level: u32,
    pub recruit_base_cost:             ResourceBundle,
    pub recruit_cost_growth:           f64,
    /// Population at which recruitment costs exactly the base cost.
    pub recruit_cost_pivot:            u32,
    /// Production multiplier per level above 1.
    pub production_growth:             f64,
    /// Upgrade cost multiplier per level above 1.
    pub upgrade_cost_growth:           f64,
    /// Extra worker slots a facility can gain through upgrades.
    pub max_extra_workers:             usize,
    pub shortage:                      ShortageConfig,
}

impl BalanceConfig {
    pub fn storage_bonus(&self, kind: FacilityKind) -> Option<ResourceBundle> {
        self.storage_bonuses
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.per_level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialConfig {
    pub resources:     ResourceBundle,
    pub residents:     usize,
    pub shelter_level: u32,
    pub unlocked:      Vec<FacilityKind>,
}

#[derive(Debug, Clone, Deserialize)]
struct FacilityCatalogFile {
    facilities: Vec<FacilitySpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct TechnologyCatalogFile {
    technologies: Vec<TechnologySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelterConfig {
    pub balance:      BalanceConfig,
    pub initial:      InitialConfig,
    pub facilities:   Vec<FacilitySpec>,
    pub technologies: Vec<TechnologySpec>,
}

impl ShelterConfig {
    /// Load from the data/ directory.
    /// In tests, use ShelterConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let balance_path = format!("{data_dir}/balance.json");
        let balance_content = std::fs::read_to_string(&balance_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {balance_path}: {e}"))?;
        let balance: BalanceConfig = serde_json::from_str(&balance_content)?;

        let initial_path = format!("{data_dir}/initial_state.json");
        let initial_content = std::fs::read_to_string(&initial_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {initial_path}: {e}"))?;
        let initial: InitialConfig = serde_json::from_str(&initial_content)?;

        let facility_path = format!("{data_dir}/facilities.json");
        let facility_content = std::fs::read_to_string(&facility_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {facility_path}: {e}"))?;
        let facility_file: FacilityCatalogFile = serde_json::from_str(&facility_content)?;

        let tech_path = format!("{data_dir}/technologies.json");
        let tech_content = std::fs::read_to_string(&tech_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {tech_path}: {e}"))?;
        let tech_file: TechnologyCatalogFile = serde_json::from_str(&tech_content)?;

        let config = Self {
            balance,
            initial,
            facilities: facility_file.facilities,
            technologies: tech_file.technologies,
        };
        config.validate()?;
        log::info!(
            "Loaded config from {data_dir}: {} facility kinds, {} technologies",
            config.facilities.len(),
            config.technologies.len()
        );
        Ok(config)
    }

    pub fn facility(&self, kind: FacilityKind) -> Option<&FacilitySpec> {
        self.facilities.iter().find(|f| f.kind == kind)
    }

    /// Cross-reference checks the JSON schema can't express.
    pub fn validate(&self) -> anyhow::Result<()> {
        for kind in FacilityKind::ALL {
            if self.facility(kind).is_none() {
                anyhow::bail!("No facility spec for {kind}");
            }
        }
        let mut seen = BTreeSet::new();
        for tech in &self.technologies {
            if !seen.insert(tech.id.as_str()) {
                anyhow::bail!("Duplicate technology id {}", tech.id);
            }
        }
        for tech in &self.technologies {
            if let Some(missing) = tech.requirements.iter().find(|r| !seen.contains(r.as_str())) {
                anyhow::bail!("Technology {} requires unknown {missing}", tech.id);
            }
            if tech.research_time <= 0.0 {
                anyhow::bail!("Technology {} has non-positive research time", tech.id);
            }
        }
        if self.balance.recruit_cost_growth <= 0.0 || self.balance.upgrade_cost_growth <= 0.0 {
            anyhow::bail!("Growth factors must be positive");
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Mirrors the files under data/.
    pub fn default_test() -> Self {
        Self {
            balance:      default_balance(),
            initial:      InitialConfig {
                resources: bundle(&[
                    (ResourceKind::Food, 100.0),
                    (ResourceKind::Water, 100.0),
                    (ResourceKind::Power, 50.0),
                    (ResourceKind::Materials, 300.0),
                    (ResourceKind::Components, 30.0),
                    (ResourceKind::Chemicals, 20.0),
                    (ResourceKind::Money, 500.0),
                ]),
                residents:     3,
                shelter_level: 1,
                unlocked:      vec![
                    FacilityKind::Farm,
                    FacilityKind::WaterPlant,
                    FacilityKind::PowerStation,
                    FacilityKind::Workshop,
                    FacilityKind::Quarters,
                    FacilityKind::Laboratory,
                ],
            },
            facilities:   default_facilities(),
            technologies: default_technologies(),
        }
    }
}

fn bundle(entries: &[(ResourceKind, f64)]) -> ResourceBundle {
    entries
        .iter()
        .fold(ResourceBundle::default(), |b, (k, v)| b.with(*k, *v))
}

fn default_balance() -> BalanceConfig {
    use ResourceKind::*;
    BalanceConfig {
        base_limits: bundle(&[
            (Food, 500.0),
            (Water, 300.0),
            (Power, 200.0),
            (Materials, 1000.0),
            (Components, 100.0),
            (Chemicals, 50.0),
            (Money, 10_000.0),
            (Research, 1000.0),
        ]),
        storage_bonuses: vec![
            StorageBonus {
                kind:      FacilityKind::Warehouse,
                per_level: bundle(&[(Food, 300.0), (Materials, 500.0), (Components, 50.0)]),
            },
            StorageBonus { kind: FacilityKind::WaterTank, per_level: bundle(&[(Water, 200.0)]) },
            StorageBonus { kind: FacilityKind::PowerBank, per_level: bundle(&[(Power, 150.0)]) },
            StorageBonus { kind: FacilityKind::Vault, per_level: bundle(&[(Money, 5000.0)]) },
        ],
        food_per_resident:             0.1,
        water_per_resident:            0.08,
        base_population:               3,
        population_per_quarters_level: 4,
        recruit_base_cost:             bundle(&[(Money, 100.0), (Food, 20.0)]),
        recruit_cost_growth:           1.5,
        recruit_cost_pivot:            3,
        production_growth:             1.2,
        upgrade_cost_growth:           1.5,
        max_extra_workers:             3,
        shortage: ShortageConfig {
            food_low_threshold:    10.0,
            water_low_threshold:   10.0,
            starvation_health:     5.0,
            starvation_happiness:  3.0,
            hunger_happiness:      1.0,
            dehydration_health:    5.0,
            dehydration_happiness: 3.0,
            thirst_health:         1.0,
            blackout_happiness:    1.0,
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn spec(
    kind: FacilityKind,
    label: &str,
    max_workers: usize,
    produces: ResourceKind,
    rate: f64,
    cost: &[(ResourceKind, f64)],
    upgrade_cost: &[(ResourceKind, f64)],
    build_time: f64,
    power_draw: f64,
) -> FacilitySpec {
    FacilitySpec {
        kind,
        label: label.into(),
        max_workers,
        produces,
        rate,
        cost: bundle(cost),
        upgrade_cost: bundle(upgrade_cost),
        build_time,
        max_build_workers: 3,
        power_draw,
    }
}

fn default_facilities() -> Vec<FacilitySpec> {
    use FacilityKind as F;
    use ResourceKind::*;
    vec![
        spec(F::Farm, "Farm", 3, Food, 1.0,
             &[(Materials, 50.0), (Power, 20.0)], &[(Materials, 100.0), (Components, 10.0)], 15.0, 0.05),
        spec(F::WaterPlant, "Water Plant", 2, Water, 1.2,
             &[(Materials, 40.0), (Components, 5.0)], &[(Materials, 80.0), (Components, 15.0)], 12.0, 0.08),
        spec(F::PowerStation, "Power Station", 2, Power, 2.0,
             &[(Materials, 60.0), (Components, 10.0)], &[(Materials, 120.0), (Components, 20.0)], 18.0, 0.0),
        spec(F::Workshop, "Workshop", 4, Materials, 0.8,
             &[(Materials, 80.0), (Power, 30.0)], &[(Materials, 160.0), (Components, 25.0)], 20.0, 0.06),
        spec(F::Workbench, "Workbench", 2, Components, 0.3,
             &[(Materials, 60.0), (Power, 10.0)], &[(Materials, 120.0), (Components, 15.0)], 12.0, 0.03),
        spec(F::Quarters, "Quarters", 0, Food, 0.0,
             &[(Materials, 30.0)], &[(Materials, 60.0), (Components, 5.0)], 10.0, 0.02),
        spec(F::Medical, "Medical Bay", 2, Chemicals, 0.3,
             &[(Materials, 70.0), (Components, 15.0)], &[(Materials, 140.0), (Components, 30.0)], 16.0, 0.04),
        spec(F::Laboratory, "Laboratory", 3, Research, 0.5,
             &[(Materials, 100.0), (Components, 20.0), (Chemicals, 10.0)],
             &[(Materials, 200.0), (Components, 40.0)], 25.0, 0.1),
        spec(F::Armory, "Armory", 2, Components, 0.4,
             &[(Materials, 90.0), (Components, 25.0)], &[(Materials, 180.0), (Components, 50.0)], 22.0, 0.05),
        spec(F::TrainingRoom, "Training Room", 4, Food, 0.0,
             &[(Materials, 60.0), (Components, 10.0)], &[(Materials, 120.0), (Components, 20.0)], 14.0, 0.04),
        spec(F::Warehouse, "Warehouse", 1, Materials, 0.0,
             &[(Materials, 120.0)], &[(Materials, 240.0), (Components, 20.0)], 20.0, 0.02),
        spec(F::WaterTank, "Water Tank", 0, Water, 0.0,
             &[(Materials, 60.0), (Components, 5.0)], &[(Materials, 120.0), (Components, 10.0)], 10.0, 0.01),
        spec(F::PowerBank, "Power Bank", 0, Power, 0.0,
             &[(Materials, 80.0), (Components, 15.0)], &[(Materials, 160.0), (Components, 30.0)], 12.0, 0.0),
        spec(F::Vault, "Vault", 1, Money, 0.0,
             &[(Materials, 150.0), (Components, 20.0)], &[(Materials, 300.0), (Components, 40.0)], 20.0, 0.03),
    ]
}

#[allow(clippy::too_many_arguments)]
fn tech(
    id: &str,
    name: &str,
    description: &str,
    cost: &[(ResourceKind, f64)],
    research_time: f64,
    requirements: &[&str],
    unlocks: &[FacilityKind],
    effects: Vec<TechEffect>,
) -> TechnologySpec {
    TechnologySpec {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        cost: bundle(cost),
        research_time,
        requirements: requirements.iter().map(|r| (*r).to_string()).collect(),
        unlocks: unlocks.to_vec(),
        effects,
    }
}

fn default_technologies() -> Vec<TechnologySpec> {
    use FacilityKind as F;
    use ResourceKind::*;
    vec![
        tech("basic_engineering", "Basic Engineering",
             "Standardised fittings for benches and tanks.",
             &[(Research, 20.0), (Materials, 50.0)], 20.0, &[],
             &[F::Workbench, F::WaterTank], vec![]),
        tech("field_medicine", "Field Medicine",
             "Triage protocols and a proper medical bay.",
             &[(Research, 40.0), (Materials, 40.0)], 30.0, &[],
             &[F::Medical], vec![]),
        tech("energy_storage", "Energy Storage",
             "Battery banks to buffer generator output.",
             &[(Research, 40.0), (Components, 10.0)], 30.0, &["basic_engineering"],
             &[F::PowerBank], vec![]),
        tech("advanced_logistics", "Advanced Logistics",
             "Bulk storage and a secure vault.",
             &[(Research, 60.0), (Materials, 100.0)], 40.0, &["basic_engineering"],
             &[F::Warehouse, F::Vault], vec![]),
        tech("hydroponics", "Hydroponics",
             "Nutrient-film growing beds for the farms.",
             &[(Research, 60.0), (Chemicals, 10.0)], 40.0, &["field_medicine"],
             &[], vec![TechEffect::ProductionBonus { target: F::Farm, value: 0.25 }]),
        tech("defense_systems", "Defense Systems",
             "Weapon fabrication and combat drills.",
             &[(Research, 80.0), (Components, 30.0)], 50.0, &["advanced_logistics"],
             &[F::Armory, F::TrainingRoom], vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_consistent() {
        ShelterConfig::default_test().validate().unwrap();
    }

    #[test]
    fn data_directory_matches_defaults() {
        let dir = format!("{}/../data", env!("CARGO_MANIFEST_DIR"));
        let loaded = ShelterConfig::load(&dir).unwrap();
        assert_eq!(loaded, ShelterConfig::default_test());
    }

    #[test]
    fn unknown_requirement_is_rejected() {
        let mut config = ShelterConfig::default_test();
        config.technologies[0].requirements.push("warp_drive".into());
        assert!(config.validate().is_err());
    }
}
