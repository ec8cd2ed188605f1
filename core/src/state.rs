//! The simulation state: the single aggregate root.
//!
//! RULE: Every tick and every player action replaces this as a whole
//! or leaves it untouched. Derived fields (limits, max population,
//! working flags) are recomputed from facilities, never edited directly.

use crate::{
    config::ShelterConfig,
    facility::{Facility, FacilityKind},
    resident::Resident,
    resource::{compute_limits, ResourceBundle},
    rng::{RngBank, SubsystemSlot},
    technology::Technology,
    types::{Millis, TechId, Tick},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShelterState {
    pub resources:            ResourceBundle,
    pub resource_limits:      ResourceBundle,
    /// Net per-second rates from the last tick. Read-only view.
    pub resources_per_second: ResourceBundle,
    pub residents:            Vec<Resident>,
    pub facilities:           Vec<Facility>,
    pub technologies:         Vec<Technology>,
    pub unlocked_facilities:  BTreeSet<FacilityKind>,
    pub active_research:      Option<TechId>,
    pub game_time:            f64,
    pub last_update:          Millis,
    pub tick:                 Tick,
    pub shelter_level:        u32,
    pub population:           u32,
    pub max_population:       u32,
    /// Committed random draws so far; the nonce for the next one.
    pub rng_cursor:           u64,
}

impl ShelterState {
    /// A fresh shelter: starting stockpile, the starter crew, the full
    /// technology catalog and the initially unlocked facility kinds.
    pub fn new_game(config: &ShelterConfig, rng_bank: &RngBank) -> Self {
        let residents: Vec<Resident> = (0..config.initial.residents)
            .map(|i| {
                let mut rng = rng_bank.for_subsystem_at(SubsystemSlot::Genesis, i as u64);
                Resident::generate(&mut rng)
            })
            .collect();

        let mut state = Self {
            resources:            config.initial.resources,
            resource_limits:      config.balance.base_limits,
            resources_per_second: ResourceBundle::default(),
            population:           residents.len() as u32,
            residents,
            facilities:           Vec::new(),
            technologies:         config.technologies.iter().map(Technology::from_spec).collect(),
            unlocked_facilities:  config.initial.unlocked.iter().copied().collect(),
            active_research:      None,
            game_time:            0.0,
            last_update:          chrono::Utc::now().timestamp_millis(),
            tick:                 0,
            shelter_level:        config.initial.shelter_level,
            max_population:       config.balance.base_population,
            rng_cursor:           0,
        };
        state.refresh_derived(config);
        state
    }

    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn facility_mut(&mut self, id: &str) -> Option<&mut Facility> {
        self.facilities.iter_mut().find(|f| f.id == id)
    }

    pub fn resident(&self, id: &str) -> Option<&Resident> {
        self.residents.iter().find(|r| r.id == id)
    }

    pub fn technology(&self, id: &str) -> Option<&Technology> {
        self.technologies.iter().find(|t| t.id == id)
    }

    pub fn operational(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter().filter(|f| f.is_operational())
    }

    /// Base capacity plus beds from every operational quarters.
    pub fn compute_max_population(&self, config: &ShelterConfig) -> u32 {
        let beds: u32 = self
            .operational()
            .filter(|f| f.kind == FacilityKind::Quarters)
            .map(|f| config.balance.population_per_quarters_level * f.level)
            .sum();
        config.balance.base_population + beds
    }

    /// A resident works if they build at a constructing facility or staff
    /// an operational one.
    pub fn refresh_working_flags(&mut self) {
        let busy: HashSet<&str> = self
            .facilities
            .iter()
            .flat_map(|f| {
                let crew = if f.is_building { &f.build_workers } else { &f.workers };
                crew.iter().map(String::as_str)
            })
            .collect();
        let flags: Vec<bool> = self.residents.iter().map(|r| busy.contains(r.id.as_str())).collect();
        for (resident, working) in self.residents.iter_mut().zip(flags) {
            resident.is_working = working;
        }
    }

    /// Recompute every derived view from the facility list.
    pub fn refresh_derived(&mut self, config: &ShelterConfig) {
        self.resource_limits = compute_limits(&self.facilities, &config.balance);
        self.max_population = self.compute_max_population(config);
        self.refresh_working_flags();
    }

    pub fn researching_count(&self) -> usize {
        self.technologies.iter().filter(|t| t.is_researching).count()
    }

    /// Structural validation for states arriving from outside (saves).
    pub fn validate(&self) -> Result<(), String> {
        for (kind, amount) in self.resources.iter() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(format!("resource {kind} has invalid amount {amount}"));
            }
        }
        if !self.game_time.is_finite() || self.game_time < 0.0 {
            return Err(format!("invalid game time {}", self.game_time));
        }

        let mut resident_ids = HashSet::new();
        for r in &self.residents {
            if !resident_ids.insert(r.id.as_str()) {
                return Err(format!("duplicate resident id {}", r.id));
            }
            if !(0.0..=100.0).contains(&r.health) || !(0.0..=100.0).contains(&r.happiness) {
                return Err(format!("resident {} has out-of-range condition", r.id));
            }
        }
        if self.population as usize != self.residents.len() {
            return Err(format!(
                "population {} does not match {} residents",
                self.population,
                self.residents.len()
            ));
        }

        let mut facility_ids = HashSet::new();
        let mut employer: HashMap<&str, &str> = HashMap::new();
        let mut builder_site: HashMap<&str, &str> = HashMap::new();
        for f in &self.facilities {
            if !facility_ids.insert(f.id.as_str()) {
                return Err(format!("duplicate facility id {}", f.id));
            }
            if f.level == 0 {
                return Err(format!("facility {} has level 0", f.id));
            }
            if f.is_building {
                if !f.workers.is_empty() {
                    return Err(format!("facility {} has workers while constructing", f.id));
                }
                if f.build_progress >= f.build_time {
                    return Err(format!("facility {} build progress has reached build time", f.id));
                }
            } else if !f.build_workers.is_empty() {
                return Err(format!("operational facility {} still has builders", f.id));
            }
            if !f.build_progress.is_finite() || f.build_progress < 0.0 {
                return Err(format!("facility {} has invalid build progress {}", f.id, f.build_progress));
            }
            if f.workers.len() > f.max_workers || f.build_workers.len() > f.max_build_workers {
                return Err(format!("facility {} is over capacity", f.id));
            }
            for id in f.workers.iter().chain(&f.build_workers) {
                if !resident_ids.contains(id.as_str()) {
                    return Err(format!("facility {} references unknown resident {id}", f.id));
                }
            }
            for id in &f.workers {
                if let Some(other) = employer.insert(id.as_str(), f.id.as_str()) {
                    return Err(format!("resident {id} works at both {other} and {}", f.id));
                }
            }
            for id in &f.build_workers {
                if let Some(other) = builder_site.insert(id.as_str(), f.id.as_str()) {
                    return Err(format!("resident {id} builds at both {other} and {}", f.id));
                }
            }
        }
        if let Some(id) = builder_site.keys().find(|id| employer.contains_key(*id)) {
            return Err(format!("resident {id} is both a worker and a builder"));
        }
        for r in &self.residents {
            match (&r.assigned_facility, employer.get(r.id.as_str())) {
                (None, None) => {}
                (Some(assigned), Some(actual)) if assigned == actual => {}
                _ => return Err(format!("resident {} assignment disagrees with worker sets", r.id)),
            }
        }

        let researching: Vec<&Technology> =
            self.technologies.iter().filter(|t| t.is_researching).collect();
        if researching.len() > 1 {
            return Err("more than one technology in progress".into());
        }
        let active = researching.first().map(|t| t.id.as_str());
        if active != self.active_research.as_deref() {
            return Err("active research does not match technology flags".into());
        }
        for t in &self.technologies {
            let progress_ok = t.progress.is_finite() && (0.0..=t.research_time).contains(&t.progress);
            if !progress_ok || (t.is_researched && t.is_researching) {
                return Err(format!("technology {} is inconsistent", t.id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (ShelterConfig, ShelterState) {
        let config = ShelterConfig::default_test();
        let state = ShelterState::new_game(&config, &RngBank::new(42));
        (config, state)
    }

    #[test]
    fn new_game_matches_initial_config() {
        let (config, state) = fresh();
        assert_eq!(state.residents.len(), config.initial.residents);
        assert_eq!(state.population, 3);
        assert_eq!(state.max_population, 3);
        assert_eq!(state.resources, config.initial.resources);
        assert_eq!(state.technologies.len(), config.technologies.len());
        assert!(state.unlocked_facilities.contains(&FacilityKind::Farm));
        state.validate().unwrap();
    }

    #[test]
    fn quarters_only_count_once_operational() {
        let (config, mut state) = fresh();
        let spec = config.facility(FacilityKind::Quarters).unwrap();
        state.facilities.push(Facility::new_construction("q".into(), spec));
        assert_eq!(state.compute_max_population(&config), 3);

        state.facilities[0].is_building = false;
        state.facilities[0].level = 2;
        assert_eq!(state.compute_max_population(&config), 11);
    }

    #[test]
    fn validate_catches_double_employment() {
        let (config, mut state) = fresh();
        let spec = config.facility(FacilityKind::Farm).unwrap();
        let rid = state.residents[0].id.clone();
        for id in ["a", "b"] {
            let mut f = Facility::new_construction(id.into(), spec);
            f.is_building = false;
            f.workers.push(rid.clone());
            state.facilities.push(f);
        }
        state.residents[0].assigned_facility = Some("a".into());
        assert!(state.validate().is_err());
    }
}
