//! Player actions and the queries that gate them.
//!
//! RULE: Every action checks all of its preconditions before touching
//! anything. A rejected action returns an `ActionError` and leaves the
//! state exactly as it was; an accepted one applies in full.

use crate::{
    config::ShelterConfig,
    error::{ActionError, ActionResult},
    facility::{Facility, FacilityKind},
    resident::Resident,
    resource::ResourceBundle,
    rng::{RngBank, SubsystemSlot},
    state::ShelterState,
    types::{FacilityId, ResidentId},
};

impl ShelterState {
    // ── Queries ────────────────────────────────────────────────

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.resources.can_afford(cost)
    }

    /// `base × growth^(population − pivot)`.
    pub fn recruitment_cost(&self, config: &ShelterConfig) -> ResourceBundle {
        let balance = &config.balance;
        let exponent = self.population as i32 - balance.recruit_cost_pivot as i32;
        balance
            .recruit_base_cost
            .scaled(balance.recruit_cost_growth.powi(exponent))
    }

    /// Ok if `start_research(tech_id)` would succeed right now.
    pub fn research_eligibility(&self, tech_id: &str) -> ActionResult<()> {
        let tech = self
            .technology(tech_id)
            .ok_or_else(|| ActionError::UnknownTechnology(tech_id.into()))?;
        if tech.is_researched {
            return Err(ActionError::AlreadyResearched(tech_id.into()));
        }
        if tech.is_researching {
            return Err(ActionError::AlreadyResearching(tech_id.into()));
        }
        if let Some(active) = &self.active_research {
            return Err(ActionError::ResearchBusy(active.clone()));
        }
        let missing: Vec<String> = tech
            .requirements
            .iter()
            .filter(|req| !self.technology(req).is_some_and(|t| t.is_researched))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ActionError::PrerequisitesUnmet { tech: tech_id.into(), missing });
        }
        if !self.can_afford(&tech.cost) {
            return Err(ActionError::InsufficientResources { needed: tech.cost });
        }
        Ok(())
    }

    pub fn can_start_research(&self, tech_id: &str) -> bool {
        self.research_eligibility(tech_id).is_ok()
    }

    // ── Facility lifecycle ─────────────────────────────────────

    /// Pay for and lay down a new facility in the constructing state.
    pub fn build_facility(
        &mut self,
        kind: FacilityKind,
        config: &ShelterConfig,
        rng_bank: &RngBank,
    ) -> ActionResult<FacilityId> {
        let spec = config
            .facility(kind)
            .ok_or(ActionError::UnknownFacilityKind(kind))?;
        if !self.unlocked_facilities.contains(&kind) {
            return Err(ActionError::FacilityLocked(kind));
        }
        if !self.can_afford(&spec.cost) {
            return Err(ActionError::InsufficientResources { needed: spec.cost });
        }

        let mut rng = rng_bank.for_subsystem_at(SubsystemSlot::Construction, self.rng_cursor);
        let id = format!("{kind}-{}", rng.next_uuid().simple());

        self.resources.deduct(&spec.cost);
        self.facilities.push(Facility::new_construction(id.clone(), spec));
        self.rng_cursor += 1;
        self.refresh_derived(config);

        log::info!("build: {id} started, paid {}", spec.cost);
        Ok(id)
    }

    /// Raise an operational facility one level. Returns the new level.
    pub fn upgrade_facility(&mut self, facility_id: &str, config: &ShelterConfig) -> ActionResult<u32> {
        let facility = self
            .facility(facility_id)
            .ok_or_else(|| ActionError::UnknownFacility(facility_id.into()))?;
        if facility.is_building {
            return Err(ActionError::FacilityUnderConstruction(facility_id.into()));
        }
        let spec = config
            .facility(facility.kind)
            .ok_or(ActionError::UnknownFacilityKind(facility.kind))?;
        let cost = facility.upgrade_cost;
        if !self.can_afford(&cost) {
            return Err(ActionError::InsufficientResources { needed: cost });
        }

        self.resources.deduct(&cost);
        let level = match self.facility_mut(facility_id) {
            Some(facility) => {
                facility.level += 1;
                facility.apply_level(spec, &config.balance);
                facility.level
            }
            None => return Err(ActionError::UnknownFacility(facility_id.into())),
        };
        self.refresh_derived(config);

        log::info!("upgrade: {facility_id} now level {level}, paid {cost}");
        Ok(level)
    }

    /// Abandon a facility still under construction and refund its cost
    /// in full. Returns the refund.
    pub fn cancel_build(&mut self, facility_id: &str, config: &ShelterConfig) -> ActionResult<ResourceBundle> {
        let index = self
            .facilities
            .iter()
            .position(|f| f.id == facility_id)
            .ok_or_else(|| ActionError::UnknownFacility(facility_id.into()))?;
        if !self.facilities[index].is_building {
            return Err(ActionError::FacilityNotUnderConstruction(facility_id.into()));
        }

        let removed = self.facilities.remove(index);
        self.resources.add(&removed.cost);
        self.refresh_derived(config);

        log::info!(
            "cancel: {facility_id} refunded {}, {} builders released",
            removed.cost,
            removed.build_workers.len()
        );
        Ok(removed.cost)
    }

    // ── Staffing ───────────────────────────────────────────────

    /// Put a resident to work at an operational facility. Any previous
    /// job or building duty ends first.
    pub fn assign_worker(&mut self, resident_id: &str, facility_id: &str) -> ActionResult<()> {
        if self.resident(resident_id).is_none() {
            return Err(ActionError::UnknownResident(resident_id.into()));
        }
        let target = self
            .facility(facility_id)
            .ok_or_else(|| ActionError::UnknownFacility(facility_id.into()))?;
        if target.is_building {
            return Err(ActionError::FacilityUnderConstruction(facility_id.into()));
        }
        if target.workers.iter().any(|w| w == resident_id) {
            return Ok(());
        }
        if target.is_full() {
            return Err(ActionError::FacilityFull(facility_id.into()));
        }

        for facility in &mut self.facilities {
            facility.release(resident_id);
        }
        if let Some(facility) = self.facility_mut(facility_id) {
            facility.workers.push(resident_id.to_string());
        }
        if let Some(resident) = self.residents.iter_mut().find(|r| r.id == resident_id) {
            resident.assigned_facility = Some(facility_id.to_string());
        }
        self.refresh_working_flags();

        log::info!("assign: {resident_id} -> {facility_id}");
        Ok(())
    }

    /// Remove a resident from every worker set and clear their job.
    pub fn unassign_worker(&mut self, resident_id: &str) -> ActionResult<()> {
        if self.resident(resident_id).is_none() {
            return Err(ActionError::UnknownResident(resident_id.into()));
        }
        for facility in &mut self.facilities {
            facility.workers.retain(|w| w != resident_id);
        }
        if let Some(resident) = self.residents.iter_mut().find(|r| r.id == resident_id) {
            resident.assigned_facility = None;
        }
        self.refresh_working_flags();

        log::info!("unassign: {resident_id}");
        Ok(())
    }

    // ── Population ─────────────────────────────────────────────

    pub fn recruit_resident(
        &mut self,
        config: &ShelterConfig,
        rng_bank: &RngBank,
    ) -> ActionResult<ResidentId> {
        if self.population >= self.max_population {
            return Err(ActionError::PopulationCap(self.max_population));
        }
        let cost = self.recruitment_cost(config);
        if !self.can_afford(&cost) {
            return Err(ActionError::InsufficientResources { needed: cost });
        }

        let mut rng = rng_bank.for_subsystem_at(SubsystemSlot::Recruitment, self.rng_cursor);
        let resident = Resident::generate(&mut rng);
        let id = resident.id.clone();

        self.resources.deduct(&cost);
        self.residents.push(resident);
        self.population += 1;
        self.rng_cursor += 1;
        self.refresh_derived(config);

        log::info!("recruit: {id} joined, population {}", self.population);
        Ok(id)
    }

    // ── Research ───────────────────────────────────────────────

    /// Pay for a technology and make it the active project.
    pub fn start_research(&mut self, tech_id: &str) -> ActionResult<()> {
        self.research_eligibility(tech_id)?;

        let tech = self
            .technologies
            .iter_mut()
            .find(|t| t.id == tech_id)
            .ok_or_else(|| ActionError::UnknownTechnology(tech_id.into()))?;
        tech.is_researching = true;
        let cost = tech.cost;
        self.resources.deduct(&cost);
        self.active_research = Some(tech_id.to_string());

        log::info!("research: {tech_id} started");
        Ok(())
    }
}
