//! Production & consumption: the shelter's net per-second rates.
//!
//! Gross output comes from staffed operational facilities. Upkeep is
//! food and water per resident plus each operational facility's power
//! draw. The net vector is published as `ProductionComputed`; this
//! subsystem never touches the ledger itself.

use crate::{
    config::ShelterConfig,
    efficiency::operational_efficiency,
    error::SimResult,
    event::SimEvent,
    resource::{ResourceBundle, ResourceKind},
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
    technology::production_bonus,
};

#[derive(Default)]
pub struct ProductionSubsystem;

impl ProductionSubsystem {
    pub fn new() -> Self {
        Self
    }
}

/// Output of every staffed operational facility.
pub fn gross_production(state: &ShelterState) -> ResourceBundle {
    let mut production = ResourceBundle::default();
    for facility in state.operational().filter(|f| !f.workers.is_empty()) {
        let efficiency = operational_efficiency(facility, &state.residents);
        let bonus = production_bonus(&state.technologies, facility.kind);
        *production.get_mut(facility.production.resource) +=
            facility.production.rate * efficiency * (1.0 + bonus);
    }
    production
}

/// Population upkeep plus facility power draw, independent of efficiency.
pub fn consumption(state: &ShelterState, config: &ShelterConfig) -> ResourceBundle {
    let balance = &config.balance;
    let population = f64::from(state.population);
    let mut upkeep = ResourceBundle::default()
        .with(ResourceKind::Food, population * balance.food_per_resident)
        .with(ResourceKind::Water, population * balance.water_per_resident);

    for facility in state.operational() {
        let draw = config.facility(facility.kind).map_or(0.0, |s| s.power_draw);
        upkeep.power += draw * f64::from(facility.level);
    }
    upkeep
}

/// Gross production minus consumption, per resource kind.
pub fn net_production(state: &ShelterState, config: &ShelterConfig) -> ResourceBundle {
    let mut net = gross_production(state);
    net.deduct(&consumption(state, config));
    net
}

impl SimSubsystem for ProductionSubsystem {
    fn name(&self) -> &'static str {
        "production"
    }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let net = net_production(state, ctx.config);
        state.resources_per_second = net;

        log::debug!(
            "tick={} production: food={:+.3} water={:+.3} power={:+.3} research={:+.3}",
            ctx.tick, net.food, net.water, net.power, net.research
        );

        Ok(vec![SimEvent::ProductionComputed { tick: ctx.tick, net }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        facility::{Facility, FacilityKind},
        resident::Skills,
        rng::RngBank,
    };

    fn setup() -> (ShelterConfig, ShelterState) {
        let config = ShelterConfig::default_test();
        let mut state = ShelterState::new_game(&config, &RngBank::new(1));
        for r in &mut state.residents {
            r.skills = Skills::uniform(10);
            r.happiness = 50.0;
            r.health = 100.0;
        }
        (config, state)
    }

    fn operational(config: &ShelterConfig, id: &str, kind: FacilityKind) -> Facility {
        let mut f = Facility::new_construction(id.into(), config.facility(kind).unwrap());
        f.is_building = false;
        f
    }

    #[test]
    fn upkeep_without_facilities() {
        let (config, state) = setup();
        let net = net_production(&state, &config);
        assert!((net.food + 0.3).abs() < 1e-12);
        assert!((net.water + 0.24).abs() < 1e-12);
        assert_eq!(net.power, 0.0);
    }

    #[test]
    fn unstaffed_facility_draws_power_but_produces_nothing() {
        let (config, mut state) = setup();
        let mut farm = operational(&config, "farm", FacilityKind::Farm);
        farm.level = 2;
        state.facilities.push(farm);

        let net = net_production(&state, &config);
        assert!((net.power + 0.1).abs() < 1e-12);
        assert!((net.food + 0.3).abs() < 1e-12);
    }

    #[test]
    fn fully_staffed_farm_with_average_crew() {
        let (config, mut state) = setup();
        let mut farm = operational(&config, "farm", FacilityKind::Farm);
        for r in &mut state.residents {
            farm.workers.push(r.id.clone());
            r.assigned_facility = Some("farm".into());
        }
        state.facilities.push(farm);

        // skill 10, neutral mood, full crew: efficiency 1.0
        let gross = gross_production(&state);
        assert!((gross.food - 1.0).abs() < 1e-12);
    }

    #[test]
    fn researched_bonus_scales_output() {
        let (config, mut state) = setup();
        let mut farm = operational(&config, "farm", FacilityKind::Farm);
        for r in &state.residents {
            farm.workers.push(r.id.clone());
        }
        state.facilities.push(farm);
        let hydro = state
            .technologies
            .iter_mut()
            .find(|t| t.id == "hydroponics")
            .unwrap();
        hydro.is_researched = true;

        assert!((gross_production(&state).food - 1.25).abs() < 1e-12);
    }

    #[test]
    fn constructing_facilities_are_ignored() {
        let (config, mut state) = setup();
        let lab = Facility::new_construction("lab".into(), config.facility(FacilityKind::Laboratory).unwrap());
        state.facilities.push(lab);
        assert_eq!(consumption(&state, &config).power, 0.0);
    }
}
