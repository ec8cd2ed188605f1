//! Construction scheduler.
//!
//! Each tick, for every facility still under construction:
//!   1. Draft idle residents as builders, in resident list order, up to
//!      the facility's remaining builder slots.
//!   2. Advance progress by construction efficiency × delta, capped at
//!      build_time.
//!   3. On reaching build_time the facility turns operational, releases
//!      its builders and starts with an empty worker set.
//! Afterwards every resident's working flag is recomputed.
//!
//! A resident is idle when they have no assigned facility and are not
//! already building somewhere. Nobody builds two sites at once.

use crate::{
    efficiency::construction_efficiency,
    error::SimResult,
    event::SimEvent,
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
};
use std::collections::HashSet;

#[derive(Default)]
pub struct ConstructionSubsystem;

impl ConstructionSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for ConstructionSubsystem {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let mut out_events = Vec::new();
        let residents = &state.residents;

        let mut drafted: HashSet<String> = state
            .facilities
            .iter()
            .flat_map(|f| f.build_workers.iter().cloned())
            .collect();

        for facility in state.facilities.iter_mut().filter(|f| f.is_building) {
            let recruits: Vec<String> = residents
                .iter()
                .filter(|r| r.is_unassigned() && !drafted.contains(&r.id))
                .take(facility.remaining_builder_slots())
                .map(|r| r.id.clone())
                .collect();

            if !recruits.is_empty() {
                drafted.extend(recruits.iter().cloned());
                facility.build_workers.extend(recruits.iter().cloned());
                out_events.push(SimEvent::BuildersAssigned {
                    tick: ctx.tick,
                    facility_id: facility.id.clone(),
                    resident_ids: recruits,
                });
            }

            let efficiency = construction_efficiency(facility, residents);
            facility.build_progress =
                (facility.build_progress + efficiency * ctx.delta).min(facility.build_time);

            if facility.build_progress >= facility.build_time {
                facility.is_building = false;
                facility.build_workers.clear();
                facility.workers.clear();
                log::info!(
                    "tick={} construction: {} ({}) completed",
                    ctx.tick, facility.id, facility.kind
                );
                out_events.push(SimEvent::ConstructionCompleted {
                    tick: ctx.tick,
                    facility_id: facility.id.clone(),
                    kind: facility.kind,
                });
            } else {
                log::debug!(
                    "tick={} construction: {} at {:.2}/{:.2} (eff {:.3}, {} builders)",
                    ctx.tick,
                    facility.id,
                    facility.build_progress,
                    facility.build_time,
                    efficiency,
                    facility.build_workers.len()
                );
            }
        }

        state.refresh_working_flags();
        Ok(out_events)
    }
}
