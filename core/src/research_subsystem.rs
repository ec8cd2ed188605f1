//! Research scheduler: advances the single active technology.
//!
//! Progress per tick is this tick's net research rate × delta, as
//! published by the production subsystem. Negative output never rolls
//! progress back. Completion marks the technology researched, clears the
//! active slot and adds its unlocks to the unlocked set.

use crate::{
    error::{SimError, SimResult},
    event::{net_production, SimEvent},
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
};

#[derive(Default)]
pub struct ResearchSubsystem;

impl ResearchSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for ResearchSubsystem {
    fn name(&self) -> &'static str {
        "research"
    }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let Some(active_id) = state.active_research.clone() else {
            return Ok(vec![]);
        };
        let output = net_production(events_in).map_or(0.0, |net| net.research);

        let tech = state
            .technologies
            .iter_mut()
            .find(|t| t.id == active_id)
            .ok_or_else(|| {
                SimError::InvariantViolation(format!("active research {active_id} not in catalog"))
            })?;

        tech.progress = (tech.progress + (output * ctx.delta).max(0.0)).min(tech.research_time);
        log::debug!(
            "tick={} research: {} at {:.2}/{:.2}",
            ctx.tick, tech.id, tech.progress, tech.research_time
        );
        if tech.progress < tech.research_time {
            return Ok(vec![]);
        }

        tech.is_researched = true;
        tech.is_researching = false;
        let unlocks = tech.unlocks.clone();
        state.active_research = None;

        let mut unlocked = Vec::new();
        for kind in unlocks {
            if state.unlocked_facilities.insert(kind) {
                unlocked.push(kind);
            }
        }
        log::info!("tick={} research: {active_id} completed, unlocked {unlocked:?}", ctx.tick);

        Ok(vec![SimEvent::ResearchCompleted {
            tick: ctx.tick,
            tech_id: active_id,
            unlocked,
        }])
    }
}
