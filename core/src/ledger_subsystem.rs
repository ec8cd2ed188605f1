//! Ledger: recompute storage limits and apply the tick's net delta.
//!
//! RULE: After this subsystem runs every amount lies in [0, limit].
//! Limits are derived from the facility list as it stands after
//! construction, so a storage facility finished this tick already counts.

use crate::{
    error::SimResult,
    event::{net_production, SimEvent},
    resource::{compute_limits, ResourceBundle, ResourceKind},
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
};

#[derive(Default)]
pub struct LedgerSubsystem;

impl LedgerSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for LedgerSubsystem {
    fn name(&self) -> &'static str {
        "ledger"
    }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let limits = compute_limits(&state.facilities, &ctx.config.balance);
        let delta = net_production(events_in)
            .copied()
            .unwrap_or_default()
            .scaled(ctx.delta);

        let before = state.resources;
        state.resources.apply_delta(&delta, &limits);
        state.resource_limits = limits;

        Ok(boundary_events(ctx, &before, &delta, state))
    }
}

/// Report kinds that hit their cap or ran dry this tick.
fn boundary_events(
    ctx: &TickContext<'_>,
    before: &ResourceBundle,
    delta: &ResourceBundle,
    state: &ShelterState,
) -> Vec<SimEvent> {
    let mut out = Vec::new();
    for kind in ResourceKind::ALL {
        let raw = before.get(kind) + delta.get(kind);
        let limit = state.resource_limits.get(kind);
        if raw > limit {
            out.push(SimEvent::ResourceCapped { tick: ctx.tick, resource: kind, limit });
        } else if raw <= 0.0 && before.get(kind) > 0.0 {
            log::debug!("tick={} ledger: {kind} ran out", ctx.tick);
            out.push(SimEvent::ResourceDepleted { tick: ctx.tick, resource: kind });
        }
    }
    out
}
