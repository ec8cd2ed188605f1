//! Shortage effects: residents suffer when food, water or power run dry.
//!
//! Runs after the ledger has clamped this tick's amounts. Penalties
//! stack across resources and scale with delta; health and happiness
//! are floored at 0.

use crate::{
    config::ShortageConfig,
    error::SimResult,
    event::SimEvent,
    resource::{ResourceBundle, ResourceKind},
    state::ShelterState,
    subsystem::{SimSubsystem, TickContext},
};

#[derive(Default)]
pub struct ShortageSubsystem;

impl ShortageSubsystem {
    pub fn new() -> Self {
        Self
    }
}

/// Per-second penalties implied by the current ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Penalty {
    pub health:    f64,
    pub happiness: f64,
}

/// Which shortages are active and what they cost per second.
pub fn penalties(ledger: &ResourceBundle, rules: &ShortageConfig) -> Vec<(ResourceKind, Penalty)> {
    let mut out = Vec::new();

    if ledger.food <= 0.0 {
        out.push((ResourceKind::Food, Penalty {
            health:    rules.starvation_health,
            happiness: rules.starvation_happiness,
        }));
    } else if ledger.food < rules.food_low_threshold {
        out.push((ResourceKind::Food, Penalty { health: 0.0, happiness: rules.hunger_happiness }));
    }

    if ledger.water <= 0.0 {
        out.push((ResourceKind::Water, Penalty {
            health:    rules.dehydration_health,
            happiness: rules.dehydration_happiness,
        }));
    } else if ledger.water < rules.water_low_threshold {
        out.push((ResourceKind::Water, Penalty { health: rules.thirst_health, happiness: 0.0 }));
    }

    if ledger.power <= 0.0 {
        out.push((ResourceKind::Power, Penalty { health: 0.0, happiness: rules.blackout_happiness }));
    }
    out
}

impl SimSubsystem for ShortageSubsystem {
    fn name(&self) -> &'static str {
        "shortage"
    }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut ShelterState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let active = penalties(&state.resources, &ctx.config.balance.shortage);
        if active.is_empty() || state.residents.is_empty() {
            return Ok(vec![]);
        }

        let mut out_events = Vec::with_capacity(active.len());
        for (resource, penalty) in active {
            for resident in &mut state.residents {
                resident.health = (resident.health - penalty.health * ctx.delta).max(0.0);
                resident.happiness = (resident.happiness - penalty.happiness * ctx.delta).max(0.0);
            }
            log::debug!(
                "tick={} shortage: {resource} costs {:.1} health, {:.1} happiness",
                ctx.tick, penalty.health, penalty.happiness
            );
            out_events.push(SimEvent::ShortageApplied {
                tick: ctx.tick,
                resource,
                residents_affected: state.residents.len(),
            });
        }
        Ok(out_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelterConfig;

    fn ledger(food: f64, water: f64, power: f64) -> ResourceBundle {
        ResourceBundle::default()
            .with(ResourceKind::Food, food)
            .with(ResourceKind::Water, water)
            .with(ResourceKind::Power, power)
    }

    #[test]
    fn healthy_stockpile_has_no_penalties() {
        let rules = ShelterConfig::default_test().balance.shortage;
        assert!(penalties(&ledger(100.0, 100.0, 50.0), &rules).is_empty());
    }

    #[test]
    fn low_and_empty_tiers() {
        let rules = ShelterConfig::default_test().balance.shortage;

        let low = penalties(&ledger(5.0, 5.0, 1.0), &rules);
        assert_eq!(low, vec![
            (ResourceKind::Food, Penalty { health: 0.0, happiness: 1.0 }),
            (ResourceKind::Water, Penalty { health: 1.0, happiness: 0.0 }),
        ]);

        let empty = penalties(&ledger(0.0, 0.0, 0.0), &rules);
        assert_eq!(empty.len(), 3);
        assert_eq!(empty[0].1, Penalty { health: 5.0, happiness: 3.0 });
        assert_eq!(empty[2].1, Penalty { health: 0.0, happiness: 1.0 });
    }
}
