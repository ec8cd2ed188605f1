//! The tick event stream.
//!
//! RULE: Subsystems hand data to later subsystems ONLY through events.
//! A subsystem may never call another subsystem's functions directly.

use crate::{
    facility::FacilityKind,
    resource::{ResourceBundle, ResourceKind},
    types::{FacilityId, ResidentId, TechId, Tick},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
        delta: f64,
    },
    TickCompleted {
        tick: Tick,
        game_time: f64,
    },

    // ── Production ─────────────────────────────────
    /// Net per-second rates; the ledger and research read this.
    ProductionComputed {
        tick: Tick,
        net: ResourceBundle,
    },

    // ── Construction ───────────────────────────────
    BuildersAssigned {
        tick: Tick,
        facility_id: FacilityId,
        resident_ids: Vec<ResidentId>,
    },
    ConstructionCompleted {
        tick: Tick,
        facility_id: FacilityId,
        kind: FacilityKind,
    },

    // ── Research ───────────────────────────────────
    ResearchCompleted {
        tick: Tick,
        tech_id: TechId,
        unlocked: Vec<FacilityKind>,
    },

    // ── Ledger ─────────────────────────────────────
    ResourceCapped {
        tick: Tick,
        resource: ResourceKind,
        limit: f64,
    },
    ResourceDepleted {
        tick: Tick,
        resource: ResourceKind,
    },

    // ── Shortage ───────────────────────────────────
    ShortageApplied {
        tick: Tick,
        resource: ResourceKind,
        residents_affected: usize,
    },
}

impl SimEvent {
    /// Stable snake_case name, used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. }           => "tick_started",
            Self::TickCompleted { .. }         => "tick_completed",
            Self::ProductionComputed { .. }    => "production_computed",
            Self::BuildersAssigned { .. }      => "builders_assigned",
            Self::ConstructionCompleted { .. } => "construction_completed",
            Self::ResearchCompleted { .. }     => "research_completed",
            Self::ResourceCapped { .. }        => "resource_capped",
            Self::ResourceDepleted { .. }      => "resource_depleted",
            Self::ShortageApplied { .. }       => "shortage_applied",
        }
    }
}

/// The net rates emitted by the production step this tick, if any.
pub fn net_production(events: &[SimEvent]) -> Option<&ResourceBundle> {
    events.iter().rev().find_map(|e| match e {
        SimEvent::ProductionComputed { net, .. } => Some(net),
        _ => None,
    })
}
