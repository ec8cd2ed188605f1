use serde::{Deserialize, Serialize};
use crate::{
    facility::FacilityKind,
    resource::ResourceBundle,
    types::{FacilityId, ResidentId, TechId},
};

/// All player-issued commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetSpeed { speed: crate::clock::SimSpeed },

    // ── Facilities ────────────────────────────────
    BuildFacility { kind: FacilityKind },
    UpgradeFacility { facility_id: FacilityId },
    CancelBuild { facility_id: FacilityId },

    // ── Residents ─────────────────────────────────
    AssignWorker {
        resident_id: ResidentId,
        facility_id: FacilityId,
    },
    UnassignWorker { resident_id: ResidentId },
    RecruitResident,

    // ── Research ──────────────────────────────────
    StartResearch { tech_id: TechId },
}

/// What an accepted command produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Clock changes and staffing moves carry no payload.
    Done,
    FacilityBuilt { facility_id: FacilityId },
    FacilityUpgraded { facility_id: FacilityId, level: u32 },
    BuildCancelled { facility_id: FacilityId, refund: ResourceBundle },
    ResidentRecruited { resident_id: ResidentId },
    ResearchStarted { tech_id: TechId },
}
