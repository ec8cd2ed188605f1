//! Technology catalog entries and their effects.
//!
//! At most one technology is in progress at any time; the research
//! subsystem and `start_research` are the only writers.

use crate::{
    config::TechnologySpec,
    facility::FacilityKind,
    resource::ResourceBundle,
    types::TechId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TechEffect {
    /// Multiplies a facility kind's output by `1 + value`.
    ProductionBonus { target: FacilityKind, value: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technology {
    pub id:             TechId,
    pub name:           String,
    pub description:    String,
    pub cost:           ResourceBundle,
    pub research_time:  f64,
    pub requirements:   Vec<TechId>,
    pub unlocks:        Vec<FacilityKind>,
    pub effects:        Vec<TechEffect>,
    pub is_researched:  bool,
    pub is_researching: bool,
    pub progress:       f64,
}

impl Technology {
    pub fn from_spec(spec: &TechnologySpec) -> Self {
        Self {
            id:             spec.id.clone(),
            name:           spec.name.clone(),
            description:    spec.description.clone(),
            cost:           spec.cost,
            research_time:  spec.research_time,
            requirements:   spec.requirements.clone(),
            unlocks:        spec.unlocks.clone(),
            effects:        spec.effects.clone(),
            is_researched:  false,
            is_researching: false,
            progress:       0.0,
        }
    }
}

/// Sum of production bonuses from researched technologies for `kind`.
pub fn production_bonus(technologies: &[Technology], kind: FacilityKind) -> f64 {
    technologies
        .iter()
        .filter(|t| t.is_researched)
        .flat_map(|t| t.effects.iter())
        .map(|effect| match effect {
            TechEffect::ProductionBonus { target, value } if *target == kind => *value,
            TechEffect::ProductionBonus { .. } => 0.0,
        })
        .sum()
}
